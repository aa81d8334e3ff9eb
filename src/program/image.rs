//! Program image files.
//!
//! Two formats:
//! - `.bin`: raw bytes, loaded verbatim at address 0
//! - anything else: hex text, whitespace-separated byte pairs
//!   (`10 12 34 02`); `;` starts a comment that runs to end of line
//!
//! Images carry no header, version or checksum.

use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Parse a hex text image.
pub fn parse_hex(source: &str) -> Result<Vec<u8>, ImageError> {
    let mut bytes = Vec::new();

    for (line_num, line) in source.lines().enumerate() {
        let code = line.split(';').next().unwrap_or("");

        for token in code.split_whitespace() {
            let token = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);

            if token.len() != 2 {
                return Err(ImageError::ParseError {
                    line: line_num + 1,
                    message: format!("expected a two-digit hex byte, found {:?}", token),
                });
            }

            let byte = u8::from_str_radix(token, 16).map_err(|e| ImageError::ParseError {
                line: line_num + 1,
                message: format!("{:?}: {}", token, e),
            })?;
            bytes.push(byte);
        }
    }

    Ok(bytes)
}

/// Render bytes as hex text, 8 per line with an offset comment.
pub fn format_hex(bytes: &[u8]) -> String {
    let mut out = String::new();
    out.push_str("; vm16 program image\n");
    out.push_str(&format!("; {} bytes\n\n", bytes.len()));

    for (i, chunk) in bytes.chunks(8).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{:02X}", b)).collect();
        out.push_str(&format!("{:<23} ; {:04X}\n", hex.join(" "), i * 8));
    }

    out
}

/// Load an image from disk.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, ImageError> {
    let path = path.as_ref();

    if is_raw(path) {
        return std::fs::read(path).map_err(|e| ImageError::IoError(e.to_string()));
    }

    let source =
        std::fs::read_to_string(path).map_err(|e| ImageError::IoError(e.to_string()))?;
    parse_hex(&source)
}

/// Save an image to disk, in the format implied by its extension.
pub fn save_image<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<(), ImageError> {
    let path = path.as_ref();
    let mut file =
        std::fs::File::create(path).map_err(|e| ImageError::IoError(e.to_string()))?;

    let result = if is_raw(path) {
        file.write_all(bytes)
    } else {
        file.write_all(format_hex(bytes).as_bytes())
    };

    result.map_err(|e| ImageError::IoError(e.to_string()))
}

fn is_raw(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("bin"))
        .unwrap_or(false)
}

/// Errors that can occur while reading or writing images.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },
}
