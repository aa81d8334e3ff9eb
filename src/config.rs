//! Machine configuration.
//!
//! Supplied as JSON (`--config vm.json` on the CLI, or a string from the web
//! page). Every field is optional:
//!
//! ```json
//! { "memory_size": 65536, "stack_limit": 256, "opcode_policy": "permissive" }
//! ```

use std::path::Path;

use crate::cpu::{CpuConfig, Memory, MemoryError, OpcodePolicy};
use crate::cpu::memory::MAX_MEMORY_SIZE;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Full machine configuration: memory plus CPU parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Bytes of program memory (2..=65536).
    pub memory_size: usize,
    /// Lowest address a push may write to.
    pub stack_limit: u16,
    pub opcode_policy: OpcodePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memory_size: MAX_MEMORY_SIZE,
            stack_limit: 0,
            opcode_policy: OpcodePolicy::Strict,
        }
    }
}

impl Config {
    /// Parse a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_json(&source)
    }

    /// CPU parameters.
    pub fn cpu(&self) -> CpuConfig {
        CpuConfig {
            stack_limit: self.stack_limit,
            opcode_policy: self.opcode_policy,
        }
    }

    /// Allocate a zeroed memory of the configured size.
    pub fn memory(&self) -> Result<Memory, ConfigError> {
        Ok(Memory::new(self.memory_size)?)
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("invalid configuration: {0}")]
    ParseError(String),

    #[error(transparent)]
    Memory(#[from] MemoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_json_fields() {
        let config = Config::from_json(
            r#"{ "memory_size": 256, "stack_limit": 128, "opcode_policy": "permissive" }"#,
        )
        .unwrap();

        assert_eq!(config.memory_size, 256);
        assert_eq!(config.cpu().stack_limit, 128);
        assert_eq!(config.cpu().opcode_policy, OpcodePolicy::Permissive);
        assert_eq!(config.memory().unwrap().len(), 256);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            Config::from_json(r#"{ "memroy_size": 256 }"#),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_bad_memory_size() {
        let config = Config { memory_size: 1, ..Config::default() };
        assert_eq!(
            config.memory(),
            Err(ConfigError::Memory(MemoryError::InvalidSize(1)))
        );
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::load("/nonexistent/vm16.json"),
            Err(ConfigError::IoError(_))
        ));
    }
}
