//! WebAssembly bindings for the VM.
//!
//! This module provides JavaScript-friendly wrappers around the core
//! emulator, for the browser page that drives it.

use wasm_bindgen::prelude::*;
use crate::{Config, Cpu, Memory};
use crate::program::{demos, disasm, dump, image};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WebAssembly-friendly VM wrapper.
#[wasm_bindgen]
pub struct WasmVm {
    cpu: Cpu<Memory>,
    config: Config,
    program: Vec<u8>,
}

#[wasm_bindgen]
impl WasmVm {
    /// Create a VM with a full 64 KiB memory.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let config = Config::default();
        Self {
            cpu: Cpu::with_config(Memory::default(), config.cpu()),
            config,
            program: Vec::new(),
        }
    }

    /// Apply a JSON configuration and reload the current program.
    #[wasm_bindgen]
    pub fn configure(&mut self, json: &str) -> Result<(), JsError> {
        self.config = Config::from_json(json).map_err(|e| JsError::new(&e.to_string()))?;
        self.reload()
    }

    /// Load a program from hex text. Returns its size in bytes.
    #[wasm_bindgen]
    pub fn load_hex(&mut self, source: &str) -> Result<usize, JsError> {
        let bytes = image::parse_hex(source).map_err(|e| JsError::new(&e.to_string()))?;
        self.load_bytes(bytes)
    }

    /// Load one of the built-in demos by name.
    #[wasm_bindgen]
    pub fn load_demo(&mut self, name: &str) -> Result<usize, JsError> {
        let demo = demos::by_name(name)
            .ok_or_else(|| JsError::new(&format!("unknown demo: {}", name)))?;
        self.load_bytes(demo.program)
    }

    /// Step one instruction. Returns the executed instruction as text.
    #[wasm_bindgen]
    pub fn step(&mut self) -> Result<String, JsError> {
        let executed = self.cpu.step().map_err(|e| JsError::new(&e.to_string()))?;
        Ok(executed.map(|i| i.to_string()).unwrap_or_else(|| "(ignored)".into()))
    }

    /// Step up to `max_steps` times. Returns the cycle count, or the first
    /// fault.
    #[wasm_bindgen]
    pub fn run(&mut self, max_steps: u32) -> Result<u64, JsError> {
        self.cpu
            .run_for(max_steps as u64)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(self.cpu.cycles)
    }

    /// Reset the CPU and restore the loaded program.
    #[wasm_bindgen]
    pub fn reset(&mut self) -> Result<(), JsError> {
        self.reload()
    }

    /// Clear a fault.
    #[wasm_bindgen]
    pub fn resume(&mut self) {
        self.cpu.resume();
    }

    /// Check if CPU accepts steps.
    #[wasm_bindgen]
    pub fn is_running(&self) -> bool {
        self.cpu.is_running()
    }

    /// Get cycle count.
    #[wasm_bindgen]
    pub fn cycles(&self) -> u64 {
        self.cpu.cycles
    }

    /// Read a register by name, e.g. `"acc"`.
    #[wasm_bindgen]
    pub fn register(&self, name: &str) -> Result<u16, JsError> {
        self.cpu.register_by_name(name).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Copy of `len` bytes at `addr`.
    #[wasm_bindgen]
    pub fn memory_window(&self, addr: u16, len: usize) -> Result<Vec<u8>, JsError> {
        self.cpu
            .memory_window(addr, len)
            .map(<[u8]>::to_vec)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// `0x0100 ⇥ 0x00 | ... ⇤` view of eight bytes at `addr`.
    #[wasm_bindgen]
    pub fn view_memory(&self, addr: u16) -> Result<String, JsError> {
        dump::view_memory(self.cpu.memory(), addr, dump::DEFAULT_WINDOW)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// `IP: 0x0000, ACC: ...` line.
    #[wasm_bindgen]
    pub fn dump_registers(&self) -> String {
        dump::dump_registers(self.cpu.registers())
    }

    /// Registers, state and cycle count as JSON.
    #[wasm_bindgen]
    pub fn snapshot_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.cpu.snapshot()).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Listing of the loaded program.
    #[wasm_bindgen]
    pub fn disassembly(&self) -> Result<String, JsError> {
        disasm::disassemble(&self.program).map_err(|e| JsError::new(&e.to_string()))
    }
}

impl WasmVm {
    fn load_bytes(&mut self, bytes: Vec<u8>) -> Result<usize, JsError> {
        let len = bytes.len();
        self.program = bytes;
        self.reload()?;
        Ok(len)
    }

    fn reload(&mut self) -> Result<(), JsError> {
        let mut memory = self.config.memory().map_err(|e| JsError::new(&e.to_string()))?;
        memory.load(0, &self.program).map_err(|e| JsError::new(&e.to_string()))?;
        self.cpu = Cpu::with_config(memory, self.config.cpu());
        Ok(())
    }
}

impl Default for WasmVm {
    fn default() -> Self {
        Self::new()
    }
}
