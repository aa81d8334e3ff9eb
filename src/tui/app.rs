//! Debugger application state and logic.

use crate::cpu::{Cpu, CpuConfig, EventLog, Memory, Register};
use crate::program::disasm::disassemble_at;
use std::collections::HashSet;

/// Bytes per memory view row.
pub const ROW_BYTES: usize = 8;

/// Debugger application state.
pub struct DebuggerApp {
    /// The CPU being debugged; its event log feeds the events pane.
    pub cpu: Cpu<Memory, EventLog>,
    /// Memory as loaded, for reset.
    initial: Memory,
    /// Breakpoints (by address).
    pub breakpoints: HashSet<u16>,
    /// Is the debugger running continuously?
    pub running: bool,
    /// Should we quit?
    pub should_quit: bool,
    /// Status message to display.
    pub status: String,
    /// First memory row shown.
    pub mem_scroll: usize,
}

impl DebuggerApp {
    /// Create a debugger over a loaded memory.
    pub fn new(memory: Memory, config: CpuConfig) -> Self {
        let initial = memory.clone();
        let cpu = Cpu::with_config(memory, config).with_observer(EventLog::new(64));

        Self {
            cpu,
            initial,
            breakpoints: HashSet::new(),
            running: false,
            should_quit: false,
            status: "Ready. Press 's' to step, 'r' to run, 'q' to quit.".into(),
            mem_scroll: 0,
        }
    }

    /// Step one instruction.
    pub fn step(&mut self) {
        if !self.cpu.is_running() {
            self.status = format!("CPU stopped: {:?}. Press 'c' to resume or 'x' to reset.", self.cpu.state);
            self.running = false;
            return;
        }

        let ip = self.cpu.register(Register::Ip);
        match self.cpu.step() {
            Ok(Some(instr)) => {
                self.status = format!("IP={:04X}: {}", ip, instr);
            }
            Ok(None) => {
                self.status = format!("IP={:04X}: unknown opcode skipped", ip);
            }
            Err(e) => {
                self.status = format!("Fault: {}", e);
                self.running = false;
            }
        }
    }

    /// Run until breakpoint, fault, or pause.
    pub fn run(&mut self) {
        self.running = true;
        self.status = "Running...".into();
    }

    /// Run one iteration of continuous execution.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }

        if !self.cpu.is_running() {
            self.running = false;
            self.status = format!("Stopped after {} cycles", self.cpu.cycles);
            return;
        }

        // Check for breakpoint
        let ip = self.cpu.register(Register::Ip);
        if self.breakpoints.contains(&ip) {
            self.running = false;
            self.status = format!("Breakpoint at IP={:04X}", ip);
            return;
        }

        self.step();
    }

    /// Toggle breakpoint at current IP.
    pub fn toggle_breakpoint(&mut self) {
        let ip = self.cpu.register(Register::Ip);
        if self.breakpoints.remove(&ip) {
            self.status = format!("Removed breakpoint at IP={:04X}", ip);
        } else {
            self.breakpoints.insert(ip);
            self.status = format!("Set breakpoint at IP={:04X}", ip);
        }
    }

    /// Clear a fault and keep going from the rewound IP.
    pub fn resume(&mut self) {
        self.cpu.resume();
        self.status = "Resumed.".into();
    }

    /// Restore the loaded memory and reset the CPU.
    pub fn reset(&mut self) {
        let config = *self.cpu.config();
        self.cpu = Cpu::with_config(self.initial.clone(), config).with_observer(EventLog::new(64));
        self.running = false;
        self.status = "Reset. Ready.".into();
    }

    /// Scroll the memory view by `rows`, clamped to memory.
    pub fn scroll_memory(&mut self, rows: isize) {
        let max_row = self.cpu.memory().len().div_ceil(ROW_BYTES).saturating_sub(1);
        self.mem_scroll = self.mem_scroll.saturating_add_signed(rows).min(max_row);
    }

    /// Jump the memory view to the row holding SP.
    pub fn follow_stack(&mut self) {
        self.mem_scroll = self.cpu.register(Register::Sp) as usize / ROW_BYTES;
    }

    /// Disassembly around IP: `(addr, text, is_current)`.
    pub fn get_disassembly(&self, lines: usize) -> Vec<(u16, String, bool)> {
        let ip = self.cpu.register(Register::Ip);
        let mem = self.cpu.memory();

        // Sweep from 0 so instruction boundaries line up with the program
        let mut listing = Vec::new();
        let mut addr = 0usize;
        let mut past_ip = 0;
        while addr < mem.len() && past_ip < lines {
            let line = disassemble_at(mem, addr as u16);
            if addr >= ip as usize {
                past_ip += 1;
            }
            addr += line.bytes.len().max(1);
            listing.push(line);
        }

        let current = listing
            .iter()
            .position(|line| line.addr == ip)
            .unwrap_or(listing.len());
        let start = current.saturating_sub(lines / 2);

        listing
            .into_iter()
            .skip(start)
            .take(lines)
            .map(|line| (line.addr, line.text(), line.addr == ip))
            .collect()
    }
}

/// Run the debugger over a loaded memory.
pub fn run_debugger(memory: Memory, config: CpuConfig) -> std::io::Result<()> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    };
    use ratatui::prelude::*;
    use std::io::stdout;
    use std::time::Duration;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = DebuggerApp::new(memory, config);

    loop {
        terminal.draw(|frame| {
            super::ui::draw(frame, &app);
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => app.should_quit = true,
                        KeyCode::Char('s') => {
                            app.running = false;
                            app.step();
                        }
                        KeyCode::Char('r') => app.run(),
                        KeyCode::Char('p') => {
                            app.running = false;
                            app.status = "Paused.".into();
                        }
                        KeyCode::Char('b') => app.toggle_breakpoint(),
                        KeyCode::Char('c') => app.resume(),
                        KeyCode::Char('x') => app.reset(),
                        KeyCode::Char('t') => app.follow_stack(),
                        KeyCode::Up => app.scroll_memory(-1),
                        KeyCode::Down => app.scroll_memory(1),
                        KeyCode::PageUp => app.scroll_memory(-16),
                        KeyCode::PageDown => app.scroll_memory(16),
                        _ => {}
                    }
                }
            }
        }

        if app.running {
            app.tick();
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::demos;

    fn app_for(demo: demos::Demo) -> DebuggerApp {
        DebuggerApp::new(demo.memory().unwrap(), CpuConfig::default())
    }

    #[test]
    fn test_breakpoint_stops_run() {
        let mut app = app_for(demos::add());
        // Third instruction (ADD) starts at 8
        app.cpu.set_register(Register::Ip, 8);
        app.toggle_breakpoint();
        app.reset();

        app.run();
        for _ in 0..10 {
            app.tick();
        }

        assert!(!app.running);
        assert_eq!(app.cpu.register(Register::Ip), 8);
        assert_eq!(app.cpu.cycles, 2);
    }

    #[test]
    fn test_reset_restores_memory() {
        let mut app = app_for(demos::counting_loop());
        for _ in 0..5 {
            app.step();
        }
        assert_eq!(app.cpu.memory().read16(demos::LOOP_COUNTER_ADDR).unwrap(), 1);

        app.reset();
        assert_eq!(app.cpu.memory().read16(demos::LOOP_COUNTER_ADDR).unwrap(), 0);
        assert!(app.cpu.observer().is_empty());
    }

    #[test]
    fn test_disassembly_marks_ip() {
        let mut app = app_for(demos::stack());
        app.step();
        app.step();

        let lines = app.get_disassembly(6);
        let current: Vec<_> = lines.iter().filter(|(_, _, cur)| *cur).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].0, 8);
        assert_eq!(current[0].1, "PSH R1");
    }

    #[test]
    fn test_step_records_events() {
        let mut app = app_for(demos::stack());
        app.step();
        assert_eq!(app.cpu.observer().len(), 1);
        assert!(app.status.contains("MOV $5151, R1"));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut app = app_for(demos::add());
        app.scroll_memory(-5);
        assert_eq!(app.mem_scroll, 0);
        app.scroll_memory(1000);
        assert_eq!(app.mem_scroll, 256 / ROW_BYTES - 1);
    }
}
