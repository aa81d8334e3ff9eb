//! UI rendering for the debugger.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, List, ListItem},
    style::{Color, Style, Modifier},
};
use crate::cpu::{Event, Register};
use super::app::{DebuggerApp, ROW_BYTES};

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &DebuggerApp) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(55),
            Constraint::Percentage(45),
        ])
        .split(frame.area());

    // Left side: code, registers, status
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(6),
            Constraint::Length(3),
        ])
        .split(chunks[0]);

    draw_disassembly(frame, left_chunks[0], app);
    draw_registers(frame, left_chunks[1], app);
    draw_status(frame, left_chunks[2], app);

    // Right side: memory, events, help
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(10),
            Constraint::Length(4),
        ])
        .split(chunks[1]);

    draw_memory(frame, right_chunks[0], app);
    draw_events(frame, right_chunks[1], app);
    draw_help(frame, right_chunks[2]);
}

/// Draw disassembly view around IP.
fn draw_disassembly(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let disasm = app.get_disassembly((area.height as usize).saturating_sub(2));

    let items: Vec<ListItem> = disasm
        .iter()
        .map(|(addr, instr, is_current)| {
            let prefix = if *is_current { "▶ " } else { "  " };
            let bp = if app.breakpoints.contains(addr) { "●" } else { " " };
            let text = format!("{}{:04X}: {}", prefix, addr, instr);

            let style = if *is_current {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if app.breakpoints.contains(addr) {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };

            ListItem::new(format!("{} {}", bp, text)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default()
            .title(" Disassembly ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)));

    frame.render_widget(list, area);
}

/// Draw the register file, four per line.
fn draw_registers(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let regs: Vec<(Register, u16)> = app.cpu.registers().iter().collect();

    let mut content: Vec<Line> = regs
        .chunks(4)
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .flat_map(|(reg, value)| {
                    [
                        Span::raw(format!("{:>3}: ", reg)),
                        Span::styled(format!("{:04X}  ", value), register_style(*reg, *value)),
                    ]
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    content.push(Line::from(vec![
        Span::raw("Cycles: "),
        Span::styled(format!("{}", app.cpu.cycles), Style::default().fg(Color::Cyan)),
        Span::raw("   State: "),
        Span::styled(format!("{:?}", app.cpu.state),
            if app.cpu.is_running() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            }),
    ]));

    let paragraph = Paragraph::new(content)
        .block(Block::default()
            .title(" Registers ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)));

    frame.render_widget(paragraph, area);
}

/// Draw memory view, one row of eight bytes per line.
fn draw_memory(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let mem = app.cpu.memory();
    let ip = app.cpu.register(Register::Ip) as usize;
    let sp = app.cpu.register(Register::Sp) as usize;

    let visible_rows = (area.height as usize).saturating_sub(2);
    let rows = mem.len().div_ceil(ROW_BYTES);
    let start = app.mem_scroll.min(rows);
    let end = (start + visible_rows).min(rows);

    let items: Vec<ListItem> = (start..end)
        .map(|row| {
            let base = row * ROW_BYTES;
            let bytes = &mem.as_bytes()[base..(base + ROW_BYTES).min(mem.len())];
            let hex: Vec<String> = bytes.iter().map(|b| format!("{:02X}", b)).collect();
            let text = format!("{:04X}: {}", base, hex.join(" "));

            let holds = |addr: usize| (base..base + ROW_BYTES).contains(&addr);
            let style = if holds(ip) {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if holds(sp) {
                Style::default().fg(Color::Magenta)
            } else if bytes.iter().any(|b| *b != 0) {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            ListItem::new(text).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default()
            .title(" Memory ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)));

    frame.render_widget(list, area);
}

/// Draw the most recent CPU events.
fn draw_events(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let visible = (area.height as usize).saturating_sub(2);
    let log = app.cpu.observer();

    let items: Vec<ListItem> = log
        .events()
        .rev()
        .take(visible)
        .map(|event| {
            let style = match event {
                Event::Executed { .. } => Style::default(),
                Event::Ignored { .. } => Style::default().fg(Color::Yellow),
                Event::Faulted { .. } => Style::default().fg(Color::Red),
            };
            ListItem::new(event.to_string()).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default()
            .title(" Events ")
            .borders(Borders::ALL));

    frame.render_widget(list, area);
}

/// Draw status bar.
fn draw_status(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let status = Paragraph::new(app.status.clone())
        .style(Style::default().fg(Color::White))
        .block(Block::default()
            .title(" Status ")
            .borders(Borders::ALL));

    frame.render_widget(status, area);
}

/// Draw help panel.
fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(vec![
        Line::from("s: Step  r: Run  p: Pause  b: Breakpoint  c: Resume"),
        Line::from("x: Reset  t: Stack  ↑↓/PgUp/PgDn: Scroll  q: Quit"),
    ])
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default()
        .title(" Help ")
        .borders(Borders::ALL));

    frame.render_widget(help, area);
}

/// Highlight special-purpose registers; dim zeroed ones.
fn register_style(reg: Register, value: u16) -> Style {
    match reg {
        Register::Ip => Style::default().fg(Color::Yellow),
        Register::Acc => Style::default().fg(Color::Cyan),
        Register::Sp | Register::Fp => Style::default().fg(Color::Magenta),
        _ if value == 0 => Style::default().fg(Color::DarkGray),
        _ => Style::default().fg(Color::White),
    }
}
