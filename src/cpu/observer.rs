//! Execution events and the observers that receive them.
//!
//! The CPU never prints. Front-ends that want a trace (the TUI event pane,
//! the CLI `--trace` flag, the web page) plug in an [`Observer`].

use std::collections::VecDeque;

use crate::cpu::decode::Instruction;
use crate::cpu::execute::CpuError;

/// A state transition reported by the CPU after each `step()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// An instruction ran to completion.
    Executed {
        ip: u16,
        instruction: Instruction,
        cycle: u64,
    },
    /// An unknown opcode was skipped (permissive mode only).
    Ignored { ip: u16, opcode: u8 },
    /// The instruction at `ip` faulted; IP has been rewound to it.
    Faulted { ip: u16, error: CpuError },
}

impl Event {
    /// Address of the opcode the event is about.
    pub fn ip(&self) -> u16 {
        match self {
            Event::Executed { ip, .. } | Event::Ignored { ip, .. } | Event::Faulted { ip, .. } => *ip,
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::Executed { ip, instruction, .. } => write!(f, "{:04X}: {}", ip, instruction),
            Event::Ignored { ip, opcode } => write!(f, "{:04X}: ignored opcode 0x{:02X}", ip, opcode),
            Event::Faulted { ip, error } => write!(f, "{:04X}: fault: {}", ip, error),
        }
    }
}

/// Receives CPU events.
pub trait Observer {
    fn on_event(&mut self, event: &Event);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl Observer for NullObserver {
    #[inline]
    fn on_event(&mut self, _event: &Event) {}
}

impl<O: Observer + ?Sized> Observer for &mut O {
    fn on_event(&mut self, event: &Event) {
        (**self).on_event(event);
    }
}

impl<O: Observer + ?Sized> Observer for Box<O> {
    fn on_event(&mut self, event: &Event) {
        (**self).on_event(event);
    }
}

/// Keeps the most recent events in a bounded ring.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<Event>,
    capacity: usize,
}

impl EventLog {
    /// A log holding at most `capacity` events (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Events, oldest first.
    pub fn events(&self) -> impl DoubleEndedIterator<Item = &Event> + ExactSizeIterator {
        self.events.iter()
    }

    pub fn latest(&self) -> Option<&Event> {
        self.events.back()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Observer for EventLog {
    fn on_event(&mut self, event: &Event) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event.clone());
    }
}
