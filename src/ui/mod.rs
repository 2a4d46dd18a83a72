//! Progress reporting for long-running catalog operations
//!
//! Provides a simple API for displaying the state of an indexing run:
//! - Current phase (loading the mapping, indexing mapped files, fallbacks)
//! - Progress (current/total with a label)
//! - Activity log lines

mod console;

pub use console::ConsoleUi;

/// Indexing phases
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Mapping,
    Indexing,
    Fallback,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Mapping => write!(f, "Loading mint mapping"),
            Phase::Indexing => write!(f, "Indexing mapped files"),
            Phase::Fallback => write!(f, "Indexing unmatched files"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Trait for UI implementations - allows both console and silent/test modes
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn clear_progress(&mut self);
    fn log(&mut self, message: impl Into<String>);
}

/// Silent UI implementation for testing and library use
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, _message: impl Into<String>) {}
}
