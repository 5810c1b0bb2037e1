//! Position within the script, gated by the pause flag

use thiserror::Error;

/// Why a navigation step did not move the cursor
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavBlocked {
    #[error("Cannot go back! Script paused.")]
    BackPaused,
    #[error("Cannot go back! At beginning.")]
    AtBeginning,
    #[error("Cannot go forward! Script paused.")]
    ForwardPaused,
    #[error("Cannot go forward! At end.")]
    AtEnd,
}

/// Cursor over a script of `len` lines
///
/// Invariant: `line < len` whenever `len > 0`; with no lines the cursor sits
/// at 0 and every step is blocked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    line: usize,
    len: usize,
    paused: bool,
}

impl Cursor {
    pub fn new(len: usize) -> Self {
        Self {
            line: 0,
            len,
            paused: false,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn last_line(&self) -> usize {
        self.len.saturating_sub(1)
    }

    /// Point at a freshly loaded script; keeps the pause flag
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.line = 0;
    }

    pub fn back(&mut self) -> Result<usize, NavBlocked> {
        if self.paused {
            return Err(NavBlocked::BackPaused);
        }
        if self.line == 0 {
            return Err(NavBlocked::AtBeginning);
        }
        self.line -= 1;
        Ok(self.line)
    }

    pub fn forward(&mut self) -> Result<usize, NavBlocked> {
        if self.paused {
            return Err(NavBlocked::ForwardPaused);
        }
        if self.line >= self.last_line() {
            return Err(NavBlocked::AtEnd);
        }
        self.line += 1;
        Ok(self.line)
    }

    /// Jump to the first line, paused or not
    pub fn jump_start(&mut self) -> usize {
        self.line = 0;
        self.line
    }

    /// Jump to the last line, paused or not
    pub fn jump_end(&mut self) -> usize {
        self.line = self.last_line();
        self.line
    }

    /// Flip the pause flag; returns the new value
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }
}
