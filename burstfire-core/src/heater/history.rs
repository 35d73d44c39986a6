//! Bounded history of realized heater power

use heapless::Deque;

use super::Power;

/// Seconds of realized power kept per heater (10 minutes)
pub const HISTORY_LEN: usize = 600;

/// Ring buffer of completed-second powers, most recent first
///
/// Seconds that have not happened yet read as 0, so a fresh history
/// behaves as if the heater had been off for the whole window.
#[derive(Debug, Clone)]
pub struct PowerHistory {
    entries: Deque<Power, HISTORY_LEN>,
}

impl Default for PowerHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerHistory {
    /// Create an empty history
    pub const fn new() -> Self {
        Self {
            entries: Deque::new(),
        }
    }

    /// Record the power of the second that just completed
    ///
    /// Evicts the oldest entry once the window is full.
    pub fn push(&mut self, power: Power) {
        if self.entries.is_full() {
            self.entries.pop_back();
        }
        // Cannot fail: one slot was freed above if the buffer was full
        let _ = self.entries.push_front(power);
    }

    /// Power realized `offset` seconds before the most recent entry
    pub fn get(&self, offset: usize) -> Power {
        if offset >= HISTORY_LEN {
            return 0;
        }
        self.entries.iter().nth(offset).copied().unwrap_or(0)
    }

    /// Number of completed seconds recorded so far (saturates at the window)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no second has completed yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
