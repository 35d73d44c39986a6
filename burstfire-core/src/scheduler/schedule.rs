//! Schedule construction and bank load analysis
//!
//! # Placement
//!
//! Heaters are placed in index order. A heater at `d` % takes the next `d`
//! frames from a cursor shared by all heaters, wrapping at the end of the
//! second:
//!
//! ```text
//! heater 0 @ 30 %   frames  0..30
//! heater 1 @ 50 %   frames 30..80
//! heater 2 @ 40 %   frames 80..100, 0..20
//! ```
//!
//! Because the cursor is not reset per heater, on-time is spread over the
//! whole second instead of stacking every heater at frame 0, which keeps
//! the number of simultaneously energized heaters low.

use crate::heater::{HeaterId, Power, MAX_POWER};

use super::frame::HeatFrame;
use super::FRAME_COUNT;

/// Peak number of heaters on at the same time, per bank
///
/// The two peaks are taken independently and need not fall in the same
/// half-period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BankLoad {
    /// Even-numbered heaters (top bank)
    pub even: u8,
    /// Odd-numbered heaters (bottom bank)
    pub odd: u8,
}

impl BankLoad {
    /// Peak for the top (even) bank
    pub const fn top(&self) -> u8 {
        self.even
    }

    /// Peak for the bottom (odd) bank
    pub const fn bottom(&self) -> u8 {
        self.odd
    }
}

/// One second of half-period frames for up to `N` heaters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule<const N: usize> {
    frames: [HeatFrame<N>; FRAME_COUNT],
}

impl<const N: usize> Default for Schedule<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> Schedule<N> {
    /// Schedule with every heater off
    pub fn empty() -> Self {
        Self {
            frames: core::array::from_fn(|_| HeatFrame::new()),
        }
    }

    /// Frame for half-period `index`, or None past the end of the second
    pub fn frame(&self, index: usize) -> Option<&HeatFrame<N>> {
        self.frames.get(index)
    }

    /// All frames in half-period order
    pub fn frames(&self) -> &[HeatFrame<N>] {
        &self.frames
    }

    /// Number of half-periods `heater` is on during the second
    pub fn on_count(&self, heater: HeaterId) -> usize {
        self.frames.iter().filter(|f| f.contains(heater)).count()
    }
}

/// Build a schedule from per-heater power requests
///
/// `powers[i]` is the request of heater `i`. Requests above
/// [`MAX_POWER`] are treated as [`MAX_POWER`]; heaters past `N` are
/// ignored. Every heater `i` ends up in exactly `powers[i]` frames.
pub fn build_schedule<const N: usize>(powers: &[Power]) -> Schedule<N> {
    let mut schedule = Schedule::empty();
    let mut cursor = 0usize;

    for (heater, &power) in powers.iter().enumerate().take(N) {
        let Ok(id) = HeaterId::try_from(heater) else {
            break;
        };

        for _ in 0..power.min(MAX_POWER) {
            // At most one slot per heater per frame, so a frame never
            // exceeds N members
            schedule.frames[cursor].add(id);

            cursor += 1;
            if cursor >= FRAME_COUNT {
                cursor = 0;
            }
        }
    }

    schedule
}

/// Peak simultaneous heaters per bank over the whole schedule
pub fn peak_bank_load<const N: usize>(schedule: &Schedule<N>) -> BankLoad {
    schedule
        .frames
        .iter()
        .fold(BankLoad::default(), |peak, frame| BankLoad {
            even: peak.even.max(frame.even_count()),
            odd: peak.odd.max(frame.odd_count()),
        })
}
