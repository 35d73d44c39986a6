//! One half-period of the heating schedule

use heapless::Vec;

use crate::heater::HeaterId;

/// Heaters driven on during one half-period
///
/// Counts of even (top bank) and odd (bottom bank) members are kept as
/// members are added. Frames only grow while a schedule is being built;
/// a committed schedule is never edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatFrame<const N: usize> {
    members: Vec<HeaterId, N>,
    even: u8,
    odd: u8,
}

impl<const N: usize> Default for HeatFrame<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> HeatFrame<N> {
    /// Create an empty frame
    pub const fn new() -> Self {
        Self {
            members: Vec::new(),
            even: 0,
            odd: 0,
        }
    }

    /// Add a heater to this frame
    ///
    /// Returns `false` (and leaves the frame unchanged) if the frame
    /// already holds `N` heaters.
    pub fn add(&mut self, heater: HeaterId) -> bool {
        if self.members.push(heater).is_err() {
            return false;
        }

        if heater.is_multiple_of(2) {
            self.even = self.even.saturating_add(1);
        } else {
            self.odd = self.odd.saturating_add(1);
        }
        true
    }

    /// Heaters on during this half-period, in insertion order
    pub fn members(&self) -> &[HeaterId] {
        &self.members
    }

    /// Check if `heater` is on during this half-period
    pub fn contains(&self, heater: HeaterId) -> bool {
        self.members.contains(&heater)
    }

    /// Number of even-numbered (top) heaters on
    pub fn even_count(&self) -> u8 {
        self.even
    }

    /// Number of odd-numbered (bottom) heaters on
    pub fn odd_count(&self) -> u8 {
        self.odd
    }

    /// Total heaters on
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if no heater is on
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<'a, const N: usize> IntoIterator for &'a HeatFrame<N> {
    type Item = &'a HeaterId;
    type IntoIter = core::slice::Iter<'a, HeaterId>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parity_counts() {
        let mut frame = HeatFrame::<8>::new();
        assert!(frame.is_empty());

        frame.add(0);
        frame.add(3);
        frame.add(4);
        frame.add(6);

        assert_eq!(frame.even_count(), 3);
        assert_eq!(frame.odd_count(), 1);
        assert_eq!(frame.len(), 4);
        assert_eq!(frame.members(), &[0, 3, 4, 6]);
    }

    #[test]
    fn test_contains() {
        let mut frame = HeatFrame::<4>::new();
        frame.add(1);
        assert!(frame.contains(1));
        assert!(!frame.contains(2));
    }

    #[test]
    fn test_full_frame_rejects() {
        let mut frame = HeatFrame::<2>::new();
        assert!(frame.add(0));
        assert!(frame.add(1));
        assert!(!frame.add(2));

        assert_eq!(frame.len(), 2);
        assert_eq!(frame.even_count(), 1);
        assert_eq!(frame.odd_count(), 1);
    }

    #[test]
    fn test_iterate_members() {
        let mut frame = HeatFrame::<4>::new();
        frame.add(2);
        frame.add(5);

        let mut sum = 0;
        for &heater in &frame {
            sum += heater;
        }
        assert_eq!(sum, 7);
    }
}
