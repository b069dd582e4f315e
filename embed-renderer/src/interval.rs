//! Numeric range membership.

use std::ops::{Bound, RangeBounds};

/// A range over an ordered type with independently open, closed or unbounded
/// ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval<T> {
    start: Bound<T>,
    end: Bound<T>,
}

impl<T: PartialOrd> Interval<T> {
    pub fn new(start: Bound<T>, end: Bound<T>) -> Self {
        Self { start, end }
    }

    /// `[start, end)`
    pub fn half_open(start: T, end: T) -> Self {
        Self::new(Bound::Included(start), Bound::Excluded(end))
    }

    /// `[start, end]`
    pub fn closed(start: T, end: T) -> Self {
        Self::new(Bound::Included(start), Bound::Included(end))
    }

    /// `[start, ∞)`
    pub fn at_least(start: T) -> Self {
        Self::new(Bound::Included(start), Bound::Unbounded)
    }

    pub fn contains_value(&self, value: &T) -> bool {
        RangeBounds::contains(self, value)
    }
}

impl<T> RangeBounds<T> for Interval<T> {
    fn start_bound(&self) -> Bound<&T> {
        self.start.as_ref()
    }

    fn end_bound(&self) -> Bound<&T> {
        self.end.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_open_excludes_end() {
        let range = Interval::half_open(100u64, 500);
        assert!(!range.contains_value(&99));
        assert!(range.contains_value(&100));
        assert!(range.contains_value(&499));
        assert!(!range.contains_value(&500));
    }

    #[test]
    fn test_closed_includes_both_ends() {
        let range = Interval::closed(1i64, 3);
        assert!(range.contains_value(&1));
        assert!(range.contains_value(&3));
        assert!(!range.contains_value(&4));
    }

    #[test]
    fn test_at_least_is_unbounded_above() {
        let range = Interval::at_least(1800u64);
        assert!(!range.contains_value(&1799));
        assert!(range.contains_value(&1800));
        assert!(range.contains_value(&u64::MAX));
    }

    #[test]
    fn test_exclusive_start() {
        let range = Interval::new(Bound::Excluded(0.0f64), Bound::Unbounded);
        assert!(!range.contains_value(&0.0));
        assert!(range.contains_value(&0.1));
    }
}
