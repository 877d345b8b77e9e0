use std::fmt;

/// Half-open range `[from, to)` of positions in a working index buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Interval {
    /// First position covered.
    pub from: usize,
    /// One past the last position covered.
    pub to: usize,
}

impl Interval {
    /// Create an interval over `[from, to)`.
    ///
    /// # Panics
    ///
    /// Panics if `from > to`.
    #[must_use]
    pub fn new(from: usize, to: usize) -> Self {
        assert!(from <= to, "interval start {from} is past its end {to}");
        Self { from, to }
    }

    /// Interval `[0, len)`.
    #[must_use]
    pub fn of_len(len: usize) -> Self {
        Self { from: 0, to: len }
    }

    /// Number of positions covered.
    #[must_use]
    pub fn len(self) -> usize {
        self.to - self.from
    }

    /// Return true if the interval covers no positions.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.from == self.to
    }

    /// Split into `[from, at)` and `[at, to)`.
    ///
    /// # Panics
    ///
    /// Panics if `at` lies outside the interval.
    #[must_use]
    pub fn split_at(self, at: usize) -> (Interval, Interval) {
        assert!(
            self.from <= at && at <= self.to,
            "split position {at} outside interval {self}"
        );
        (Interval::new(self.from, at), Interval::new(at, self.to))
    }

    /// Iterate over the covered positions.
    pub fn positions(self) -> std::ops::Range<usize> {
        self.from..self.to
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.from, self.to)
    }
}
