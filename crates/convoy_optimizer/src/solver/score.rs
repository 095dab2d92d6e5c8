use std::{
    cmp::Ordering,
    iter,
    ops::{Add, AddAssign, Sub},
};

use serde::Serialize;

/// Value of the objective for a route or a planning; lower is better.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Score(pub f64);

impl Score {
    pub const MAX: Score = Score(f64::MAX);

    pub const ZERO: Score = Score(0.0);

    /// Absolute difference under which two scores are considered equal when
    /// deciding whether a move improves a planning. Scores may be timestamps
    /// in seconds, so the tolerance must not scale with their magnitude.
    pub const TOLERANCE: f64 = 1e-6;

    pub fn new(value: f64) -> Self {
        Score(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn max(self, other: Score) -> Score {
        if self >= other { self } else { other }
    }

    /// Strictly lower than `other`, beyond floating point noise.
    pub fn improves_on(&self, other: &Score) -> bool {
        self.0 < other.0 - Self::TOLERANCE
    }
}

impl Eq for Score {}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl iter::Sum for Score {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, score| acc + score)
    }
}

impl Add<Score> for Score {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Score(self.0 + other.0)
    }
}

impl AddAssign<Score> for Score {
    fn add_assign(&mut self, other: Score) {
        self.0 += other.0;
    }
}

impl Sub<Score> for Score {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Score(self.0 - other.0)
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}
