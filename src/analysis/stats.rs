//! Small statistics helpers shared by the detectors.

use crate::types::{Outcome, PickRecord};

/// Below this a standard deviation is treated as zero.
pub const STD_DEV_EPSILON: f64 = 1e-9;

/// Win/loss/push counts for a slice of picks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeTally {
    pub wins: usize,
    pub losses: usize,
    pub pushes: usize,
}

impl OutcomeTally {
    pub fn from_picks(picks: &[&PickRecord]) -> Self {
        let mut tally = Self::default();
        for p in picks {
            match p.outcome {
                Outcome::Win => tally.wins += 1,
                Outcome::Loss => tally.losses += 1,
                Outcome::Push => tally.pushes += 1,
            }
        }
        tally
    }

    /// Wins + losses. Pushes never enter a denominator.
    pub fn decided(&self) -> usize {
        self.wins + self.losses
    }

    /// wins / decided, or `None` when nothing was decided.
    pub fn win_rate(&self) -> Option<f64> {
        match self.decided() {
            0 => None,
            n => Some(self.wins as f64 / n as f64),
        }
    }
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (N denominator) around `mean`.
pub fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Most frequent value. Ties go to the value seen first.
pub fn mode<T: PartialEq + Copy>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for v in values {
        match counts.iter_mut().find(|(seen, _)| *seen == v) {
            Some((_, n)) => *n += 1,
            None => counts.push((v, 1)),
        }
    }

    let mut best: Option<(T, usize)> = None;
    for (v, n) in counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((v, n));
        }
    }
    best.map(|(v, _)| v)
}
