use std::collections::HashMap;

use crate::core::spatial::momentum_magnitude;
use crate::engine::events::{ContactPair, PairId};
use crate::engine::world::World;
use crate::reactions::MOMENTUM_TOLERANCE;

/// Result of one correction pass over an active pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    pub ratio: f64,
    pub recorded: f64,
    pub corrected: f64,
}

impl Correction {
    pub fn drifted(&self) -> bool {
        (self.recorded - self.corrected).abs() > MOMENTUM_TOLERANCE
    }
}

/// Pre-collision momentum per contact, from collision start until collision end.
#[derive(Debug, Clone, Default)]
pub struct MomentumLedger {
    records: HashMap<PairId, f64>,
}

impl MomentumLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the pair's momentum magnitude as of now.
    pub fn record(&mut self, world: &World, pair: &ContactPair) -> Option<f64> {
        let a = world.body(pair.body_a)?;
        let b = world.body(pair.body_b)?;
        let p = momentum_magnitude(a, b);
        self.records.insert(pair.id, p);
        Some(p)
    }

    pub fn recorded(&self, id: PairId) -> Option<f64> {
        self.records.get(&id).copied()
    }

    /// Rescales both velocities so the pair's momentum magnitude returns to
    /// the recorded value.
    ///
    /// Skipped (returns `None`) when there is no record, the record is zero,
    /// or the current momentum is zero or not finite.
    pub fn correct(&self, world: &mut World, pair: &ContactPair) -> Option<Correction> {
        let recorded = self.recorded(pair.id)?;
        if recorded == 0.0 || !recorded.is_finite() {
            return None;
        }

        let (a, b) = world.pair_mut(pair.body_a, pair.body_b)?;
        let current = momentum_magnitude(a, b);
        if current <= 0.0 || !current.is_finite() {
            return None;
        }

        let ratio = recorded / current;
        a.velocity *= ratio;
        b.velocity *= ratio;

        let corrected = momentum_magnitude(a, b);
        let correction = Correction { ratio, recorded, corrected };
        if correction.drifted() {
            log::warn!(
                "Momentum mismatch on pair {}: recorded {:.5}, corrected {:.5}",
                pair.id, recorded, corrected
            );
        }
        Some(correction)
    }

    pub fn forget(&mut self, id: PairId) -> Option<f64> {
        self.records.remove(&id)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
