use crate::core::domain::{BodyId, ReactionRule, Signature};
use crate::engine::events::PairId;

pub mod bonds;
pub mod momentum;
pub mod reactor;
pub mod resolver;

/// Rest length of a new bond is `r_a + r_b - BOND_OVERLAP`.
pub const BOND_OVERLAP: f64 = 1.0;
/// New bonds are created with zero stiffness, which the world treats as rigid.
pub const BOND_STIFFNESS: f64 = 0.0;
/// Allowed gap between recorded and corrected momentum before warning.
pub const MOMENTUM_TOLERANCE: f64 = 0.001;

/// Events emitted by the collision handlers and the bond toggle.
#[derive(Debug, Clone, PartialEq)]
pub enum ReactionEvent {
    /// A rule matched a newly touching pair.
    Reacted {
        rule: ReactionRule,
        body_a: BodyId,
        body_b: BodyId,
        products: (Signature, Signature),
        bonded: bool,
    },

    /// Velocities of an active pair were rescaled.
    MomentumCorrected { pair: PairId, ratio: f64 },

    /// The corrected momentum still missed the recorded value.
    MomentumDrift { pair: PairId, recorded: f64, corrected: f64 },

    /// A confirmed rule was applied to existing bonds.
    BondsToggled { rule: ReactionRule, transformed: usize, removed: usize },
}

/// Running totals, fed one event at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReactionStats {
    pub reactions: usize,
    pub bonds_formed: usize,
    pub bonds_broken: usize,
    pub corrections: usize,
    pub drift_warnings: usize,
}

impl ReactionStats {
    pub fn ingest(&mut self, event: &ReactionEvent) {
        match event {
            ReactionEvent::Reacted { bonded, .. } => {
                self.reactions += 1;
                if *bonded { self.bonds_formed += 1; }
            }
            ReactionEvent::MomentumCorrected { .. } => self.corrections += 1,
            ReactionEvent::MomentumDrift { .. } => self.drift_warnings += 1,
            ReactionEvent::BondsToggled { transformed, removed, .. } => {
                self.reactions += transformed;
                self.bonds_broken += removed;
            }
        }
    }
}
