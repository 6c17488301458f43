use std::fmt;

use nalgebra::Vector2;

use crate::core::domain::BodyId;
use crate::engine::world::World;

/// Identifier of a contact, stable for as long as the two bodies touch.
/// Always stores the lower body id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairId {
    low: BodyId,
    high: BodyId,
}

impl PairId {
    pub fn new(a: BodyId, b: BodyId) -> Self {
        if a <= b { Self { low: a, high: b } } else { Self { low: b, high: a } }
    }

    pub fn bodies(&self) -> (BodyId, BodyId) {
        (self.low, self.high)
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.low.0, self.high.0)
    }
}

/// A contact reported by the world during a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPair {
    pub id: PairId,
    pub body_a: BodyId,
    pub body_b: BodyId,
    /// Unit normal from A to B at detection time.
    pub normal: Vector2<f64>,
    pub depth: f64,
}

/// Receives the collision event streams of a `World` step.
///
/// Within one step the world calls `collision_start` before it resolves
/// velocities, then `collision_active` and `collision_end` afterwards.
pub trait CollisionHandler {
    /// Pairs that began touching this step.
    fn collision_start(&mut self, _world: &mut World, _pairs: &[ContactPair]) {}

    /// Pairs that were touching last step and still are.
    fn collision_active(&mut self, _world: &mut World, _pairs: &[ContactPair]) {}

    /// Pairs that touched last step but no longer do.
    fn collision_end(&mut self, _world: &mut World, _pairs: &[ContactPair]) {}
}

/// Plain physics with no listeners.
impl CollisionHandler for () {}
