use std::f64::consts::PI;
use std::fmt;

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

// --- Constants ---
pub const MAX_STATE: u32 = 9;
pub const ATOM_DENSITY: f64 = 0.001;

// --- Atom Types ---

/// The enumerated atom kinds available to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AtomKind {
    A,
    B,
    C,
    D,
    E,
}

impl AtomKind {
    pub const ALL: [AtomKind; 5] = [AtomKind::A, AtomKind::B, AtomKind::C, AtomKind::D, AtomKind::E];

    pub fn symbol(self) -> &'static str {
        match self {
            AtomKind::A => "A",
            AtomKind::B => "B",
            AtomKind::C => "C",
            AtomKind::D => "D",
            AtomKind::E => "E",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Fill colour used by the canvas.
    pub fn color_rgb(self) -> (u8, u8, u8) {
        match self {
            AtomKind::A => (204, 56, 56),
            AtomKind::B => (145, 26, 37),
            AtomKind::C => (34, 47, 61),
            AtomKind::D => (148, 193, 49),
            AtomKind::E => (27, 154, 145),
        }
    }

    /// Cycles forward through `ALL`, wrapping at the end.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for AtomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A (kind, state) pair identifying a reactant or product role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub kind: AtomKind,
    pub state: u32,
}

impl Signature {
    pub fn new(kind: AtomKind, state: u32) -> Self {
        Self { kind, state }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.state)
    }
}

/// The reaction-relevant tag carried by every body.
/// `kind` never changes after creation; `state` starts at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atom {
    pub kind: AtomKind,
    pub state: u32,
}

impl Atom {
    pub fn new(kind: AtomKind) -> Self {
        Self { kind, state: 0 }
    }

    pub fn signature(&self) -> Signature {
        Signature::new(self.kind, self.state)
    }
}

// --- Physics Types ---

/// Stable handle of a body inside its world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub usize);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A circular atom body. Velocity is expressed in world units per step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub atom: Atom,
    pub position: Point2<f64>,
    pub velocity: Vector2<f64>,
    pub radius: f64,
    pub mass: f64,
    pub restitution: f64,
}

impl Body {
    pub fn new(id: BodyId, kind: AtomKind, position: Point2<f64>, radius: f64) -> Self {
        Self {
            id,
            atom: Atom::new(kind),
            position,
            velocity: Vector2::zeros(),
            radius,
            mass: ATOM_DENSITY * PI * radius * radius,
            restitution: 1.0,
        }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    pub fn inverse_mass(&self) -> f64 {
        if self.mass > 0.0 { 1.0 / self.mass } else { 0.0 }
    }
}

// --- Reaction Rules ---

/// A user-configured reaction between two reactant signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRule {
    pub first_reactant: Signature,
    pub second_reactant: Signature,
    pub bonded_before: bool,
    pub bonded_after: bool,
    pub first_product: Signature,
    pub second_product: Signature,
}

impl Default for ReactionRule {
    fn default() -> Self {
        Self {
            first_reactant: Signature::new(AtomKind::A, 0),
            second_reactant: Signature::new(AtomKind::B, 0),
            bonded_before: false,
            bonded_after: true,
            first_product: Signature::new(AtomKind::A, 1),
            second_product: Signature::new(AtomKind::B, 1),
        }
    }
}

impl fmt::Display for ReactionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let link = |bonded: bool| if bonded { "-" } else { " + " };
        write!(
            f,
            "{}{}{} => {}{}{}",
            self.first_reactant,
            link(self.bonded_before),
            self.second_reactant,
            self.first_product,
            link(self.bonded_after),
            self.second_product
        )
    }
}

// --- Configuration Types ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    pub seed: u64,

    // World
    pub width: f64,
    pub height: f64,
    pub atoms_per_kind: usize,

    // Spawning
    pub radius_min: f64,
    pub radius_max: f64,
    pub speed_max: f64, // Per-axis bound on the initial velocity

    // Loop
    pub tick_rate_ms: u64,
    pub steps_per_tick: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 600.0,
            height: 600.0,
            atoms_per_kind: 10,
            radius_min: 14.0,
            radius_max: 20.0,
            speed_max: 5.0,
            tick_rate_ms: 50,
            steps_per_tick: 1,
        }
    }
}
