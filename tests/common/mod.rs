#![allow(dead_code)]

use atom_reactor::core::domain::{AtomKind, BodyId, ReactionRule, Signature};
use atom_reactor::engine::events::{ContactPair, PairId};
use atom_reactor::engine::world::World;
use nalgebra::{Point2, Vector2};

/// A roomy world holding two resting, overlapping atoms.
pub fn two_atom_world(a: (AtomKind, u32, f64), b: (AtomKind, u32, f64)) -> (World, BodyId, BodyId) {
    let mut world = World::new(600.0, 600.0);
    let id_a = world.add_atom(a.0, Point2::new(200.0, 300.0), a.2, Vector2::zeros());
    let id_b = world.add_atom(b.0, Point2::new(200.0 + a.2 + b.2 - 2.0, 300.0), b.2, Vector2::zeros());
    world.body_mut(id_a).unwrap().atom.state = a.1;
    world.body_mut(id_b).unwrap().atom.state = b.1;
    (world, id_a, id_b)
}

/// Contact record for a pair, as the world would report it.
pub fn contact(a: BodyId, b: BodyId) -> ContactPair {
    ContactPair {
        id: PairId::new(a, b),
        body_a: a,
        body_b: b,
        normal: Vector2::x(),
        depth: 2.0,
    }
}

pub fn rule(
    first: (AtomKind, u32),
    second: (AtomKind, u32),
    bonded_before: bool,
    bonded_after: bool,
    products: ((AtomKind, u32), (AtomKind, u32)),
) -> ReactionRule {
    ReactionRule {
        first_reactant: Signature::new(first.0, first.1),
        second_reactant: Signature::new(second.0, second.1),
        bonded_before,
        bonded_after,
        first_product: Signature::new(products.0 .0, products.0 .1),
        second_product: Signature::new(products.1 .0, products.1 .1),
    }
}

pub fn state_of(world: &World, id: BodyId) -> u32 {
    world.body(id).unwrap().atom.state
}
