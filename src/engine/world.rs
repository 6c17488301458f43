use std::collections::{HashMap, HashSet};

use nalgebra::{Point2, Vector2};
use rand::Rng;

use crate::core::domain::{AtomKind, Body, BodyId, Params};
use crate::core::spatial;
use crate::engine::events::{CollisionHandler, ContactPair, PairId};
use crate::error::{ReactorError, Result};

// --- Solver Constants ---
const PENETRATION_SLOP: f64 = 0.05;
const POSITION_CORRECTION: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BondId(pub usize);

/// A distance constraint linking two bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bond {
    pub id: BondId,
    pub body_a: BodyId,
    pub body_b: BodyId,
    pub length: f64,
    /// 0 means rigid; (0, 1] blends the correction per step.
    pub stiffness: f64,
}

impl Bond {
    fn effective_stiffness(&self) -> f64 {
        if self.stiffness <= 0.0 { 1.0 } else { self.stiffness.min(1.0) }
    }

    pub fn links(&self, a: BodyId, b: BodyId) -> bool {
        (self.body_a == a && self.body_b == b) || (self.body_a == b && self.body_b == a)
    }
}

/// A bounded, gravity-free 2D world of circular atoms.
#[derive(Debug, Clone)]
pub struct World {
    pub width: f64,
    pub height: f64,
    bodies: Vec<Body>,
    bonds: Vec<Bond>,
    next_bond: usize,
    contacts: HashMap<PairId, ContactPair>,
    steps: u64,
}

impl World {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            bodies: Vec::new(),
            bonds: Vec::new(),
            next_bond: 0,
            contacts: HashMap::new(),
            steps: 0,
        }
    }

    /// Builds the initial layout: one column of `atoms_per_kind` atoms per kind,
    /// random radius and velocity drawn from `rng`.
    pub fn populate<R: Rng + ?Sized>(params: &Params, rng: &mut R) -> Self {
        let mut world = World::new(params.width, params.height);
        let columns = AtomKind::ALL.len() as f64 + 1.0;
        let spacing = 2.0 * params.radius_max + 10.0;

        for kind in AtomKind::ALL {
            let x = params.width * (kind.index() as f64 + 1.0) / columns;
            for row in 0..params.atoms_per_kind {
                let y = 50.0 + params.radius_max + row as f64 * spacing;
                let radius = if params.radius_max > params.radius_min {
                    rng.gen_range(params.radius_min..params.radius_max)
                } else {
                    params.radius_min
                };
                let velocity = if params.speed_max > 0.0 {
                    Vector2::new(
                        rng.gen_range(-params.speed_max..params.speed_max),
                        rng.gen_range(-params.speed_max..params.speed_max),
                    )
                } else {
                    Vector2::zeros()
                };
                let id = world.add_atom(kind, Point2::new(x, y), radius, velocity);
                if let Some(body) = world.body_mut(id) {
                    spatial::reflect_in_bounds(body, params.width, params.height);
                }
            }
        }

        log::info!("Populated world with {} atoms", world.bodies.len());
        world
    }

    // --- Bodies ---

    pub fn add_atom(&mut self, kind: AtomKind, position: Point2<f64>, radius: f64, velocity: Vector2<f64>) -> BodyId {
        let id = BodyId(self.bodies.len());
        let mut body = Body::new(id, kind, position, radius);
        body.velocity = velocity;
        self.bodies.push(body);
        id
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.0)
    }

    /// Two distinct bodies, mutably, in the order requested.
    pub fn pair_mut(&mut self, a: BodyId, b: BodyId) -> Option<(&mut Body, &mut Body)> {
        if a == b || a.0 >= self.bodies.len() || b.0 >= self.bodies.len() {
            return None;
        }
        if a.0 < b.0 {
            let (left, right) = self.bodies.split_at_mut(b.0);
            Some((&mut left[a.0], &mut right[0]))
        } else {
            let (left, right) = self.bodies.split_at_mut(a.0);
            Some((&mut right[0], &mut left[b.0]))
        }
    }

    // --- Bonds ---

    pub fn add_bond(&mut self, a: BodyId, b: BodyId, length: f64, stiffness: f64) -> Result<BondId> {
        if a == b {
            return Err(ReactorError::SelfBond(a));
        }
        for id in [a, b] {
            if self.body(id).is_none() {
                return Err(ReactorError::UnknownBody(id));
            }
        }

        let id = BondId(self.next_bond);
        self.next_bond += 1;
        self.bonds.push(Bond { id, body_a: a, body_b: b, length, stiffness });
        Ok(id)
    }

    pub fn remove_bond(&mut self, id: BondId) -> Option<Bond> {
        let idx = self.bonds.iter().position(|b| b.id == id)?;
        Some(self.bonds.remove(idx))
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn bond_between(&self, a: BodyId, b: BodyId) -> Option<BondId> {
        self.bonds.iter().find(|bond| bond.links(a, b)).map(|bond| bond.id)
    }

    // --- Stepping ---

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Pairs currently in contact, as of the last step.
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_touching(&self, a: BodyId, b: BodyId) -> bool {
        self.contacts.contains_key(&PairId::new(a, b))
    }

    /// Advances the world by one fixed step, reporting contacts to `handler`.
    pub fn step<H: CollisionHandler + ?Sized>(&mut self, handler: &mut H) {
        self.steps += 1;

        for body in &mut self.bodies {
            body.position += body.velocity;
            spatial::reflect_in_bounds(body, self.width, self.height);
        }

        let current = self.detect_contacts();
        let current_ids: HashSet<PairId> = current.iter().map(|c| c.id).collect();

        let (active, started): (Vec<ContactPair>, Vec<ContactPair>) =
            current.iter().partition(|c| self.contacts.contains_key(&c.id));

        let mut ended: Vec<ContactPair> = self.contacts.values()
            .filter(|c| !current_ids.contains(&c.id))
            .copied()
            .collect();
        ended.sort_by_key(|c| c.id);

        self.contacts = current.iter().map(|c| (c.id, *c)).collect();

        if !started.is_empty() {
            handler.collision_start(self, &started);
        }

        self.resolve_positions(&current);
        self.solve_bonds();
        self.resolve_velocities(&current);

        if !active.is_empty() {
            handler.collision_active(self, &active);
        }
        if !ended.is_empty() {
            handler.collision_end(self, &ended);
        }
    }

    /// All-pairs circle test, ordered by (lower id, higher id).
    fn detect_contacts(&self) -> Vec<ContactPair> {
        let mut out = Vec::new();
        let n = self.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let a = &self.bodies[i];
                let b = &self.bodies[j];
                if let Some(o) = spatial::circle_overlap(&a.position, a.radius, &b.position, b.radius) {
                    out.push(ContactPair {
                        id: PairId::new(a.id, b.id),
                        body_a: a.id,
                        body_b: b.id,
                        normal: o.normal,
                        depth: o.depth,
                    });
                }
            }
        }
        out
    }

    fn resolve_positions(&mut self, contacts: &[ContactPair]) {
        for c in contacts {
            let Some((a, b)) = self.pair_mut(c.body_a, c.body_b) else { continue };
            let Some(o) = spatial::circle_overlap(&a.position, a.radius, &b.position, b.radius) else { continue };
            let excess = o.depth - PENETRATION_SLOP;
            let inv_total = a.inverse_mass() + b.inverse_mass();
            if excess <= 0.0 || inv_total <= 0.0 {
                continue;
            }

            let correction = o.normal * (excess * POSITION_CORRECTION / inv_total);
            a.position -= correction * a.inverse_mass();
            b.position += correction * b.inverse_mass();
        }
    }

    fn solve_bonds(&mut self) {
        let bonds = self.bonds.clone();
        for bond in &bonds {
            let stiffness = bond.effective_stiffness();
            let Some((a, b)) = self.pair_mut(bond.body_a, bond.body_b) else { continue };

            let delta = b.position - a.position;
            let dist = delta.norm();
            let inv_a = a.inverse_mass();
            let inv_b = b.inverse_mass();
            let inv_total = inv_a + inv_b;
            if dist < 1e-9 || inv_total <= 0.0 {
                continue;
            }
            let axis = delta / dist;

            // Pull or push to rest length.
            let error = (dist - bond.length) * stiffness;
            a.position += axis * (error * inv_a / inv_total);
            b.position -= axis * (error * inv_b / inv_total);

            // Remove the relative velocity along the bond axis.
            let closing = (b.velocity - a.velocity).dot(&axis) * stiffness;
            let impulse = closing / inv_total;
            a.velocity += axis * (impulse * inv_a);
            b.velocity -= axis * (impulse * inv_b);
        }
    }

    fn resolve_velocities(&mut self, contacts: &[ContactPair]) {
        for c in contacts {
            let Some((a, b)) = self.pair_mut(c.body_a, c.body_b) else { continue };
            let delta = b.position - a.position;
            let dist = delta.norm();
            let normal = if dist > 1e-9 { delta / dist } else { c.normal };

            let approach = (b.velocity - a.velocity).dot(&normal);
            let inv_total = a.inverse_mass() + b.inverse_mass();
            if approach >= 0.0 || inv_total <= 0.0 {
                continue;
            }

            let restitution = a.restitution.min(b.restitution);
            let j = -(1.0 + restitution) * approach / inv_total;
            a.velocity -= normal * (j * a.inverse_mass());
            b.velocity += normal * (j * b.inverse_mass());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_mut_respects_requested_order() {
        let mut w = World::new(100.0, 100.0);
        let a = w.add_atom(AtomKind::A, Point2::new(10.0, 10.0), 5.0, Vector2::zeros());
        let b = w.add_atom(AtomKind::B, Point2::new(50.0, 50.0), 5.0, Vector2::zeros());

        let (x, y) = w.pair_mut(b, a).unwrap();
        assert_eq!(x.id, b);
        assert_eq!(y.id, a);
        assert!(w.pair_mut(a, a).is_none());
    }

    #[test]
    fn head_on_collision_swaps_equal_velocities() {
        let mut w = World::new(200.0, 200.0);
        let a = w.add_atom(AtomKind::A, Point2::new(90.0, 100.0), 10.0, Vector2::new(2.0, 0.0));
        let b = w.add_atom(AtomKind::B, Point2::new(110.5, 100.0), 10.0, Vector2::new(-2.0, 0.0));

        w.step(&mut ());

        assert!((w.body(a).unwrap().velocity.x + 2.0).abs() < 1e-9);
        assert!((w.body(b).unwrap().velocity.x - 2.0).abs() < 1e-9);
    }
}
