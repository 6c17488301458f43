use std::collections::BTreeMap;

use crate::core::domain::AtomKind;
use crate::engine::world::World;

/// Population snapshot of a world.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Census {
    /// Atom count per (kind, state).
    pub populations: BTreeMap<(AtomKind, u32), usize>,
    pub atoms: usize,
    pub bonds: usize,
    /// Connected components of the bond graph with two or more atoms.
    pub molecules: usize,
    /// Atom count of the largest molecule (1 if nothing is bonded).
    pub largest_molecule: usize,
}

impl Census {
    pub fn take(world: &World) -> Self {
        let bodies = world.bodies();
        let n = bodies.len();

        let mut populations = BTreeMap::new();
        for body in bodies {
            *populations.entry((body.atom.kind, body.atom.state)).or_insert(0) += 1;
        }

        // Adjacency of the bond graph
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
        for bond in world.bonds() {
            let (i, j) = (bond.body_a.0, bond.body_b.0);
            if i < n && j < n {
                adjacency[i].push(j);
                adjacency[j].push(i);
            }
        }

        let mut seen = vec![false; n];
        let mut molecules = 0;
        let mut largest = if n > 0 { 1 } else { 0 };
        for start in 0..n {
            if seen[start] || adjacency[start].is_empty() {
                continue;
            }
            seen[start] = true;
            let mut stack = vec![start];
            let mut size = 0;
            while let Some(i) = stack.pop() {
                size += 1;
                for &j in &adjacency[i] {
                    if !seen[j] {
                        seen[j] = true;
                        stack.push(j);
                    }
                }
            }
            molecules += 1;
            largest = largest.max(size);
        }

        Self {
            populations,
            atoms: n,
            bonds: world.bonds().len(),
            molecules,
            largest_molecule: largest,
        }
    }

    pub fn count(&self, kind: AtomKind, state: u32) -> usize {
        self.populations.get(&(kind, state)).copied().unwrap_or(0)
    }
}
