use crate::core::domain::ReactionRule;
use crate::engine::world::World;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleReport {
    /// Bonds whose endpoints matched and had their states rewritten.
    pub transformed: usize,
    /// Of those, bonds removed because the rule leaves them unbonded.
    pub removed: usize,
}

/// Re-evaluates every existing bond against a confirmed rule.
///
/// Only rules with `bonded_before` act here. Matching bonds get the rule's
/// product states and are removed when `bonded_after` is false. Bonds whose
/// endpoints do not match are never touched.
pub fn toggle_bonds(world: &mut World, rule: &ReactionRule) -> ToggleReport {
    let mut report = ToggleReport::default();
    if !rule.bonded_before {
        return report;
    }

    let bonds = world.bonds().to_vec();
    for bond in bonds {
        let Some((a, b)) = world.pair_mut(bond.body_a, bond.body_b) else { continue };
        let Some(orientation) = rule.orient(&a.atom, &b.atom) else { continue };

        rule.apply_products(orientation, &mut a.atom, &mut b.atom);
        report.transformed += 1;

        if !rule.bonded_after {
            world.remove_bond(bond.id);
            report.removed += 1;
        }
    }

    log::info!(
        "Applied [{}] to bonds: {} transformed, {} removed",
        rule, report.transformed, report.removed
    );
    report
}
