use crate::core::chemistry::Orientation;
use crate::core::domain::{ReactionRule, Signature};
use crate::engine::events::ContactPair;
use crate::engine::world::{BondId, World};
use crate::reactions::{BOND_OVERLAP, BOND_STIFFNESS};

/// What one matching rule did to a pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionOutcome {
    pub rule_index: usize,
    pub orientation: Orientation,
    pub products: (Signature, Signature),
    pub bond: Option<BondId>,
}

/// Runs every collision rule, in list order, against a newly touching pair.
///
/// Rules with `bonded_before` are skipped here; they only act through the
/// bond toggle. Each rule is matched against the atoms' live states, so the
/// products of an earlier rule can be picked up by a later one in the same
/// pass. Returns one outcome per rule that fired, in firing order.
pub fn resolve_contact(world: &mut World, pair: &ContactPair, rules: &[ReactionRule]) -> Vec<ReactionOutcome> {
    let mut outcomes = Vec::new();
    let rest_length = match (world.body(pair.body_a), world.body(pair.body_b)) {
        (Some(a), Some(b)) => a.radius + b.radius - BOND_OVERLAP,
        _ => return outcomes,
    };

    for (rule_index, rule) in rules.iter().enumerate().filter(|(_, r)| !r.bonded_before) {
        let Some((a, b)) = world.pair_mut(pair.body_a, pair.body_b) else { break };
        let Some(orientation) = rule.orient(&a.atom, &b.atom) else { continue };
        rule.apply_products(orientation, &mut a.atom, &mut b.atom);

        let mut bond = None;
        if rule.bonded_after {
            if let Some(existing) = world.bond_between(pair.body_a, pair.body_b) {
                log::debug!("Pair {} already bonded ({:?}); not adding another", pair.id, existing);
            } else {
                match world.add_bond(pair.body_a, pair.body_b, rest_length, BOND_STIFFNESS) {
                    Ok(id) => bond = Some(id),
                    Err(e) => log::warn!("Bond request for pair {} rejected: {}", pair.id, e),
                }
            }
        }

        let products = rule.products(orientation);
        log::debug!("Rule #{} [{}] fired on pair {} -> {} / {}", rule_index, rule, pair.id, products.0, products.1);
        outcomes.push(ReactionOutcome { rule_index, orientation, products, bond });
    }

    outcomes
}
