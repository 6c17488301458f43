use atom_reactor::core::chemistry::Orientation;
use atom_reactor::core::domain::{AtomKind, ReactionRule};
use atom_reactor::reactions::bonds::toggle_bonds;
use atom_reactor::engine::events::CollisionHandler;
use atom_reactor::reactions::momentum::{Correction, MomentumLedger};
use atom_reactor::reactions::reactor::Reactor;
use atom_reactor::reactions::resolver::resolve_contact;
use atom_reactor::reactions::{ReactionEvent, ReactionStats, BOND_OVERLAP, BOND_STIFFNESS, MOMENTUM_TOLERANCE};
use nalgebra::Vector2;

use crate::common::{contact, rule, state_of, two_atom_world};

mod common;

// --- Reaction Resolver ---

#[test]
fn test_bonding_reaction_scenario() {
    let (mut world, a, b) = two_atom_world((AtomKind::A, 0, 15.0), (AtomKind::B, 0, 18.0));
    let rules = vec![ReactionRule::default()];

    let outcomes = resolve_contact(&mut world, &contact(a, b), &rules);
    assert_eq!(outcomes.len(), 1);
    let outcome = outcomes[0];

    assert_eq!(outcome.orientation, Orientation::Forward);
    assert_eq!(world.bonds().len(), 1);
    let bond = world.bonds()[0];
    assert!(bond.links(a, b));
    assert!((bond.length - (15.0 + 18.0 - BOND_OVERLAP)).abs() < 1e-9);
    assert_eq!(bond.stiffness, BOND_STIFFNESS);
    assert_eq!(bond.stiffness, 0.0);
    assert_eq!(Some(bond.id), outcome.bond);

    assert_eq!(state_of(&world, a), 1);
    assert_eq!(state_of(&world, b), 1);
}

#[test]
fn test_reverse_orientation_gets_swapped_products() {
    // Body A is the rule's second reactant.
    let (mut world, a, b) = two_atom_world((AtomKind::B, 0, 15.0), (AtomKind::A, 0, 15.0));
    let rules = vec![rule((AtomKind::A, 0), (AtomKind::B, 0), false, false, ((AtomKind::A, 3), (AtomKind::B, 5)))];

    let outcomes = resolve_contact(&mut world, &contact(a, b), &rules);

    assert_eq!(outcomes[0].orientation, Orientation::Reverse);
    assert_eq!(state_of(&world, a), 5);
    assert_eq!(state_of(&world, b), 3);
    assert!(world.bonds().is_empty());
}

#[test]
fn test_non_bonding_rule_only_changes_state() {
    let (mut world, a, b) = two_atom_world((AtomKind::C, 0, 15.0), (AtomKind::D, 0, 15.0));
    let rules = vec![rule((AtomKind::C, 0), (AtomKind::D, 0), false, false, ((AtomKind::C, 2), (AtomKind::D, 2)))];

    let outcomes = resolve_contact(&mut world, &contact(a, b), &rules);

    assert!(outcomes[0].bond.is_none());
    assert!(world.bonds().is_empty());
    assert_eq!((state_of(&world, a), state_of(&world, b)), (2, 2));
}

#[test]
fn test_non_matching_pair_is_untouched() {
    let (mut world, a, b) = two_atom_world((AtomKind::A, 0, 15.0), (AtomKind::C, 0, 15.0));
    let rules = vec![
        ReactionRule::default(),
        rule((AtomKind::A, 1), (AtomKind::C, 0), false, true, ((AtomKind::A, 2), (AtomKind::C, 2))),
    ];

    assert!(resolve_contact(&mut world, &contact(a, b), &rules).is_empty());
    assert!(world.bonds().is_empty());
    assert_eq!((state_of(&world, a), state_of(&world, b)), (0, 0));
}

#[test]
fn test_bonded_before_rules_ignored_on_collision() {
    let (mut world, a, b) = two_atom_world((AtomKind::A, 0, 15.0), (AtomKind::B, 0, 15.0));
    let rules = vec![rule((AtomKind::A, 0), (AtomKind::B, 0), true, true, ((AtomKind::A, 4), (AtomKind::B, 4)))];

    assert!(resolve_contact(&mut world, &contact(a, b), &rules).is_empty());
    assert_eq!((state_of(&world, a), state_of(&world, b)), (0, 0));
}

#[test]
fn test_later_rules_see_earlier_products() {
    let (mut world, a, b) = two_atom_world((AtomKind::A, 0, 15.0), (AtomKind::B, 0, 15.0));
    let rules = vec![
        rule((AtomKind::A, 0), (AtomKind::B, 0), false, false, ((AtomKind::A, 1), (AtomKind::B, 1))),
        rule((AtomKind::A, 1), (AtomKind::B, 1), false, true, ((AtomKind::A, 2), (AtomKind::B, 2))),
        // Listed after the pair has moved past it; never fires.
        rule((AtomKind::A, 0), (AtomKind::B, 0), false, true, ((AtomKind::A, 7), (AtomKind::B, 7))),
    ];

    let outcomes = resolve_contact(&mut world, &contact(a, b), &rules);

    let fired: Vec<usize> = outcomes.iter().map(|o| o.rule_index).collect();
    assert_eq!(fired, vec![0, 1]);
    assert!(outcomes[0].bond.is_none());
    assert!(outcomes[1].bond.is_some());
    assert_eq!((state_of(&world, a), state_of(&world, b)), (2, 2));
    assert_eq!(world.bonds().len(), 1);
}

#[test]
fn test_cascade_adds_at_most_one_bond() {
    let (mut world, a, b) = two_atom_world((AtomKind::C, 0, 15.0), (AtomKind::C, 0, 15.0));
    let rules = vec![
        rule((AtomKind::C, 0), (AtomKind::C, 0), false, true, ((AtomKind::C, 1), (AtomKind::C, 1))),
        rule((AtomKind::C, 1), (AtomKind::C, 1), false, true, ((AtomKind::C, 2), (AtomKind::C, 3))),
    ];

    let outcomes = resolve_contact(&mut world, &contact(a, b), &rules);

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[1].bond.is_none());
    assert_eq!(world.bonds().len(), 1);
    assert_eq!((state_of(&world, a), state_of(&world, b)), (2, 3));
}

#[test]
fn test_no_duplicate_bond_for_bonded_pair() {
    let (mut world, a, b) = two_atom_world((AtomKind::A, 0, 15.0), (AtomKind::A, 0, 15.0));
    world.add_bond(a, b, 29.0, 0.0).unwrap();
    let rules = vec![rule((AtomKind::A, 0), (AtomKind::A, 0), false, true, ((AtomKind::A, 1), (AtomKind::A, 2)))];

    let outcomes = resolve_contact(&mut world, &contact(a, b), &rules);

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].bond.is_none());
    assert_eq!(world.bonds().len(), 1);
    assert_eq!((state_of(&world, a), state_of(&world, b)), (1, 2));
}

// --- Momentum Corrector ---

fn unit_mass_pair(va: Vector2<f64>, vb: Vector2<f64>) -> (atom_reactor::engine::world::World, atom_reactor::engine::events::ContactPair) {
    let (mut world, a, b) = two_atom_world((AtomKind::A, 0, 15.0), (AtomKind::B, 0, 15.0));
    for (id, v) in [(a, va), (b, vb)] {
        let body = world.body_mut(id).unwrap();
        body.mass = 1.0;
        body.velocity = v;
    }
    (world, contact(a, b))
}

#[test]
fn test_correction_doubles_velocities() {
    let (mut world, pair) = unit_mass_pair(Vector2::new(3.0, 4.0), Vector2::new(0.0, 5.0));
    let mut ledger = MomentumLedger::new();
    let recorded = ledger.record(&world, &pair).unwrap();
    assert!((recorded - 10.0).abs() < 1e-9);

    // Halve both velocities: current momentum 5.0
    for id in [pair.body_a, pair.body_b] {
        world.body_mut(id).unwrap().velocity *= 0.5;
    }

    let c = ledger.correct(&mut world, &pair).expect("correction applies");
    assert!((c.ratio - 2.0).abs() < 1e-9);
    assert!(!c.drifted());

    let va = world.body(pair.body_a).unwrap().velocity;
    let vb = world.body(pair.body_b).unwrap().velocity;
    assert!((va - Vector2::new(3.0, 4.0)).norm() < 1e-9);
    assert!((vb - Vector2::new(0.0, 5.0)).norm() < 1e-9);
}

#[test]
fn test_correction_is_identity_at_convergence() {
    let (mut world, pair) = unit_mass_pair(Vector2::new(1.0, -2.0), Vector2::new(-0.5, 0.25));
    let mut ledger = MomentumLedger::new();
    ledger.record(&world, &pair);

    let c = ledger.correct(&mut world, &pair).unwrap();
    assert!((c.ratio - 1.0).abs() < 1e-12);
    assert!((world.body(pair.body_a).unwrap().velocity - Vector2::new(1.0, -2.0)).norm() < 1e-12);
    assert!((world.body(pair.body_b).unwrap().velocity - Vector2::new(-0.5, 0.25)).norm() < 1e-12);
}

#[test]
fn test_correction_preserves_direction() {
    let (mut world, pair) = unit_mass_pair(Vector2::new(2.0, 0.0), Vector2::new(0.0, 2.0));
    let mut ledger = MomentumLedger::new();
    ledger.record(&world, &pair);

    world.body_mut(pair.body_a).unwrap().velocity = Vector2::new(-1.0, 1.0);
    world.body_mut(pair.body_b).unwrap().velocity = Vector2::new(3.0, 0.5);
    let before_a = world.body(pair.body_a).unwrap().velocity;
    let before_b = world.body(pair.body_b).unwrap().velocity;

    let c = ledger.correct(&mut world, &pair).unwrap();
    let after_a = world.body(pair.body_a).unwrap().velocity;
    let after_b = world.body(pair.body_b).unwrap().velocity;

    assert!((after_a - before_a * c.ratio).norm() < 1e-12);
    assert!((after_b - before_b * c.ratio).norm() < 1e-12);
    assert!((after_a.norm() + after_b.norm() - 4.0).abs() < 1e-9);
}

#[test]
fn test_correction_skips_degenerate_cases() {
    let mut ledger = MomentumLedger::new();

    // No record
    let (mut world, pair) = unit_mass_pair(Vector2::new(1.0, 0.0), Vector2::zeros());
    assert!(ledger.correct(&mut world, &pair).is_none());

    // Current momentum zero
    ledger.record(&world, &pair);
    world.body_mut(pair.body_a).unwrap().velocity = Vector2::zeros();
    assert!(ledger.correct(&mut world, &pair).is_none());
    assert!(world.bodies().iter().all(|b| b.velocity.x.is_finite() && b.velocity.y.is_finite()));

    // Recorded momentum zero
    let (mut world, pair) = unit_mass_pair(Vector2::zeros(), Vector2::zeros());
    ledger.record(&world, &pair);
    world.body_mut(pair.body_b).unwrap().velocity = Vector2::new(0.0, 3.0);
    assert!(ledger.correct(&mut world, &pair).is_none());
    assert_eq!(world.body(pair.body_b).unwrap().velocity, Vector2::new(0.0, 3.0));
}

#[test]
fn test_ledger_forget() {
    let (world, pair) = unit_mass_pair(Vector2::new(1.0, 0.0), Vector2::zeros());
    let mut ledger = MomentumLedger::new();
    ledger.record(&world, &pair);
    assert_eq!(ledger.len(), 1);
    assert!(ledger.forget(pair.id).is_some());
    assert!(ledger.is_empty());
}

#[test]
fn test_drift_flags_residual_above_tolerance() {
    let ok = Correction { ratio: 1.0, recorded: 10.0, corrected: 10.0005 };
    let off = Correction { ratio: 1.0, recorded: 10.0, corrected: 9.99 };
    assert!(!ok.drifted());
    assert!(off.drifted());
}

#[test]
fn test_reactor_reports_drift_and_still_corrects() {
    // 49 * fl(1/49) != 1 in f64: at 2^50 the rescaled momentum misses by 0.125.
    let base = 2f64.powi(50);
    let (mut world, pair) = unit_mass_pair(Vector2::new(base, 0.0), Vector2::zeros());
    let mut ledger = MomentumLedger::new();
    ledger.record(&world, &pair);
    world.body_mut(pair.body_a).unwrap().velocity = Vector2::new(49.0 * base, 0.0);

    let rules: Vec<ReactionRule> = Vec::new();
    let mut reactor = Reactor::new(&rules, &mut ledger);
    reactor.collision_active(&mut world, &[pair]);
    let events = reactor.into_events();

    let mut stats = ReactionStats::default();
    events.iter().for_each(|e| stats.ingest(e));
    assert_eq!(stats.corrections, 1);
    assert_eq!(stats.drift_warnings, 1);
    match events.as_slice() {
        [ReactionEvent::MomentumCorrected { .. }, ReactionEvent::MomentumDrift { recorded, corrected, .. }] => {
            assert_eq!(*recorded, base);
            assert!((recorded - corrected).abs() > MOMENTUM_TOLERANCE);
        }
        other => panic!("unexpected events {:?}", other),
    }

    // Velocity was still rescaled back to (almost) the recorded magnitude.
    let va = world.body(pair.body_a).unwrap().velocity;
    assert!((va.x - base).abs() < 1.0);
    assert!(world.body(pair.body_b).unwrap().velocity.norm() == 0.0);
    assert_eq!(ledger.len(), 1);
}

// --- Bond Toggle ---

#[test]
fn test_toggle_breaks_matching_bond() {
    let (mut world, a, b) = two_atom_world((AtomKind::A, 1, 15.0), (AtomKind::B, 1, 15.0));
    world.add_bond(a, b, 29.0, 0.0).unwrap();
    let breaking = rule((AtomKind::A, 1), (AtomKind::B, 1), true, false, ((AtomKind::A, 0), (AtomKind::B, 3)));

    let report = toggle_bonds(&mut world, &breaking);

    assert_eq!(report.transformed, 1);
    assert_eq!(report.removed, 1);
    assert!(world.bonds().is_empty());
    assert_eq!((state_of(&world, a), state_of(&world, b)), (0, 3));
}

#[test]
fn test_toggle_keeps_bond_when_bonded_after() {
    let (mut world, a, b) = two_atom_world((AtomKind::B, 1, 15.0), (AtomKind::A, 1, 15.0));
    world.add_bond(a, b, 29.0, 0.0).unwrap();
    let transform = rule((AtomKind::A, 1), (AtomKind::B, 1), true, true, ((AtomKind::A, 2), (AtomKind::B, 4)));

    let report = toggle_bonds(&mut world, &transform);

    assert_eq!(report, atom_reactor::reactions::bonds::ToggleReport { transformed: 1, removed: 0 });
    assert_eq!(world.bonds().len(), 1);
    // Reverse orientation: body a is the B atom
    assert_eq!((state_of(&world, a), state_of(&world, b)), (4, 2));
}

#[test]
fn test_toggle_never_touches_non_matching_bonds() {
    let (mut world, a, b) = two_atom_world((AtomKind::C, 1, 15.0), (AtomKind::D, 1, 15.0));
    world.add_bond(a, b, 29.0, 0.0).unwrap();
    let breaking = rule((AtomKind::A, 1), (AtomKind::B, 1), true, false, ((AtomKind::A, 0), (AtomKind::B, 0)));

    let report = toggle_bonds(&mut world, &breaking);

    assert_eq!(report.removed, 0);
    assert_eq!(world.bonds().len(), 1);
    assert_eq!((state_of(&world, a), state_of(&world, b)), (1, 1));
}

#[test]
fn test_toggle_requires_bonded_before() {
    let (mut world, a, b) = two_atom_world((AtomKind::A, 1, 15.0), (AtomKind::B, 1, 15.0));
    world.add_bond(a, b, 29.0, 0.0).unwrap();
    let collision_rule = rule((AtomKind::A, 1), (AtomKind::B, 1), false, false, ((AtomKind::A, 0), (AtomKind::B, 0)));

    let report = toggle_bonds(&mut world, &collision_rule);

    assert_eq!(report.transformed, 0);
    assert_eq!(world.bonds().len(), 1);
    assert_eq!((state_of(&world, a), state_of(&world, b)), (1, 1));
}
