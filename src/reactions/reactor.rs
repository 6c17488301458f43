use crate::core::domain::ReactionRule;
use crate::engine::events::{CollisionHandler, ContactPair};
use crate::engine::world::World;
use crate::reactions::momentum::MomentumLedger;
use crate::reactions::resolver::resolve_contact;
use crate::reactions::ReactionEvent;

/// Wires the reaction rules and momentum ledger into a world step.
pub struct Reactor<'a> {
    rules: &'a [ReactionRule],
    ledger: &'a mut MomentumLedger,
    events: Vec<ReactionEvent>,
}

impl<'a> Reactor<'a> {
    pub fn new(rules: &'a [ReactionRule], ledger: &'a mut MomentumLedger) -> Self {
        Self { rules, ledger, events: Vec::new() }
    }

    pub fn into_events(self) -> Vec<ReactionEvent> {
        self.events
    }
}

impl CollisionHandler for Reactor<'_> {
    fn collision_start(&mut self, world: &mut World, pairs: &[ContactPair]) {
        for pair in pairs {
            self.ledger.record(world, pair);

            for outcome in resolve_contact(world, pair, self.rules) {
                let Some(rule) = self.rules.get(outcome.rule_index) else { continue };
                self.events.push(ReactionEvent::Reacted {
                    rule: *rule,
                    body_a: pair.body_a,
                    body_b: pair.body_b,
                    products: outcome.products,
                    bonded: outcome.bond.is_some(),
                });
            }
        }
    }

    fn collision_active(&mut self, world: &mut World, pairs: &[ContactPair]) {
        for pair in pairs {
            let Some(c) = self.ledger.correct(world, pair) else { continue };
            self.events.push(ReactionEvent::MomentumCorrected { pair: pair.id, ratio: c.ratio });
            if c.drifted() {
                self.events.push(ReactionEvent::MomentumDrift {
                    pair: pair.id,
                    recorded: c.recorded,
                    corrected: c.corrected,
                });
            }
        }
    }

    fn collision_end(&mut self, _world: &mut World, pairs: &[ContactPair]) {
        for pair in pairs {
            self.ledger.forget(pair.id);
        }
    }
}
