use crate::core::domain::{AtomKind, ReactionRule, Signature, MAX_STATE};

/// Updates accepted by the `ReactionStore`.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetFirstReactantKind(AtomKind),
    SetFirstReactantState(u32),
    SetSecondReactantKind(AtomKind),
    SetSecondReactantState(u32),
    SetBondedBefore(bool),
    SetBondedAfter(bool),
    SetFirstProductState(u32),
    SetSecondProductState(u32),
    /// Confirms the draft rule.
    Submit,
    RemoveRule(usize),
    ClearRules,
}

/// The rule currently being edited plus the active rule list.
/// All changes go through `dispatch`.
#[derive(Debug, Clone)]
pub struct ReactionStore {
    current: ReactionRule,
    rules: Vec<ReactionRule>,
    types: Vec<AtomKind>,
}

impl Default for ReactionStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ReactionStore {
    pub fn new(rules: Vec<ReactionRule>) -> Self {
        Self {
            current: ReactionRule::default(),
            rules,
            types: AtomKind::ALL.to_vec(),
        }
    }

    pub fn current(&self) -> &ReactionRule {
        &self.current
    }

    pub fn rules(&self) -> &[ReactionRule] {
        &self.rules
    }

    pub fn types(&self) -> &[AtomKind] {
        &self.types
    }

    /// Applies an action. Returns the confirmed rule on `Submit`.
    pub fn dispatch(&mut self, action: Action) -> Option<ReactionRule> {
        let clamp = |s: u32| s.min(MAX_STATE);

        match action {
            // Reactions never change kinds, so each product follows its reactant.
            Action::SetFirstReactantKind(k) => {
                self.current.first_reactant.kind = k;
                self.current.first_product.kind = k;
            }
            Action::SetFirstReactantState(s) => self.current.first_reactant.state = clamp(s),
            Action::SetSecondReactantKind(k) => {
                self.current.second_reactant.kind = k;
                self.current.second_product.kind = k;
            }
            Action::SetSecondReactantState(s) => self.current.second_reactant.state = clamp(s),
            Action::SetBondedBefore(b) => self.current.bonded_before = b,
            Action::SetBondedAfter(b) => self.current.bonded_after = b,
            Action::SetFirstProductState(s) => self.current.first_product.state = clamp(s),
            Action::SetSecondProductState(s) => self.current.second_product.state = clamp(s),

            Action::Submit => {
                let submitted = self.current;
                if self.rules.contains(&submitted) {
                    log::info!("Rule [{}] is already active", submitted);
                } else {
                    self.rules.push(submitted);
                    log::info!("Rule [{}] added ({} active)", submitted, self.rules.len());
                }
                return Some(submitted);
            }
            Action::RemoveRule(index) => {
                if index < self.rules.len() {
                    let removed = self.rules.remove(index);
                    log::info!("Rule [{}] removed", removed);
                }
            }
            Action::ClearRules => {
                self.rules.clear();
                log::info!("All rules cleared");
            }
        }
        None
    }
}

// --- Editor Fields ---

/// One editable slot of the draft rule, in on-screen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    FirstReactantKind,
    FirstReactantState,
    SecondReactantKind,
    SecondReactantState,
    BondedBefore,
    BondedAfter,
    FirstProductState,
    SecondProductState,
}

impl EditorField {
    pub const ALL: [EditorField; 8] = [
        EditorField::FirstReactantKind,
        EditorField::FirstReactantState,
        EditorField::SecondReactantKind,
        EditorField::SecondReactantState,
        EditorField::BondedBefore,
        EditorField::BondedAfter,
        EditorField::FirstProductState,
        EditorField::SecondProductState,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EditorField::FirstReactantKind => "Reactant 1 type",
            EditorField::FirstReactantState => "Reactant 1 state",
            EditorField::SecondReactantKind => "Reactant 2 type",
            EditorField::SecondReactantState => "Reactant 2 state",
            EditorField::BondedBefore => "Bonded before",
            EditorField::BondedAfter => "Bonded after",
            EditorField::FirstProductState => "Product 1 state",
            EditorField::SecondProductState => "Product 2 state",
        }
    }

    /// Current value of this field as displayed.
    pub fn value(self, rule: &ReactionRule) -> String {
        let yes_no = |b: bool| if b { "yes" } else { "no" }.to_string();
        match self {
            EditorField::FirstReactantKind => rule.first_reactant.kind.to_string(),
            EditorField::FirstReactantState => rule.first_reactant.state.to_string(),
            EditorField::SecondReactantKind => rule.second_reactant.kind.to_string(),
            EditorField::SecondReactantState => rule.second_reactant.state.to_string(),
            EditorField::BondedBefore => yes_no(rule.bonded_before),
            EditorField::BondedAfter => yes_no(rule.bonded_after),
            EditorField::FirstProductState => rule.first_product.state.to_string(),
            EditorField::SecondProductState => rule.second_product.state.to_string(),
        }
    }

    /// The action that steps this field one value forward or back.
    /// Kinds and states wrap; booleans flip.
    pub fn step(self, rule: &ReactionRule, forward: bool) -> Action {
        let kind = |k: AtomKind| if forward { k.next() } else { k.prev() };
        let state = |s: Signature| {
            if forward {
                if s.state >= MAX_STATE { 0 } else { s.state + 1 }
            } else if s.state == 0 {
                MAX_STATE
            } else {
                s.state - 1
            }
        };

        match self {
            EditorField::FirstReactantKind => Action::SetFirstReactantKind(kind(rule.first_reactant.kind)),
            EditorField::FirstReactantState => Action::SetFirstReactantState(state(rule.first_reactant)),
            EditorField::SecondReactantKind => Action::SetSecondReactantKind(kind(rule.second_reactant.kind)),
            EditorField::SecondReactantState => Action::SetSecondReactantState(state(rule.second_reactant)),
            EditorField::BondedBefore => Action::SetBondedBefore(!rule.bonded_before),
            EditorField::BondedAfter => Action::SetBondedAfter(!rule.bonded_after),
            EditorField::FirstProductState => Action::SetFirstProductState(state(rule.first_product)),
            EditorField::SecondProductState => Action::SetSecondProductState(state(rule.second_product)),
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}
