use crate::core::domain::{Atom, ReactionRule, Signature};

/// Which way round a pair of atoms lined up with a rule's reactants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// body A ≈ first reactant, body B ≈ second reactant.
    Forward,
    /// body A ≈ second reactant, body B ≈ first reactant.
    Reverse,
}

/// True iff `a` carries `first` and `b` carries `second`, both kind and state.
#[inline]
pub fn matches(a: &Atom, first: &Signature, b: &Atom, second: &Signature) -> bool {
    a.kind == first.kind && a.state == first.state && b.kind == second.kind && b.state == second.state
}

impl ReactionRule {
    /// Symmetric match of the pair against the reactants.
    /// When both orientations match, `Forward` wins.
    pub fn orient(&self, a: &Atom, b: &Atom) -> Option<Orientation> {
        if matches(a, &self.first_reactant, b, &self.second_reactant) {
            Some(Orientation::Forward)
        } else if matches(a, &self.second_reactant, b, &self.first_reactant) {
            Some(Orientation::Reverse)
        } else {
            None
        }
    }

    /// Product signatures for (body A, body B) under the given orientation.
    pub fn products(&self, orientation: Orientation) -> (Signature, Signature) {
        match orientation {
            Orientation::Forward => (self.first_product, self.second_product),
            Orientation::Reverse => (self.second_product, self.first_product),
        }
    }

    /// Writes the product states onto the pair.
    ///
    /// Kinds are never changed: a rule's product kinds always equal its
    /// reactant kinds (the editor ties them together and `validate_rules`
    /// rejects rule files that do not), so only states are written.
    pub fn apply_products(&self, orientation: Orientation, a: &mut Atom, b: &mut Atom) {
        let (pa, pb) = self.products(orientation);
        a.state = pa.state;
        b.state = pb.state;
    }
}
