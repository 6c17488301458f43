use std::fs;
use std::path::Path;

use crate::core::domain::{ReactionRule, MAX_STATE};
use crate::error::{ReactorError, Result};

/// Checks every signature of every rule against `MAX_STATE`, and that each
/// product keeps the kind of its reactant.
pub fn validate_rules(rules: &[ReactionRule]) -> Result<()> {
    for (index, rule) in rules.iter().enumerate() {
        let pairs = [
            ("first", rule.first_reactant, rule.first_product),
            ("second", rule.second_reactant, rule.second_product),
        ];
        for (role, reactant, product) in pairs {
            if reactant.kind != product.kind {
                return Err(ReactorError::InvalidRule {
                    index,
                    reason: format!("{} product is {} but its reactant is {}", role, product.kind, reactant.kind),
                });
            }
        }

        let sigs = [
            ("first reactant", rule.first_reactant),
            ("second reactant", rule.second_reactant),
            ("first product", rule.first_product),
            ("second product", rule.second_product),
        ];
        for (role, sig) in sigs {
            if sig.state > MAX_STATE {
                return Err(ReactorError::InvalidRule {
                    index,
                    reason: format!("{} state {} exceeds {}", role, sig.state, MAX_STATE),
                });
            }
        }
    }
    Ok(())
}

/// Parses a JSON array of rules.
pub fn parse_rules(json: &str) -> Result<Vec<ReactionRule>> {
    let rules: Vec<ReactionRule> = serde_json::from_str(json)?;
    validate_rules(&rules)?;
    Ok(rules)
}

pub fn load_rules(path: &Path) -> Result<Vec<ReactionRule>> {
    let text = fs::read_to_string(path).map_err(|source| ReactorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rules = parse_rules(&text)?;
    log::info!("Loaded {} rule(s) from {}", rules.len(), path.display());
    Ok(rules)
}

pub fn save_rules(path: &Path, rules: &[ReactionRule]) -> Result<()> {
    let json = serde_json::to_string_pretty(rules)?;
    fs::write(path, json).map_err(|source| ReactorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Saved {} rule(s) to {}", rules.len(), path.display());
    Ok(())
}
