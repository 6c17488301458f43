//! Error type for the reaction simulator.
//!
//! Numeric edge cases in the collision handlers are skipped, never reported
//! here; this enum covers configuration and world-lookup failures only.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::domain::BodyId;

#[derive(Debug, Error)]
pub enum ReactorError {
    /// Reading or writing a rule file failed.
    #[error("failed to access rule file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A rule file did not contain a valid JSON rule list.
    #[error("malformed rule file: {0}")]
    Json(#[from] serde_json::Error),

    /// A rule refers to a state outside the allowed range.
    #[error("rule #{index} is invalid: {reason}")]
    InvalidRule { index: usize, reason: String },

    /// A bond or lookup referenced a body that is not in the world.
    #[error("unknown body {0}")]
    UnknownBody(BodyId),

    /// A bond was requested between a body and itself.
    #[error("cannot bond body {0} to itself")]
    SelfBond(BodyId),
}

pub type Result<T> = std::result::Result<T, ReactorError>;
