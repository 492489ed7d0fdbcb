//! Error and rejection types.
//!
//! Only programming and configuration mistakes are errors. A spawn that the
//! economy cannot pay for is an expected outcome and is reported as a
//! [`SpawnRejection`] inside a successful result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::ArchetypeId;

/// A spawn request that could not be interpreted at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SpawnError {
    #[error("unknown unit archetype `{0}`")]
    UnknownArchetype(ArchetypeId),
}

/// Why a well-formed spawn attempt was refused. Nothing is mutated.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnRejection {
    #[error("not enough resource")]
    InsufficientResource,
    #[error("archetype is on cooldown")]
    OnCooldown,
    #[error("match is over")]
    MatchOver,
}

/// Invalid catalog contents.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog has no archetypes")]
    Empty,
    #[error("duplicate archetype id `{0}`")]
    DuplicateArchetype(ArchetypeId),
}

/// Configuration that failed to load or validate.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
