//! Error conditions surfaced by the engine's registry and selection pipeline.

use thiserror::Error;

/// Errors produced by [`crate::engine::DecisionEngine`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// `best_decision` was called with no candidates in the active set.
    #[error("no candidate decisions are active")]
    EmptyActiveSet,

    /// Every evaluated candidate in the active set scored exactly zero.
    #[error("no rule was activated: every active candidate scored zero")]
    NoDecisionActivated,

    /// `add` was called for a decision with no considerations, which the
    /// modification-factor scoring formula cannot divide by.
    #[error("decision {name:?} was registered with no considerations")]
    InvalidRegistration { name: String },
}
