// Tern DFA - Per-decision DFA cache for adaptive prediction
//!
// Prediction discovers DFA states on demand by simulating the ATN. Every
// decision owns one DfaCache that memoizes those states so later parses of the
// same decision reuse the transitions instead of simulating again.
//
// ## Overview
//
// - DfaState: a state keyed by its ATN configuration set
// - DfaCache: the intern table for one decision, plus its start state(s)
// - DfaTable: one cache per decision of a grammar
// - DfaSerializer / LexerDfaSerializer: stable text dumps for tests
//
// Left-recursive rules enter through a precedence decision. Their cache has a
// synthetic root whose edges are indexed by operator precedence instead of by
// input symbol; see `DfaCache::precedence_start_state`.

mod cache;
mod serializer;
mod snapshot;
mod state;
mod table;

pub use cache::DfaCache;
pub use serializer::{DfaSerializer, LexerDfaSerializer};
pub use snapshot::{DfaSnapshot, EdgeSnapshot, StateSnapshot};
pub use state::{DfaState, PredPrediction, ERROR_STATE_NUMBER};
pub use table::DfaTable;

use thiserror::Error;

/// Errors that can occur in the DFA cache
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DfaError {
    #[error("Invalid operation on DFA for decision {decision}: {reason}")]
    InvalidOperation {
        decision: usize,
        reason: &'static str,
    },

    #[error("Unknown decision: {decision} (table has {len} decisions)")]
    UnknownDecision { decision: usize, len: usize },

    #[error("Decision state {state_number} has no decision index")]
    UnassignedDecision { state_number: u32 },

    #[error("Decision indices must be contiguous: expected {expected}, found {found}")]
    NonContiguousDecision { expected: usize, found: usize },
}

/// Result type for DFA cache operations
pub type DfaResult<T> = Result<T, DfaError>;

/// Configuration for DFA caches
#[derive(Debug, Clone)]
pub struct DfaConfig {
    /// Number of canonical states to reserve room for up front
    pub initial_state_capacity: usize,

    /// Number of precedence levels to reserve on a precedence root.
    /// Reservation only; the observable table length still starts at 0.
    pub precedence_capacity: usize,
}

impl Default for DfaConfig {
    fn default() -> Self {
        Self {
            initial_state_capacity: 16,
            precedence_capacity: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = DfaConfig::default();
        assert_eq!(config.initial_state_capacity, 16);
        assert_eq!(config.precedence_capacity, 0);
    }

    #[test]
    fn test_error_display() {
        let err = DfaError::InvalidOperation {
            decision: 3,
            reason: "test",
        };
        assert!(err.to_string().contains("decision 3"));
        assert!(err.to_string().contains("test"));

        let err = DfaError::UnknownDecision { decision: 9, len: 2 };
        assert!(err.to_string().contains("9"));
    }
}
