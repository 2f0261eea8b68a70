// Tern ATN - Automaton-side types consumed by the DFA cache
//!
// The augmented transition network itself is built elsewhere. This crate
// only carries the pieces a decision's DFA cache needs to see:
// - DecisionState: the decision point that owns a cache
// - AtnConfig / AtnConfigSet: the configuration set that identifies a DFA state
// - Vocabulary: token names used when rendering DFA edges

mod config;
mod decision;
mod vocabulary;

pub use config::{AtnConfig, AtnConfigSet, EMPTY_CONTEXT};
pub use decision::{DecisionKind, DecisionState};
pub use vocabulary::{Vocabulary, VocabularyImpl};

/// Token type of the end-of-file symbol
pub const EOF: i32 = -1;

/// Token type reserved for "no valid token"
pub const INVALID_TYPE: i32 = 0;

/// Smallest token type a grammar may define
pub const MIN_USER_TOKEN_TYPE: i32 = 1;

/// Alternative number meaning "no prediction"
pub const INVALID_ALT_NUMBER: u32 = 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_constants() {
        assert!(EOF < INVALID_TYPE);
        assert!(INVALID_TYPE < MIN_USER_TOKEN_TYPE);
        assert_eq!(INVALID_ALT_NUMBER, 0);
    }
}
