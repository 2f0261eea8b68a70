// Decision states
//
// A decision state is an ATN state with more than one outgoing alternative.
// Each one owns a DFA cache; the kind of state decides whether that cache is
// addressed by precedence.

use serde::{Deserialize, Serialize};

/// The ATN construct a decision state was generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionKind {
    /// `( a | b | c )` subrule
    Block,

    /// Start of a `( ... )*` block
    StarBlockStart,

    /// Start of a `( ... )+` block
    PlusBlockStart,

    /// Entry of a `( ... )*` loop.
    ///
    /// Left-recursive rules are rewritten into a star loop whose entry
    /// decides on operator precedence; such entries are precedence decisions.
    StarLoopEntry { precedence_decision: bool },

    /// Loop-back decision of a `( ... )+` block
    PlusLoopBack,

    /// Start state of a lexer's token rules
    TokensStart,
}

/// A decision point in the ATN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionState {
    /// ATN state number
    state_number: u32,

    /// Decision index, assigned when the ATN registers the decision
    decision: Option<usize>,

    /// Construct this decision was generated for
    kind: DecisionKind,

    /// Non-greedy subrule (`*?`, `+?`, `??`)
    non_greedy: bool,
}

impl DecisionState {
    pub fn new(state_number: u32, kind: DecisionKind) -> Self {
        Self {
            state_number,
            decision: None,
            kind,
            non_greedy: false,
        }
    }

    /// Assign the decision index
    pub fn with_decision(mut self, decision: usize) -> Self {
        self.decision = Some(decision);
        self
    }

    /// Mark the decision as non-greedy
    pub fn non_greedy(mut self) -> Self {
        self.non_greedy = true;
        self
    }

    pub fn state_number(&self) -> u32 {
        self.state_number
    }

    pub fn decision(&self) -> Option<usize> {
        self.decision
    }

    pub fn kind(&self) -> DecisionKind {
        self.kind
    }

    pub fn is_non_greedy(&self) -> bool {
        self.non_greedy
    }

    /// Whether this decision selects among start states by operator
    /// precedence (entry of a left-recursive rule's loop)
    pub fn is_precedence_decision(&self) -> bool {
        matches!(
            self.kind,
            DecisionKind::StarLoopEntry {
                precedence_decision: true
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_classification() {
        let entry = DecisionState::new(
            7,
            DecisionKind::StarLoopEntry {
                precedence_decision: true,
            },
        );
        assert!(entry.is_precedence_decision());

        let plain_loop = DecisionState::new(
            8,
            DecisionKind::StarLoopEntry {
                precedence_decision: false,
            },
        );
        assert!(!plain_loop.is_precedence_decision());

        assert!(!DecisionState::new(9, DecisionKind::Block).is_precedence_decision());
        assert!(!DecisionState::new(10, DecisionKind::TokensStart).is_precedence_decision());
    }

    #[test]
    fn test_decision_assignment() {
        let state = DecisionState::new(3, DecisionKind::PlusLoopBack);
        assert_eq!(state.decision(), None);

        let state = state.with_decision(4).non_greedy();
        assert_eq!(state.decision(), Some(4));
        assert_eq!(state.state_number(), 3);
        assert!(state.is_non_greedy());
        assert_eq!(state.kind(), DecisionKind::PlusLoopBack);
    }
}
