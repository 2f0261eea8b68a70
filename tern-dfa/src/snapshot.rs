// DFA snapshots - structural export for golden files
//
// Same content as the text serializer, but as data: every canonical state in
// state-number order with its flags and recorded edges.

use crate::cache::DfaCache;
use crate::state::DfaState;
use serde::{Deserialize, Serialize};

/// A recorded transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    /// Edge index (symbol + 1 for parser DFAs, character for lexer DFAs)
    pub index: usize,

    /// Target state number
    pub target: u32,
}

/// One canonical state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub state_number: u32,
    pub is_accept_state: bool,

    /// Predicted alternative, for accept states
    pub prediction: Option<u32>,
    pub requires_full_context: bool,

    /// Edges into the ERROR state are omitted
    pub edges: Vec<EdgeSnapshot>,
}

/// A whole DFA cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfaSnapshot {
    pub decision: usize,
    pub precedence_dfa: bool,

    /// Start state number of an ordinary DFA
    pub start_state: Option<u32>,

    /// Start state numbers by precedence level, for a precedence DFA
    pub precedence_start_states: Vec<Option<u32>>,

    pub states: Vec<StateSnapshot>,
}

fn edge_snapshots(state: &DfaState) -> Vec<EdgeSnapshot> {
    state
        .edges()
        .into_iter()
        .enumerate()
        .filter_map(|(index, target)| {
            let target = target?;
            if target.is_error() {
                return None;
            }
            Some(EdgeSnapshot {
                index,
                target: target.state_number()?,
            })
        })
        .collect()
}

impl DfaSnapshot {
    pub fn capture(dfa: &DfaCache) -> Self {
        let s0 = dfa.s0();
        let (start_state, precedence_start_states) = match &s0 {
            Some(root) if dfa.is_precedence_dfa() => (
                None,
                root.edges()
                    .into_iter()
                    .map(|target| target.and_then(|t| t.state_number()))
                    .collect(),
            ),
            Some(s0) => (s0.state_number(), Vec::new()),
            None => (None, Vec::new()),
        };

        let states = dfa
            .states()
            .iter()
            .filter_map(|state| {
                Some(StateSnapshot {
                    state_number: state.state_number()?,
                    is_accept_state: state.is_accept_state(),
                    prediction: state.is_accept_state().then_some(state.prediction()),
                    requires_full_context: state.requires_full_context(),
                    edges: edge_snapshots(state),
                })
            })
            .collect();

        Self {
            decision: dfa.decision(),
            precedence_dfa: dfa.is_precedence_dfa(),
            start_state,
            precedence_start_states,
            states,
        }
    }
}

impl DfaCache {
    /// Structural snapshot of this cache
    pub fn snapshot(&self) -> DfaSnapshot {
        DfaSnapshot::capture(self)
    }
}
