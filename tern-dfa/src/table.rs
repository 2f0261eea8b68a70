// DFA Table - one cache per decision
//
// A recognizer builds this once from its ATN's decision states and shares it
// between every parser (or lexer) instance for the grammar.

use crate::cache::DfaCache;
use crate::{DfaConfig, DfaError, DfaResult};
use std::sync::Arc;
use tern_atn::{DecisionState, Vocabulary};
use tracing::debug;

/// DFA caches indexed by decision
#[derive(Debug)]
pub struct DfaTable {
    dfas: Vec<DfaCache>,
}

impl DfaTable {
    /// Build one cache per decision state.
    ///
    /// Every state must carry a decision index, and the indices must be
    /// exactly `0..n` in some order.
    pub fn from_decisions<I>(decisions: I) -> DfaResult<Self>
    where
        I: IntoIterator<Item = Arc<DecisionState>>,
    {
        Self::with_config(decisions, &DfaConfig::default())
    }

    pub fn with_config<I>(decisions: I, config: &DfaConfig) -> DfaResult<Self>
    where
        I: IntoIterator<Item = Arc<DecisionState>>,
    {
        let mut indexed = decisions
            .into_iter()
            .map(|state| match state.decision() {
                Some(decision) => Ok((decision, state)),
                None => Err(DfaError::UnassignedDecision {
                    state_number: state.state_number(),
                }),
            })
            .collect::<DfaResult<Vec<_>>>()?;
        indexed.sort_by_key(|(decision, _)| *decision);

        let mut dfas = Vec::with_capacity(indexed.len());
        for (expected, (decision, state)) in indexed.into_iter().enumerate() {
            if decision != expected {
                return Err(DfaError::NonContiguousDecision {
                    expected,
                    found: decision,
                });
            }
            dfas.push(DfaCache::with_config(state, decision, config));
        }

        debug!(
            decisions = dfas.len(),
            precedence_decisions = dfas.iter().filter(|d| d.is_precedence_dfa()).count(),
            "Built DFA table"
        );
        Ok(Self { dfas })
    }

    pub fn get(&self, decision: usize) -> DfaResult<&DfaCache> {
        self.dfas.get(decision).ok_or(DfaError::UnknownDecision {
            decision,
            len: self.dfas.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.dfas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dfas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DfaCache> {
        self.dfas.iter()
    }

    /// Total canonical states across all decisions
    pub fn state_count(&self) -> usize {
        self.dfas.iter().map(DfaCache::len).sum()
    }

    /// Render one decision's DFA with token names
    pub fn to_string_with(&self, decision: usize, vocabulary: &dyn Vocabulary) -> DfaResult<String> {
        Ok(self.get(decision)?.to_string_with(vocabulary))
    }
}
