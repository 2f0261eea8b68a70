// DFA Cache - canonical states for one decision
//
// Grows monotonically while parsers run: states are interned by configuration
// set and never evicted. Shared by every parser using the same grammar.

use crate::serializer::{DfaSerializer, LexerDfaSerializer};
use crate::state::DfaState;
use crate::{DfaConfig, DfaError, DfaResult};
use ahash::AHashSet;
use parking_lot::RwLock;
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tern_atn::{AtnConfigSet, DecisionState, Vocabulary, VocabularyImpl};
use tracing::{debug, trace};

const NOT_PRECEDENCE_DFA: &str = "only precedence DFAs may contain a precedence start state";
const PRECEDENCE_ROOT_FIXED: &str = "the start state of a precedence DFA is fixed at construction";

/// Intern-table entry, looked up by the configuration set it wraps
struct CanonicalState(Arc<DfaState>);

impl Borrow<AtnConfigSet> for CanonicalState {
    fn borrow(&self) -> &AtnConfigSet {
        self.0.configs()
    }
}

impl PartialEq for CanonicalState {
    fn eq(&self, other: &Self) -> bool {
        self.0.configs() == other.0.configs()
    }
}

impl Eq for CanonicalState {}

// Must agree with `Hash for AtnConfigSet` for the `Borrow` lookup to work.
impl Hash for CanonicalState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.configs().hash(state);
    }
}

/// The DFA cache of a single decision
///
/// # Concurrency
///
/// All methods take `&self`. The intern table sits behind its own lock and
/// re-checks on the write path, so two threads interning equal configuration
/// sets always get the same `Arc` back. Precedence start states are guarded by
/// the precedence root's edge lock only; nothing here blocks other decisions.
pub struct DfaCache {
    /// Decision state this cache was created for
    atn_start_state: Arc<DecisionState>,

    /// Decision index
    decision: usize,

    /// Canonical states keyed by configuration set
    states: RwLock<AHashSet<CanonicalState>>,

    /// Start state. Published only after the state is interned.
    s0: RwLock<Option<Arc<DfaState>>>,

    /// Synthetic root holding start states by precedence, present iff this
    /// is a precedence DFA. Never part of `states`.
    precedence_root: Option<Arc<DfaState>>,
}

impl DfaCache {
    pub fn new(atn_start_state: Arc<DecisionState>, decision: usize) -> Self {
        Self::with_config(atn_start_state, decision, &DfaConfig::default())
    }

    pub fn with_config(
        atn_start_state: Arc<DecisionState>,
        decision: usize,
        config: &DfaConfig,
    ) -> Self {
        let precedence_root = if atn_start_state.is_precedence_decision() {
            debug!(
                decision,
                atn_state = atn_start_state.state_number(),
                "Creating precedence DFA"
            );
            Some(Arc::new(DfaState::precedence_root(config.precedence_capacity)))
        } else {
            None
        };

        let mut states = AHashSet::default();
        states.reserve(config.initial_state_capacity);

        Self {
            atn_start_state,
            decision,
            states: RwLock::new(states),
            s0: RwLock::new(precedence_root.clone()),
            precedence_root,
        }
    }

    pub fn decision(&self) -> usize {
        self.decision
    }

    pub fn atn_start_state(&self) -> &Arc<DecisionState> {
        &self.atn_start_state
    }

    /// Whether this cache belongs to a precedence decision.
    ///
    /// Precedence DFAs use a synthetic start state that is not stored in the
    /// intern table; its edges supply one start state per precedence level.
    pub fn is_precedence_dfa(&self) -> bool {
        self.precedence_root.is_some()
    }

    /// Current start state. For a precedence DFA this is the synthetic root.
    pub fn s0(&self) -> Option<Arc<DfaState>> {
        self.s0.read().clone()
    }

    /// Intern `candidate` and publish it as the start state.
    ///
    /// Fails on a precedence DFA, whose root never changes; use
    /// [`set_precedence_start_state`](Self::set_precedence_start_state).
    pub fn set_s0(&self, candidate: DfaState) -> DfaResult<Arc<DfaState>> {
        if self.is_precedence_dfa() {
            return Err(self.invalid(PRECEDENCE_ROOT_FIXED));
        }
        let state = self.get_or_insert(candidate);
        *self.s0.write() = Some(Arc::clone(&state));
        Ok(state)
    }

    fn invalid(&self, reason: &'static str) -> DfaError {
        DfaError::InvalidOperation {
            decision: self.decision,
            reason,
        }
    }

    fn precedence_root(&self) -> DfaResult<&Arc<DfaState>> {
        self.precedence_root
            .as_ref()
            .ok_or_else(|| self.invalid(NOT_PRECEDENCE_DFA))
    }

    /// Start state for a precedence level.
    ///
    /// Returns `Ok(None)` for negative precedence or a level no start state
    /// has been recorded for yet. Fails unless this is a precedence DFA.
    pub fn precedence_start_state(&self, precedence: i32) -> DfaResult<Option<Arc<DfaState>>> {
        let root = self.precedence_root()?;
        match usize::try_from(precedence) {
            Ok(index) => Ok(root.edge(index)),
            Err(_) => Ok(None),
        }
    }

    /// Record the start state for a precedence level.
    ///
    /// Negative precedence is ignored. Fails unless this is a precedence DFA.
    pub fn set_precedence_start_state(
        &self,
        precedence: i32,
        start_state: Arc<DfaState>,
    ) -> DfaResult<()> {
        let root = self.precedence_root()?;
        let Ok(index) = usize::try_from(precedence) else {
            return Ok(());
        };

        trace!(
            decision = self.decision,
            precedence,
            state_number = ?start_state.state_number(),
            "Setting precedence start state"
        );
        root.set_edge(index, start_state);
        Ok(())
    }

    /// Return the canonical state for `candidate`'s configuration set,
    /// inserting `candidate` (with the next state number) if there is none.
    pub fn get_or_insert(&self, candidate: DfaState) -> Arc<DfaState> {
        if let Some(existing) = self.states.read().get(candidate.configs()) {
            return Arc::clone(&existing.0);
        }

        let mut states = self.states.write();
        // Another thread may have interned the same set between the locks.
        if let Some(existing) = states.get(candidate.configs()) {
            return Arc::clone(&existing.0);
        }

        let mut candidate = candidate;
        let state_number = states.len() as u32;
        candidate.state_number = Some(state_number);

        let state = Arc::new(candidate);
        states.insert(CanonicalState(Arc::clone(&state)));
        trace!(decision = self.decision, state_number, "Interned DFA state");
        state
    }

    /// Canonical state for a configuration set, if interned
    pub fn get(&self, configs: &AtnConfigSet) -> Option<Arc<DfaState>> {
        self.states.read().get(configs).map(|c| Arc::clone(&c.0))
    }

    /// All canonical states, ordered by state number
    pub fn states(&self) -> Vec<Arc<DfaState>> {
        let mut states: Vec<_> = self.states.read().iter().map(|c| Arc::clone(&c.0)).collect();
        states.sort_by_key(|s| s.state_number());
        states
    }

    /// Number of canonical states
    pub fn len(&self) -> usize {
        self.states.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.read().is_empty()
    }

    /// Render the DFA with token names from `vocabulary`
    pub fn to_string_with(&self, vocabulary: &dyn Vocabulary) -> String {
        DfaSerializer::new(self, vocabulary).to_string()
    }

    /// Render the DFA of a lexer decision, labelling edges by character
    pub fn to_lexer_string(&self) -> String {
        LexerDfaSerializer::new(self).to_string()
    }
}

impl fmt::Display for DfaCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vocabulary = VocabularyImpl::empty();
        write!(f, "{}", DfaSerializer::new(self, &vocabulary))
    }
}

impl fmt::Debug for DfaCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DfaCache")
            .field("decision", &self.decision)
            .field("atn_state", &self.atn_start_state.state_number())
            .field("precedence_dfa", &self.is_precedence_dfa())
            .field("state_count", &self.len())
            .finish()
    }
}

// Edges between canonical states form `Arc` cycles (loops in the grammar).
// Clearing them lets the states drop along with the cache.
impl Drop for DfaCache {
    fn drop(&mut self) {
        for state in self.states.get_mut().iter() {
            state.0.clear_edges();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tern_atn::{AtnConfig, DecisionKind};

    fn decision_state(kind: DecisionKind) -> Arc<DecisionState> {
        Arc::new(DecisionState::new(10, kind).with_decision(0))
    }

    fn precedence_decision() -> Arc<DecisionState> {
        decision_state(DecisionKind::StarLoopEntry {
            precedence_decision: true,
        })
    }

    fn state(entries: &[(u32, u32)]) -> DfaState {
        DfaState::new(
            entries
                .iter()
                .map(|&(s, alt)| AtnConfig::new(s, alt))
                .collect(),
        )
    }

    #[test]
    fn test_cache_creation() {
        let cache = DfaCache::new(decision_state(DecisionKind::Block), 0);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert!(!cache.is_precedence_dfa());
        assert!(cache.s0().is_none());
    }

    #[test]
    fn test_precedence_cache_creation() {
        let cache = DfaCache::new(precedence_decision(), 2);
        assert!(cache.is_precedence_dfa());
        assert_eq!(cache.decision(), 2);

        let root = cache.s0().unwrap();
        assert!(!root.is_accept_state());
        assert_eq!(root.edge_count(), 0);
        assert_eq!(root.state_number(), None);
        // The root is not a canonical state
        assert!(cache.is_empty());
    }

    #[test]
    fn test_get_or_insert_numbers_sequentially() {
        let cache = DfaCache::new(decision_state(DecisionKind::Block), 0);

        let a = cache.get_or_insert(state(&[(1, 1)]));
        let b = cache.get_or_insert(state(&[(2, 2)]));
        assert_eq!(a.state_number(), Some(0));
        assert_eq!(b.state_number(), Some(1));

        let again = cache.get_or_insert(state(&[(1, 1)]));
        assert!(Arc::ptr_eq(&a, &again));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_get_by_configs() {
        let cache = DfaCache::new(decision_state(DecisionKind::Block), 0);
        let a = cache.get_or_insert(state(&[(1, 1)]));

        let configs: AtnConfigSet = [AtnConfig::new(1, 1)].into_iter().collect();
        assert!(Arc::ptr_eq(&cache.get(&configs).unwrap(), &a));

        let missing: AtnConfigSet = [AtnConfig::new(9, 1)].into_iter().collect();
        assert!(cache.get(&missing).is_none());
    }

    #[test]
    fn test_set_s0_interns() {
        let cache = DfaCache::new(decision_state(DecisionKind::Block), 0);
        let s0 = cache.set_s0(state(&[(1, 1), (1, 2)])).unwrap();

        assert!(Arc::ptr_eq(&cache.s0().unwrap(), &s0));
        assert_eq!(cache.len(), 1);
        assert!(Arc::ptr_eq(&cache.states()[0], &s0));
    }

    #[test]
    fn test_set_s0_rejected_on_precedence_dfa() {
        let cache = DfaCache::new(precedence_decision(), 0);
        let root = cache.s0().unwrap();

        let err = cache.set_s0(state(&[(1, 1)])).unwrap_err();
        assert!(matches!(err, DfaError::InvalidOperation { decision: 0, .. }));
        assert!(Arc::ptr_eq(&cache.s0().unwrap(), &root));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_precedence_start_state_round_trip() {
        let cache = DfaCache::new(precedence_decision(), 0);
        let start = cache.get_or_insert(state(&[(3, 1)]));

        cache.set_precedence_start_state(4, Arc::clone(&start)).unwrap();
        let found = cache.precedence_start_state(4).unwrap().unwrap();
        assert!(Arc::ptr_eq(&found, &start));

        // Growth leaves lower levels empty
        assert!(cache.precedence_start_state(0).unwrap().is_none());
        assert!(cache.precedence_start_state(5).unwrap().is_none());
        assert_eq!(cache.s0().unwrap().edge_count(), 5);
    }

    #[test]
    fn test_negative_precedence() {
        let cache = DfaCache::new(precedence_decision(), 0);
        let start = cache.get_or_insert(state(&[(3, 1)]));

        cache.set_precedence_start_state(-1, start).unwrap();
        assert_eq!(cache.s0().unwrap().edge_count(), 0);
        assert!(cache.precedence_start_state(-1).unwrap().is_none());
    }

    #[test]
    fn test_precedence_operations_need_precedence_dfa() {
        let cache = DfaCache::new(decision_state(DecisionKind::Block), 5);
        let start = cache.get_or_insert(state(&[(3, 1)]));

        for _ in 0..2 {
            let err = cache.precedence_start_state(0).unwrap_err();
            assert_eq!(
                err,
                DfaError::InvalidOperation {
                    decision: 5,
                    reason: NOT_PRECEDENCE_DFA,
                }
            );
            assert!(cache
                .set_precedence_start_state(0, Arc::clone(&start))
                .is_err());
            assert!(cache.set_precedence_start_state(-1, Arc::clone(&start)).is_err());
        }
    }

    #[test]
    fn test_states_sorted_by_number() {
        let cache = DfaCache::new(decision_state(DecisionKind::Block), 0);
        for i in 0..20 {
            cache.get_or_insert(state(&[(i, 1)]));
        }

        let numbers: Vec<_> = cache
            .states()
            .iter()
            .map(|s| s.state_number().unwrap())
            .collect();
        assert_eq!(numbers, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_drop_releases_cyclic_states() {
        let cache = DfaCache::new(decision_state(DecisionKind::Block), 0);
        let a = cache.get_or_insert(state(&[(1, 1)]));
        let b = cache.get_or_insert(state(&[(2, 1)]));
        a.set_edge(1, Arc::clone(&b));
        b.set_edge(1, Arc::clone(&a));
        a.set_edge(2, Arc::clone(&a));

        let weak = Arc::downgrade(&a);
        drop(cache);
        drop(a);
        drop(b);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_debug_format() {
        let cache = DfaCache::new(precedence_decision(), 1);
        let debug = format!("{:?}", cache);
        assert!(debug.contains("precedence_dfa: true"));
        assert!(debug.contains("decision: 1"));
    }
}
