// DFA State - a memoized prediction state
//
// A DFA state stands for the set of ATN configurations reachable after some
// input at one decision. Its identity is that configuration set: the state
// number is only assigned when the state is interned and is never compared.

use parking_lot::RwLock;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};
use tern_atn::{AtnConfigSet, INVALID_ALT_NUMBER};

/// State number of the shared ERROR state
pub const ERROR_STATE_NUMBER: u32 = u32::MAX;

static ERROR: LazyLock<Arc<DfaState>> = LazyLock::new(|| {
    let mut error = DfaState::new(AtnConfigSet::default());
    error.state_number = Some(ERROR_STATE_NUMBER);
    Arc::new(error)
});

/// A semantic predicate guarding an alternative of an accept state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredPrediction {
    /// Rendered predicate expression
    pub predicate: String,

    /// Alternative predicted when the predicate holds
    pub alt: u32,
}

impl PredPrediction {
    pub fn new(predicate: impl Into<String>, alt: u32) -> Self {
        Self {
            predicate: predicate.into(),
            alt,
        }
    }
}

impl fmt::Display for PredPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.predicate, self.alt)
    }
}

/// A DFA state
///
/// Built by prediction while still owned, then handed to
/// [`DfaCache::get_or_insert`](crate::DfaCache::get_or_insert), after which it
/// is shared as `Arc<DfaState>` and only its edge table changes.
pub struct DfaState {
    /// Assigned on canonical insertion
    pub(crate) state_number: Option<u32>,

    /// Configurations this state represents
    configs: AtnConfigSet,

    /// Transitions: symbol index (or precedence) -> target state
    edges: RwLock<Vec<Option<Arc<DfaState>>>>,

    is_accept_state: bool,

    /// Predicted alternative when accepting
    prediction: u32,

    /// SLL conflict; prediction must retry with full context
    requires_full_context: bool,

    /// Predicates to evaluate when accepting, in alternative order
    predicates: Option<Vec<PredPrediction>>,
}

impl DfaState {
    pub fn new(configs: AtnConfigSet) -> Self {
        Self {
            state_number: None,
            configs,
            edges: RwLock::new(Vec::new()),
            is_accept_state: false,
            prediction: INVALID_ALT_NUMBER,
            requires_full_context: false,
            predicates: None,
        }
    }

    /// The synthetic root of a precedence DFA: no configurations, not
    /// accepting, an empty edge table indexed by precedence
    pub(crate) fn precedence_root(capacity: usize) -> Self {
        let root = Self::new(AtnConfigSet::default());
        *root.edges.write() = Vec::with_capacity(capacity);
        root
    }

    /// The shared state meaning "no viable transition"
    pub fn error() -> Arc<DfaState> {
        Arc::clone(&ERROR)
    }

    /// Mark the state accepting with a predicted alternative
    pub fn accepting(mut self, prediction: u32) -> Self {
        self.is_accept_state = true;
        self.prediction = prediction;
        self
    }

    /// Accept, deferring the choice to predicate evaluation
    pub fn with_predicates(mut self, predicates: Vec<PredPrediction>) -> Self {
        self.is_accept_state = true;
        self.prediction = INVALID_ALT_NUMBER;
        self.predicates = Some(predicates);
        self
    }

    /// Accept on an SLL conflict that needs full-context prediction
    pub fn requiring_full_context(mut self, min_alt: u32) -> Self {
        self.is_accept_state = true;
        self.requires_full_context = true;
        self.prediction = min_alt;
        self
    }

    pub fn state_number(&self) -> Option<u32> {
        self.state_number
    }

    pub fn configs(&self) -> &AtnConfigSet {
        &self.configs
    }

    pub fn is_accept_state(&self) -> bool {
        self.is_accept_state
    }

    pub fn prediction(&self) -> u32 {
        self.prediction
    }

    pub fn requires_full_context(&self) -> bool {
        self.requires_full_context
    }

    pub fn predicates(&self) -> Option<&[PredPrediction]> {
        self.predicates.as_deref()
    }

    pub fn is_error(&self) -> bool {
        self.state_number == Some(ERROR_STATE_NUMBER)
    }

    /// Target of the edge at `index`, if one has been recorded
    pub fn edge(&self, index: usize) -> Option<Arc<DfaState>> {
        self.edges.read().get(index).cloned().flatten()
    }

    /// Record an edge, growing the table with empty slots as needed.
    ///
    /// The whole grow-and-store runs under this state's write lock, so
    /// concurrent writers to different indices never lose each other's slots.
    pub fn set_edge(&self, index: usize, target: Arc<DfaState>) {
        let mut edges = self.edges.write();
        if index >= edges.len() {
            edges.resize(index + 1, None);
        }
        edges[index] = Some(target);
    }

    /// Current length of the edge table (populated or not)
    pub fn edge_count(&self) -> usize {
        self.edges.read().len()
    }

    /// Copy of the edge table
    pub fn edges(&self) -> Vec<Option<Arc<DfaState>>> {
        self.edges.read().clone()
    }

    pub(crate) fn clear_edges(&self) {
        self.edges.write().clear();
    }
}

impl PartialEq for DfaState {
    fn eq(&self, other: &Self) -> bool {
        self.configs == other.configs
    }
}

impl Eq for DfaState {}

impl Hash for DfaState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.configs.hash(state);
    }
}

// Edges are left out: they may point back at this state.
impl fmt::Debug for DfaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DfaState")
            .field("state_number", &self.state_number)
            .field("configs", &self.configs)
            .field("is_accept_state", &self.is_accept_state)
            .field("prediction", &self.prediction)
            .field("requires_full_context", &self.requires_full_context)
            .field("predicates", &self.predicates)
            .field("edge_count", &self.edge_count())
            .finish()
    }
}

pub(crate) fn format_predicates(
    f: &mut fmt::Formatter<'_>,
    predicates: &[PredPrediction],
) -> fmt::Result {
    write!(f, "[")?;
    for (i, pred) in predicates.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", pred)?;
    }
    write!(f, "]")
}

impl fmt::Display for DfaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state_number {
            Some(n) => write!(f, "{}:{}", n, self.configs)?,
            None => write!(f, "-:{}", self.configs)?,
        }
        if self.is_accept_state {
            write!(f, "=>")?;
            match &self.predicates {
                Some(predicates) => format_predicates(f, predicates)?,
                None => write!(f, "{}", self.prediction)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tern_atn::AtnConfig;

    fn configs(entries: &[(u32, u32)]) -> AtnConfigSet {
        entries
            .iter()
            .map(|&(state, alt)| AtnConfig::new(state, alt))
            .collect()
    }

    #[test]
    fn test_state_creation() {
        let state = DfaState::new(configs(&[(1, 1)]));
        assert_eq!(state.state_number(), None);
        assert!(!state.is_accept_state());
        assert_eq!(state.prediction(), INVALID_ALT_NUMBER);
        assert!(!state.requires_full_context());
        assert!(state.predicates().is_none());
        assert_eq!(state.edge_count(), 0);
    }

    #[test]
    fn test_equality_ignores_state_number() {
        let mut a = DfaState::new(configs(&[(1, 1), (2, 2)]));
        a.state_number = Some(4);
        let b = DfaState::new(configs(&[(1, 1), (2, 2)]));
        let c = DfaState::new(configs(&[(1, 1)]));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_state_transitions() {
        let from = DfaState::new(configs(&[(1, 1)]));
        let to = Arc::new(DfaState::new(configs(&[(2, 1)])));

        from.set_edge(3, Arc::clone(&to));
        assert_eq!(from.edge_count(), 4);
        assert!(Arc::ptr_eq(&from.edge(3).unwrap(), &to));
        assert!(from.edge(0).is_none());
        assert!(from.edge(99).is_none());

        from.set_edge(1, DfaState::error());
        assert!(from.edge(1).unwrap().is_error());
        assert_eq!(from.edge_count(), 4);
    }

    #[test]
    fn test_error_state_is_shared() {
        let a = DfaState::error();
        let b = DfaState::error();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.state_number(), Some(ERROR_STATE_NUMBER));
    }

    #[test]
    fn test_precedence_root_shape() {
        let root = DfaState::precedence_root(8);
        assert_eq!(root.edge_count(), 0);
        assert!(!root.is_accept_state());
        assert!(root.configs().is_empty());
    }

    #[test]
    fn test_display() {
        let mut state = DfaState::new(configs(&[(1, 2)])).accepting(2);
        state.state_number = Some(5);
        assert_eq!(state.to_string(), "5:[(1,2)]=>2");

        let state = DfaState::new(configs(&[(3, 1), (4, 2)])).with_predicates(vec![
            PredPrediction::new("p", 1),
            PredPrediction::new("q", 2),
        ]);
        assert_eq!(state.to_string(), "-:[(3,1), (4,2)]=>[(p, 1), (q, 2)]");

        let state = DfaState::new(configs(&[(1, 1)]));
        assert_eq!(state.to_string(), "-:[(1,1)]");
    }
}
