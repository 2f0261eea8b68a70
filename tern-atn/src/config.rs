// ATN configurations
//
// A configuration is a (state, alt, context) triple reached while simulating
// the ATN. The set of configurations reached after some input is the identity
// of a DFA state: two DFA states are the same state iff their sets are equal.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Context id of the empty prediction context
pub const EMPTY_CONTEXT: u32 = 0;

/// A single ATN configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AtnConfig {
    /// ATN state number
    pub state: u32,

    /// Alternative this configuration predicts
    pub alt: u32,

    /// Interned prediction context (the rule invocation stack)
    pub context: u32,
}

impl AtnConfig {
    pub fn new(state: u32, alt: u32) -> Self {
        Self {
            state,
            alt,
            context: EMPTY_CONTEXT,
        }
    }

    pub fn with_context(mut self, context: u32) -> Self {
        self.context = context;
        self
    }
}

impl fmt::Display for AtnConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context == EMPTY_CONTEXT {
            write!(f, "({},{})", self.state, self.alt)
        } else {
            write!(f, "({},{},[{}])", self.state, self.alt, self.context)
        }
    }
}

/// An ordered, duplicate-free set of configurations
///
/// Equality and hashing cover the configurations in insertion order plus the
/// full-context flag, so a set can be used directly as an intern key.
#[derive(Debug, Clone, Default)]
pub struct AtnConfigSet {
    configs: Vec<AtnConfig>,

    lookup: AHashSet<AtnConfig>,

    /// Built during full-context (LL) prediction
    full_ctx: bool,
}

impl AtnConfigSet {
    pub fn new(full_ctx: bool) -> Self {
        Self {
            configs: Vec::new(),
            lookup: AHashSet::default(),
            full_ctx,
        }
    }

    /// Add a configuration, returning false if it was already present
    pub fn add(&mut self, config: AtnConfig) -> bool {
        if !self.lookup.insert(config) {
            return false;
        }
        self.configs.push(config);
        true
    }

    pub fn contains(&self, config: &AtnConfig) -> bool {
        self.lookup.contains(config)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AtnConfig> {
        self.configs.iter()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn is_full_ctx(&self) -> bool {
        self.full_ctx
    }

    /// All alternatives predicted by the set, ascending
    pub fn alts(&self) -> BTreeSet<u32> {
        self.configs.iter().map(|c| c.alt).collect()
    }

    /// The alternative every configuration agrees on, if there is one
    pub fn unique_alt(&self) -> Option<u32> {
        let mut alts = self.configs.iter().map(|c| c.alt);
        let first = alts.next()?;
        alts.all(|alt| alt == first).then_some(first)
    }
}

impl PartialEq for AtnConfigSet {
    fn eq(&self, other: &Self) -> bool {
        self.full_ctx == other.full_ctx && self.configs == other.configs
    }
}

impl Eq for AtnConfigSet {}

impl Hash for AtnConfigSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.configs.hash(state);
        self.full_ctx.hash(state);
    }
}

impl FromIterator<AtnConfig> for AtnConfigSet {
    fn from_iter<I: IntoIterator<Item = AtnConfig>>(iter: I) -> Self {
        let mut set = Self::new(false);
        for config in iter {
            set.add(config);
        }
        set
    }
}

impl fmt::Display for AtnConfigSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, config) in self.configs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", config)?;
        }
        write!(f, "]")
    }
}
