// Path elements
//
// One step of a tree path. Evaluation never fails; a step that matches
// nothing returns an empty list.

use crate::tree::ParseTree;
use crate::{XPathError, XPathResult};
use std::sync::Arc;
use tern_atn::Vocabulary;

/// Name of the wildcard step
pub const WILDCARD: &str = "*";

/// A single step of a tree path
pub trait XPathElement: Send + Sync {
    /// Nodes this step selects, starting from `tree`
    fn evaluate(&self, tree: &Arc<ParseTree>) -> Vec<Arc<ParseTree>>;

    /// Whether the step was written with a leading `!`
    fn is_inverted(&self) -> bool;

    /// Rule name, token name or `*`
    fn name(&self) -> &str;
}

/// `*` - the direct children of a node, unfiltered
#[derive(Debug, Clone, Default)]
pub struct XPathWildcardElement {
    inverted: bool,
}

impl XPathWildcardElement {
    pub fn new(inverted: bool) -> Self {
        Self { inverted }
    }
}

impl XPathElement for XPathWildcardElement {
    fn evaluate(&self, tree: &Arc<ParseTree>) -> Vec<Arc<ParseTree>> {
        // `!*` is legal and selects nothing
        if self.inverted {
            return Vec::new();
        }
        tree.children().to_vec()
    }

    fn is_inverted(&self) -> bool {
        self.inverted
    }

    fn name(&self) -> &str {
        WILDCARD
    }
}

/// `//*` - a node and everything below it
#[derive(Debug, Clone, Default)]
pub struct XPathWildcardAnywhereElement {
    inverted: bool,
}

impl XPathWildcardAnywhereElement {
    pub fn new(inverted: bool) -> Self {
        Self { inverted }
    }
}

impl XPathElement for XPathWildcardAnywhereElement {
    fn evaluate(&self, tree: &Arc<ParseTree>) -> Vec<Arc<ParseTree>> {
        if self.inverted {
            return Vec::new();
        }
        ParseTree::descendants(tree)
    }

    fn is_inverted(&self) -> bool {
        self.inverted
    }

    fn name(&self) -> &str {
        WILDCARD
    }
}

/// Child rule nodes of one rule (or, inverted, of any other rule)
#[derive(Debug, Clone)]
pub struct XPathRuleElement {
    rule_name: String,
    rule_index: usize,
    inverted: bool,
}

impl XPathRuleElement {
    pub fn new(rule_name: impl Into<String>, rule_index: usize, inverted: bool) -> Self {
        Self {
            rule_name: rule_name.into(),
            rule_index,
            inverted,
        }
    }

    /// Resolve `rule_name` against the grammar's rule names
    pub fn named(rule_name: &str, rule_names: &[&str], inverted: bool) -> XPathResult<Self> {
        let rule_index = rule_names
            .iter()
            .position(|name| *name == rule_name)
            .ok_or_else(|| XPathError::UnknownRule(rule_name.to_string()))?;
        Ok(Self::new(rule_name, rule_index, inverted))
    }

    pub fn rule_index(&self) -> usize {
        self.rule_index
    }
}

impl XPathElement for XPathRuleElement {
    fn evaluate(&self, tree: &Arc<ParseTree>) -> Vec<Arc<ParseTree>> {
        tree.children()
            .iter()
            .filter(|child| match child.rule_index() {
                Some(index) => (index == self.rule_index) != self.inverted,
                None => false,
            })
            .cloned()
            .collect()
    }

    fn is_inverted(&self) -> bool {
        self.inverted
    }

    fn name(&self) -> &str {
        &self.rule_name
    }
}

/// Child terminals of one token type (or, inverted, of any other type)
#[derive(Debug, Clone)]
pub struct XPathTokenElement {
    token_name: String,
    token_type: i32,
    inverted: bool,
}

impl XPathTokenElement {
    pub fn new(token_name: impl Into<String>, token_type: i32, inverted: bool) -> Self {
        Self {
            token_name: token_name.into(),
            token_type,
            inverted,
        }
    }

    /// Resolve `token_name` by symbolic or literal name
    pub fn named(
        token_name: &str,
        vocabulary: &dyn Vocabulary,
        inverted: bool,
    ) -> XPathResult<Self> {
        let token_type = (tern_atn::MIN_USER_TOKEN_TYPE..=vocabulary.max_token_type())
            .find(|&t| {
                vocabulary.symbolic_name(t) == Some(token_name)
                    || vocabulary.literal_name(t) == Some(token_name)
            })
            .ok_or_else(|| XPathError::UnknownToken(token_name.to_string()))?;
        Ok(Self::new(token_name, token_type, inverted))
    }

    pub fn token_type(&self) -> i32 {
        self.token_type
    }
}

impl XPathElement for XPathTokenElement {
    fn evaluate(&self, tree: &Arc<ParseTree>) -> Vec<Arc<ParseTree>> {
        tree.children()
            .iter()
            .filter(|child| match child.token_type() {
                Some(token_type) => (token_type == self.token_type) != self.inverted,
                None => false,
            })
            .cloned()
            .collect()
    }

    fn is_inverted(&self) -> bool {
        self.inverted
    }

    fn name(&self) -> &str {
        &self.token_name
    }
}
