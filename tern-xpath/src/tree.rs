// Parse trees
//
// Just enough of a parse tree for path evaluation: rule nodes with children
// and terminal leaves. Nodes are shared, so evaluation results are handles
// into the same tree rather than copies.

use std::sync::Arc;

/// Interior node produced by a rule invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleNode {
    pub rule_index: usize,
    pub children: Vec<Arc<ParseTree>>,
}

/// Leaf holding a matched token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalNode {
    pub token_type: i32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTree {
    Rule(RuleNode),
    Terminal(TerminalNode),
}

impl ParseTree {
    pub fn rule(rule_index: usize, children: Vec<Arc<ParseTree>>) -> Arc<Self> {
        Arc::new(ParseTree::Rule(RuleNode {
            rule_index,
            children,
        }))
    }

    pub fn terminal(token_type: i32, text: impl Into<String>) -> Arc<Self> {
        Arc::new(ParseTree::Terminal(TerminalNode {
            token_type,
            text: text.into(),
        }))
    }

    /// Direct children; empty for terminals
    pub fn children(&self) -> &[Arc<ParseTree>] {
        match self {
            ParseTree::Rule(node) => &node.children,
            ParseTree::Terminal(_) => &[],
        }
    }

    pub fn rule_index(&self) -> Option<usize> {
        match self {
            ParseTree::Rule(node) => Some(node.rule_index),
            ParseTree::Terminal(_) => None,
        }
    }

    pub fn token_type(&self) -> Option<i32> {
        match self {
            ParseTree::Rule(_) => None,
            ParseTree::Terminal(node) => Some(node.token_type),
        }
    }

    /// Concatenated text of all terminals below this node
    pub fn text(&self) -> String {
        match self {
            ParseTree::Terminal(node) => node.text.clone(),
            ParseTree::Rule(node) => node.children.iter().map(|c| c.text()).collect(),
        }
    }

    /// `tree` followed by every node below it, in pre-order
    pub fn descendants(tree: &Arc<ParseTree>) -> Vec<Arc<ParseTree>> {
        let mut nodes = Vec::new();
        let mut stack = vec![Arc::clone(tree)];
        while let Some(node) = stack.pop() {
            stack.extend(node.children().iter().rev().cloned());
            nodes.push(node);
        }
        nodes
    }
}
