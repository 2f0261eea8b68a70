// Tern XPath - path elements over parse trees
//!
// Each element evaluates one step of a tree path against a node:
// - `*`      XPathWildcardElement: every child
// - `//*`    XPathWildcardAnywhereElement: the node and all its descendants
// - `expr`   XPathRuleElement: child rule nodes of one rule
// - `ID`     XPathTokenElement: child terminals of one token type
//
// A leading `!` inverts the element.

mod element;
mod tree;

pub use element::{
    XPathElement, XPathRuleElement, XPathTokenElement, XPathWildcardAnywhereElement,
    XPathWildcardElement, WILDCARD,
};
pub use tree::{ParseTree, RuleNode, TerminalNode};

use thiserror::Error;

/// Errors raised while building path elements
#[derive(Debug, Error, PartialEq, Eq)]
pub enum XPathError {
    #[error("{0} is not a valid rule name")]
    UnknownRule(String),

    #[error("{0} is not a valid token name")]
    UnknownToken(String),
}

/// Result type for path element construction
pub type XPathResult<T> = Result<T, XPathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = XPathError::UnknownRule("expr".to_string());
        assert_eq!(err.to_string(), "expr is not a valid rule name");

        let err = XPathError::UnknownToken("ID".to_string());
        assert!(err.to_string().contains("ID"));
    }
}
