// Vocabulary - token names for display
//
// Maps token types to the literal, symbolic and display names a grammar
// declares. Used by the DFA serializer to label parser DFA edges.

use crate::EOF;

/// Token naming table of a grammar
pub trait Vocabulary: Send + Sync {
    /// Largest token type this vocabulary knows about
    fn max_token_type(&self) -> i32;

    /// Literal name (`'+'`), if the token has one
    fn literal_name(&self, token_type: i32) -> Option<&str>;

    /// Symbolic name (`PLUS`), if the token has one. EOF is always named.
    fn symbolic_name(&self, token_type: i32) -> Option<&str>;

    /// Name used in diagnostics and DFA dumps.
    ///
    /// Falls back from an explicit display name to the literal name, the
    /// symbolic name and finally the numeric token type.
    fn display_name(&self, token_type: i32) -> String;
}

/// Vocabulary backed by the name arrays emitted with a generated grammar
#[derive(Debug, Clone, Default)]
pub struct VocabularyImpl {
    literal_names: Vec<Option<String>>,
    symbolic_names: Vec<Option<String>>,
    display_names: Vec<Option<String>>,
    max_token_type: i32,
}

impl VocabularyImpl {
    pub fn new(
        literal_names: Vec<Option<String>>,
        symbolic_names: Vec<Option<String>>,
        display_names: Vec<Option<String>>,
    ) -> Self {
        let longest = literal_names
            .len()
            .max(symbolic_names.len())
            .max(display_names.len());

        Self {
            literal_names,
            symbolic_names,
            display_names,
            // Index 0 is INVALID_TYPE, so the largest type is len - 1
            max_token_type: longest as i32 - 1,
        }
    }

    /// Vocabulary with no names at all; every token displays as its number
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a vocabulary from symbolic names only, index = token type
    pub fn from_symbolic_names<S: AsRef<str>>(names: &[Option<S>]) -> Self {
        let symbolic = names
            .iter()
            .map(|n| n.as_ref().map(|s| s.as_ref().to_string()))
            .collect();
        Self::new(Vec::new(), symbolic, Vec::new())
    }
}

fn lookup(names: &[Option<String>], token_type: i32) -> Option<&str> {
    usize::try_from(token_type)
        .ok()
        .and_then(|i| names.get(i))
        .and_then(|name| name.as_deref())
}

impl Vocabulary for VocabularyImpl {
    fn max_token_type(&self) -> i32 {
        self.max_token_type
    }

    fn literal_name(&self, token_type: i32) -> Option<&str> {
        lookup(&self.literal_names, token_type)
    }

    fn symbolic_name(&self, token_type: i32) -> Option<&str> {
        if token_type == EOF {
            return Some("EOF");
        }
        lookup(&self.symbolic_names, token_type)
    }

    fn display_name(&self, token_type: i32) -> String {
        lookup(&self.display_names, token_type)
            .or_else(|| self.literal_name(token_type))
            .or_else(|| self.symbolic_name(token_type))
            .map(str::to_string)
            .unwrap_or_else(|| token_type.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn test_empty_vocabulary_falls_back_to_numbers() {
        let vocab = VocabularyImpl::empty();
        assert_eq!(vocab.display_name(3), "3");
        assert_eq!(vocab.display_name(EOF), "EOF");
        assert_eq!(vocab.max_token_type(), -1);
    }

    #[test]
    fn test_display_name_precedence() {
        let vocab = VocabularyImpl::new(
            names(&[None, Some("'+'"), None, None]),
            names(&[None, Some("PLUS"), Some("ID"), None]),
            names(&[None, None, None, Some("number")]),
        );

        assert_eq!(vocab.display_name(1), "'+'");
        assert_eq!(vocab.display_name(2), "ID");
        assert_eq!(vocab.display_name(3), "number");
        assert_eq!(vocab.display_name(4), "4");
        assert_eq!(vocab.max_token_type(), 3);
    }

    #[test]
    fn test_negative_types_have_no_names() {
        let vocab = VocabularyImpl::from_symbolic_names(&[None, Some("A")]);
        assert_eq!(vocab.symbolic_name(-2), None);
        assert_eq!(vocab.literal_name(-1), None);
        assert_eq!(vocab.display_name(-2), "-2");
        assert_eq!(vocab.display_name(1), "A");
    }
}
