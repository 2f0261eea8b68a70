// DFA Serializer - stable text dumps of a DFA cache
//
// One line per recorded transition, states visited in state-number order:
//
//   s0-ID->s1
//   s1-'+'->:s2=>1
//
// Accept states are prefixed with ':' and followed by their prediction (or
// predicate list); states needing full-context prediction carry a '^'.

use crate::cache::DfaCache;
use crate::state::{format_predicates, DfaState};
use std::fmt;
use tern_atn::Vocabulary;

/// How an edge index is turned into a label
trait EdgeLabel {
    fn write_label(&self, f: &mut fmt::Formatter<'_>, index: usize) -> fmt::Result;
}

fn write_state(f: &mut fmt::Formatter<'_>, state: &DfaState) -> fmt::Result {
    if state.is_accept_state() {
        write!(f, ":")?;
    }
    match state.state_number() {
        Some(n) => write!(f, "s{}", n)?,
        None => write!(f, "s?")?,
    }
    if state.requires_full_context() {
        write!(f, "^")?;
    }
    if state.is_accept_state() {
        write!(f, "=>")?;
        match state.predicates() {
            Some(predicates) => format_predicates(f, predicates)?,
            None => write!(f, "{}", state.prediction())?,
        }
    }
    Ok(())
}

fn write_dfa(f: &mut fmt::Formatter<'_>, dfa: &DfaCache, labels: &impl EdgeLabel) -> fmt::Result {
    if dfa.s0().is_none() {
        return Ok(());
    }

    for state in dfa.states() {
        for (index, target) in state.edges().into_iter().enumerate() {
            let Some(target) = target else { continue };
            if target.is_error() {
                continue;
            }
            write_state(f, &state)?;
            write!(f, "-")?;
            labels.write_label(f, index)?;
            write!(f, "->")?;
            write_state(f, &target)?;
            writeln!(f)?;
        }
    }
    Ok(())
}

/// Renders a parser DFA, labelling edges with token display names.
///
/// Parser DFA edges are indexed by token type + 1, so index 0 is EOF.
pub struct DfaSerializer<'a> {
    dfa: &'a DfaCache,
    vocabulary: &'a dyn Vocabulary,
}

impl<'a> DfaSerializer<'a> {
    pub fn new(dfa: &'a DfaCache, vocabulary: &'a dyn Vocabulary) -> Self {
        Self { dfa, vocabulary }
    }
}

impl EdgeLabel for DfaSerializer<'_> {
    fn write_label(&self, f: &mut fmt::Formatter<'_>, index: usize) -> fmt::Result {
        let token_type = index as i32 - 1;
        write!(f, "{}", self.vocabulary.display_name(token_type))
    }
}

impl fmt::Display for DfaSerializer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_dfa(f, self.dfa, self)
    }
}

/// Renders a lexer DFA, labelling edges with the character they consume
pub struct LexerDfaSerializer<'a> {
    dfa: &'a DfaCache,
}

impl<'a> LexerDfaSerializer<'a> {
    pub fn new(dfa: &'a DfaCache) -> Self {
        Self { dfa }
    }
}

impl EdgeLabel for LexerDfaSerializer<'_> {
    fn write_label(&self, f: &mut fmt::Formatter<'_>, index: usize) -> fmt::Result {
        match u32::try_from(index).ok().and_then(char::from_u32) {
            Some(c) => write!(f, "'{}'", c),
            None => write!(f, "'\\u{{{:x}}}'", index),
        }
    }
}

impl fmt::Display for LexerDfaSerializer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_dfa(f, self.dfa, self)
    }
}
