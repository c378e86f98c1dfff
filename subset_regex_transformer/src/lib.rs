//! Regular expression to DFA compiler.
//!
//! Patterns go through concatenation insertion, shunting-yard conversion to
//! postfix, Thompson's construction and subset construction. The resulting
//! [`Dfa`] answers whole-string membership queries.
//!
//! Supported syntax: alphanumeric literals, `|`, `*`, `+`, `?` and grouping
//! parentheses.

use log::debug;

use crate::automata::{to_dfa, to_nfa};
use crate::regex::{collapse_repeats, display_lexemes, insert_concat, shunting_yard, tokenize, Lexeme};

pub mod automata;
mod error;
pub mod regex;

pub use crate::automata::Dfa;
pub use crate::error::SyntaxError;

/// Lexes `pattern` and makes concatenation explicit.
pub fn augment(pattern: &str) -> Result<Vec<Lexeme>, SyntaxError> {
    Ok(collapse_repeats(insert_concat(&tokenize(pattern)?)))
}

pub fn to_postfix(pattern: &str) -> Result<Vec<Lexeme>, SyntaxError> {
    let postfix = shunting_yard(&augment(pattern)?)?;
    debug!("{pattern:?} -> postfix {}", display_lexemes(&postfix));
    Ok(postfix)
}

pub fn to_automata(postfix: &[Lexeme]) -> Result<Dfa, SyntaxError> {
    let nfa = to_nfa(postfix)?;
    let nfa_states = nfa.state_count();
    let dfa = to_dfa(nfa);
    debug!("{nfa_states} NFA states -> {} DFA states", dfa.state_count());
    Ok(dfa)
}

pub fn compile(pattern: &str) -> Result<Dfa, SyntaxError> {
    to_automata(&to_postfix(pattern)?)
}

pub fn matches(dfa: &Dfa, input: &str) -> bool {
    dfa.matches(input)
}
