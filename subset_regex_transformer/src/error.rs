use thiserror::Error;

use crate::regex::Token;

/// Reasons a pattern fails to compile.
///
/// Every malformation is detected while compiling; matching against a built
/// [`Dfa`](crate::Dfa) cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("unsupported character {found:?} at position {position}")]
    UnsupportedCharacter { found: char, position: usize },

    #[error("unmatched ')' at position {position}")]
    UnmatchedCloseParen { position: usize },

    #[error("unclosed '(' at position {position}")]
    UnclosedParen { position: usize },

    #[error("operator '{operator}' at position {position} is missing an operand")]
    MissingOperand { operator: Token, position: usize },

    #[error("expression produced {fragments} fragments instead of exactly one")]
    ImbalancedExpression { fragments: usize },
}
