use derive_getters::Getters;
use either::{Either, Left, Right};
use itertools::Itertools;
use log::debug;
use nom::branch::alt;
use nom::character::complete::char as cchar;
use nom::character::complete::satisfy;
use nom::combinator::{map, value};
use nom::IResult;
use std::fmt::{Display, Formatter};

use crate::error::SyntaxError;

type NResult<'a, T> = IResult<&'a str, T>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Quantifier {
    Star,
    Plus,
    Optional,
}

impl Quantifier {
    /// Single quantifier accepting the same language as `self` applied and
    /// then `other` applied to the result.
    pub fn combine(self, other: Quantifier) -> Quantifier {
        if self == other { self } else { Quantifier::Star }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(char),
    Union,
    /// Explicit concatenation, never produced by the lexer
    Concat,
    Repeat(Quantifier),
    OpenParen,
    CloseParen,
}

impl Token {
    pub fn precedence(&self) -> u8 {
        match self {
            Token::Repeat(_) => 3,
            Token::Concat => 2,
            Token::Union => 1,
            Token::Literal(_) | Token::OpenParen | Token::CloseParen => 0,
        }
    }

    pub fn is_unary(&self) -> bool {
        matches!(self, Token::Repeat(_))
    }

    fn ends_operand(&self) -> bool {
        matches!(self, Token::Literal(_) | Token::CloseParen | Token::Repeat(_))
    }

    fn begins_operand(&self) -> bool {
        matches!(self, Token::Literal(_) | Token::OpenParen)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Literal(c) => write!(f, "{c}"),
            Token::Union => write!(f, "|"),
            Token::Concat => write!(f, "."),
            Token::Repeat(Quantifier::Star) => write!(f, "*"),
            Token::Repeat(Quantifier::Plus) => write!(f, "+"),
            Token::Repeat(Quantifier::Optional) => write!(f, "?"),
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
        }
    }
}

/// A token together with the position (in chars) of the pattern character it
/// was read from. Inserted concatenations take the position of the token that
/// follows them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Getters)]
pub struct Lexeme {
    token: Token,
    position: usize,
}

impl Lexeme {
    pub fn new(token: Token, position: usize) -> Self {
        Self { token, position }
    }
}

/// Renders a token stream the way diagnostics print it, e.g. `ab|*c.`
pub fn display_lexemes(lexemes: &[Lexeme]) -> String {
    lexemes.iter().map(|l| l.token()).join("")
}

fn parse_token(input: &str) -> NResult<'_, Token> {
    alt((
        map(satisfy(char::is_alphanumeric), Token::Literal),
        value(Token::Union, cchar('|')),
        value(Token::Repeat(Quantifier::Star), cchar('*')),
        value(Token::Repeat(Quantifier::Plus), cchar('+')),
        value(Token::Repeat(Quantifier::Optional), cchar('?')),
        value(Token::OpenParen, cchar('(')),
        value(Token::CloseParen, cchar(')')),
    ))(input)
}

pub fn tokenize(pattern: &str) -> Result<Vec<Lexeme>, SyntaxError> {
    let mut lexemes = Vec::with_capacity(pattern.len());

    let mut rm = pattern;
    let mut position = 0;
    while let Some(found) = rm.chars().next() {
        let (r, token) = parse_token(rm)
            .map_err(|_| SyntaxError::UnsupportedCharacter { found, position })?;
        lexemes.push(Lexeme::new(token, position));
        rm = r;
        position += 1;
    }

    Ok(lexemes)
}

/// Makes concatenation explicit. Purely local: nothing is validated here.
pub fn insert_concat(lexemes: &[Lexeme]) -> Vec<Lexeme> {
    let mut augmented = Vec::with_capacity(lexemes.len() * 2);

    for (i, lexeme) in lexemes.iter().enumerate() {
        augmented.push(*lexeme);
        if let Some(next) = lexemes.get(i + 1) {
            if lexeme.token.ends_operand() && next.token.begins_operand() {
                augmented.push(Lexeme::new(Token::Concat, next.position));
            }
        }
    }

    augmented
}

/// Collapses runs of quantifiers applied directly to one operand (`a*+?`) into
/// a single quantifier with the same language.
pub fn collapse_repeats(lexemes: Vec<Lexeme>) -> Vec<Lexeme> {
    lexemes
        .into_iter()
        .coalesce(|prev, next| match (prev.token, next.token) {
            (Token::Repeat(a), Token::Repeat(b)) => {
                let combined = a.combine(b);
                debug!("collapsing {a:?}{b:?} at position {} into {combined:?}", prev.position);
                Ok(Lexeme::new(Token::Repeat(combined), prev.position))
            }
            _ => Err((prev, next)),
        })
        .collect_vec()
}

/// Shunting-yard conversion of an augmented (explicit concatenation) stream
/// into postfix order.
pub fn shunting_yard(lexemes: &[Lexeme]) -> Result<Vec<Lexeme>, SyntaxError> {
    let mut output = Vec::with_capacity(lexemes.len());
    // Left: position of an open paren, Right: pending operator
    let mut stack: Vec<Either<usize, Lexeme>> = Vec::new();

    for lexeme in lexemes {
        match lexeme.token {
            Token::Literal(_) => output.push(*lexeme),
            Token::OpenParen => stack.push(Left(lexeme.position)),
            Token::CloseParen => loop {
                match stack.pop() {
                    Some(Left(_)) => break,
                    Some(Right(op)) => output.push(op),
                    None => {
                        return Err(SyntaxError::UnmatchedCloseParen { position: lexeme.position })
                    }
                }
            },
            incoming => {
                let precedence = incoming.precedence();
                while let Some(&Right(top)) = stack.last() {
                    let top_precedence = top.token.precedence();
                    if top_precedence > precedence
                        || (top_precedence == precedence && !incoming.is_unary())
                    {
                        output.push(top);
                        stack.pop();
                    }
                    else {
                        break;
                    }
                }
                stack.push(Right(*lexeme));
            }
        }
    }

    while let Some(entry) = stack.pop() {
        match entry {
            Left(position) => return Err(SyntaxError::UnclosedParen { position }),
            Right(op) => output.push(op),
        }
    }

    Ok(output)
}
