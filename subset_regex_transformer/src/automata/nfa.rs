use log::trace;
use std::collections::BTreeSet;
use std::fmt::{Debug, Formatter};
use subset_regex_util::{StateAllocator, StateId};

use crate::error::SyntaxError;
use crate::regex::{Lexeme, Quantifier, Token};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Transition {
    OnSymbol(char),
    OnEpsilon,
}

#[derive(Default, Clone)]
pub struct NfaState {
    transitions: Vec<(Transition, StateId)>,
}

impl NfaState {
    /// Destinations form a set: adding an existing edge is a no-op.
    pub fn add_transition(&mut self, t: Transition, d: StateId) {
        if !self.transitions.contains(&(t, d)) {
            self.transitions.push((t, d))
        }
    }

    pub fn transitions(&self) -> &[(Transition, StateId)] {
        &self.transitions
    }

    pub fn targets(&self, t: Transition) -> impl Iterator<Item = StateId> + '_ {
        self.transitions
            .iter()
            .filter(move |(tt, _)| *tt == t)
            .map(|(_, d)| *d)
    }
}

impl Debug for NfaState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (tt, ns) in &self.transitions {
            match tt {
                Transition::OnSymbol(c) => writeln!(f, "    {c:?} -> {ns}")?,
                Transition::OnEpsilon => writeln!(f, "    Empty -> {ns}")?,
            }
        }

        Ok(())
    }
}

/// A Thompson NFA with a single start and a single accept state.
pub struct Nfa {
    start: StateId,
    accept: StateId,
    states: Vec<NfaState>,
}

impl Nfa {
    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn accept(&self) -> StateId {
        self.accept
    }

    pub fn state(&self, id: StateId) -> &NfaState {
        &self.states[id.index()]
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Every non-epsilon symbol used by some transition
    pub fn alphabet(&self) -> BTreeSet<char> {
        self.states
            .iter()
            .flat_map(|s| s.transitions.iter())
            .filter_map(|(t, _)| match t {
                Transition::OnSymbol(c) => Some(*c),
                Transition::OnEpsilon => None,
            })
            .collect()
    }
}

impl Debug for Nfa {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "start: {}, accept: {}", self.start, self.accept)?;
        for (i, s) in self.states.iter().enumerate() {
            writeln!(f, "q{i}:")?;
            write!(f, "{s:?}")?;
        }

        Ok(())
    }
}

/// A partially built automaton. Its transitions live in the builder's arena;
/// the fragment only records which arena entries it owns. Composition consumes
/// the operand fragments.
struct Fragment {
    start: StateId,
    accept: StateId,
    states: Vec<StateId>,
}

impl Fragment {
    fn compose<const N: usize>(
        start: StateId,
        accept: StateId,
        operands: [Fragment; N],
        fresh: &[StateId],
    ) -> Fragment {
        let mut states = Vec::with_capacity(fresh.len() + operands.iter().map(|o| o.states.len()).sum::<usize>());
        for operand in operands {
            states.extend(operand.states);
        }
        states.extend_from_slice(fresh);
        Fragment { start, accept, states }
    }
}

/// Build context for one Thompson construction: owns the state arena, the id
/// allocator and the fragment stack.
struct NfaBuilder {
    states: Vec<NfaState>,
    allocator: StateAllocator,
    stack: Vec<Fragment>,
}

impl NfaBuilder {
    fn new() -> Self {
        Self {
            states: Vec::new(),
            allocator: StateAllocator::new(),
            stack: Vec::new(),
        }
    }

    fn new_state(&mut self) -> StateId {
        let id = self.allocator.allocate();
        self.states.push(NfaState::default());
        debug_assert_eq!(id.index() + 1, self.states.len());
        id
    }

    fn epsilon(&mut self, from: StateId, to: StateId) {
        self.states[from.index()].add_transition(Transition::OnEpsilon, to);
    }

    fn pop_operand(&mut self, lexeme: &Lexeme) -> Result<Fragment, SyntaxError> {
        self.stack.pop().ok_or(SyntaxError::MissingOperand {
            operator: *lexeme.token(),
            position: *lexeme.position(),
        })
    }

    fn literal(&mut self, c: char) -> Fragment {
        let start = self.new_state();
        let accept = self.new_state();
        self.states[start.index()].add_transition(Transition::OnSymbol(c), accept);
        Fragment::compose(start, accept, [], &[start, accept])
    }

    fn star(&mut self, x: Fragment) -> Fragment {
        let start = self.new_state();
        let accept = self.new_state();
        self.epsilon(start, accept);
        self.epsilon(start, x.start);
        self.epsilon(x.accept, accept);
        self.epsilon(accept, x.start);
        Fragment::compose(start, accept, [x], &[start, accept])
    }

    fn plus(&mut self, x: Fragment) -> Fragment {
        let start = self.new_state();
        let accept = self.new_state();
        self.epsilon(start, x.start);
        self.epsilon(x.accept, accept);
        self.epsilon(x.accept, start);
        Fragment::compose(start, accept, [x], &[start, accept])
    }

    fn optional(&mut self, x: Fragment) -> Fragment {
        let start = self.new_state();
        let accept = self.new_state();
        self.epsilon(start, accept);
        self.epsilon(start, x.start);
        self.epsilon(x.accept, accept);
        Fragment::compose(start, accept, [x], &[start, accept])
    }

    fn concat(&mut self, x: Fragment, y: Fragment) -> Fragment {
        self.epsilon(x.accept, y.start);
        let (start, accept) = (x.start, y.accept);
        Fragment::compose(start, accept, [x, y], &[])
    }

    fn union(&mut self, x: Fragment, y: Fragment) -> Fragment {
        let start = self.new_state();
        let accept = self.new_state();
        self.epsilon(start, x.start);
        self.epsilon(start, y.start);
        self.epsilon(x.accept, accept);
        self.epsilon(y.accept, accept);
        Fragment::compose(start, accept, [x, y], &[start, accept])
    }

    fn push_lexeme(&mut self, lexeme: &Lexeme) -> Result<(), SyntaxError> {
        let fragment = match *lexeme.token() {
            Token::Literal(c) => self.literal(c),
            Token::Repeat(q) => {
                let x = self.pop_operand(lexeme)?;
                match q {
                    Quantifier::Star => self.star(x),
                    Quantifier::Plus => self.plus(x),
                    Quantifier::Optional => self.optional(x),
                }
            }
            Token::Concat | Token::Union => {
                let y = self.pop_operand(lexeme)?;
                let x = self.pop_operand(lexeme)?;
                if *lexeme.token() == Token::Concat {
                    self.concat(x, y)
                }
                else {
                    self.union(x, y)
                }
            }
            // Shunting-yard never emits parentheses, but hand-built streams can
            Token::OpenParen => {
                return Err(SyntaxError::UnclosedParen { position: *lexeme.position() })
            }
            Token::CloseParen => {
                return Err(SyntaxError::UnmatchedCloseParen { position: *lexeme.position() })
            }
        };
        trace!("{} -> fragment {}..{}", lexeme.token(), fragment.start, fragment.accept);
        self.stack.push(fragment);
        Ok(())
    }

    fn finish(mut self) -> Result<Nfa, SyntaxError> {
        let fragment = match self.stack.pop() {
            Some(fragment) if self.stack.is_empty() => fragment,
            popped => {
                let fragments = self.stack.len() + usize::from(popped.is_some());
                return Err(SyntaxError::ImbalancedExpression { fragments });
            }
        };
        debug_assert_eq!(fragment.states.len(), self.states.len());

        Ok(Nfa {
            start: fragment.start,
            accept: fragment.accept,
            states: self.states,
        })
    }
}

/// Thompson's construction over a postfix lexeme stream.
pub fn to_nfa(postfix: &[Lexeme]) -> Result<Nfa, SyntaxError> {
    let mut builder = NfaBuilder::new();
    for lexeme in postfix {
        builder.push_lexeme(lexeme)?;
    }
    builder.finish()
}
