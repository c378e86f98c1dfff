use derive_getters::Getters;
use itertools::Itertools;
use log::trace;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt::{Debug, Formatter};
use subset_regex_util::{StateAllocator, StateId};

use crate::automata::nfa::{Nfa, Transition};

/// Deterministic automaton produced by subset construction.
///
/// The transition table is sparse: a missing `(state, symbol)` entry is a dead
/// transition and rejects the input.
#[derive(Clone, PartialEq, Eq, Getters)]
pub struct Dfa {
    start: StateId,
    accepting: BTreeSet<StateId>,
    transitions: Vec<BTreeMap<char, StateId>>,
}

impl Dfa {
    pub fn state_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn alphabet(&self) -> BTreeSet<char> {
        self.transitions.iter().flat_map(|t| t.keys().copied()).collect()
    }

    pub fn next_state(&self, state: StateId, symbol: char) -> Option<StateId> {
        self.transitions.get(state.index())?.get(&symbol).copied()
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting.contains(&state)
    }

    /// Whole-string membership test.
    pub fn matches(&self, input: &str) -> bool {
        let mut current = self.start;
        for symbol in input.chars() {
            match self.next_state(current, symbol) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.is_accepting(current)
    }
}

impl Debug for Dfa {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "start: {}, accepting: {{{}}}", self.start, self.accepting.iter().join(", "))?;
        for (i, t) in self.transitions.iter().enumerate() {
            writeln!(f, "q{i}:")?;
            for (c, ns) in t {
                writeln!(f, "    {c:?} -> {ns}")?;
            }
        }

        Ok(())
    }
}

/// All states reachable from `states` through epsilon transitions only,
/// `states` included.
pub fn epsilon_closure(nfa: &Nfa, states: impl IntoIterator<Item = StateId>) -> BTreeSet<StateId> {
    let mut closure = BTreeSet::new();
    let mut worklist = Vec::new();
    for s in states {
        if closure.insert(s) {
            worklist.push(s);
        }
    }

    while let Some(s) = worklist.pop() {
        for next in nfa.state(s).targets(Transition::OnEpsilon) {
            if closure.insert(next) {
                worklist.push(next);
            }
        }
    }

    closure
}

/// Epsilon closure of every state reachable from `states` on `symbol`.
pub fn move_on(nfa: &Nfa, states: &BTreeSet<StateId>, symbol: char) -> BTreeSet<StateId> {
    let reached = states
        .iter()
        .flat_map(|s| nfa.state(*s).targets(Transition::OnSymbol(symbol)))
        .collect_vec();
    epsilon_closure(nfa, reached)
}

/// Bookkeeping for subset construction. `ids` is the bijection between DFA
/// states and the NFA subsets they stand for; it does not outlive the build.
struct SubsetTable {
    allocator: StateAllocator,
    ids: HashMap<BTreeSet<StateId>, StateId>,
    transitions: Vec<BTreeMap<char, StateId>>,
    accepting: BTreeSet<StateId>,
    worklist: VecDeque<(StateId, BTreeSet<StateId>)>,
    nfa_accept: StateId,
}

impl SubsetTable {
    fn id_for(&mut self, subset: BTreeSet<StateId>) -> StateId {
        if let Some(id) = self.ids.get(&subset) {
            return *id;
        }

        let id = self.allocator.allocate();
        trace!("{id} = {{{}}}", subset.iter().join(", "));
        if subset.contains(&self.nfa_accept) {
            self.accepting.insert(id);
        }
        self.transitions.push(BTreeMap::new());
        self.ids.insert(subset.clone(), id);
        self.worklist.push_back((id, subset));
        id
    }
}

/// Subset construction. The NFA is consumed; only the DFA survives.
pub fn to_dfa(nfa: Nfa) -> Dfa {
    let alphabet = nfa.alphabet();
    let mut table = SubsetTable {
        allocator: StateAllocator::new(),
        ids: HashMap::new(),
        transitions: Vec::new(),
        accepting: BTreeSet::new(),
        worklist: VecDeque::new(),
        nfa_accept: nfa.accept(),
    };

    let start = table.id_for(epsilon_closure(&nfa, [nfa.start()]));

    while let Some((id, subset)) = table.worklist.pop_front() {
        for &symbol in &alphabet {
            let target = move_on(&nfa, &subset, symbol);
            if target.is_empty() {
                continue;
            }
            let target_id = table.id_for(target);
            table.transitions[id.index()].insert(symbol, target_id);
        }
    }

    Dfa {
        start,
        accepting: table.accepting,
        transitions: table.transitions,
    }
}
