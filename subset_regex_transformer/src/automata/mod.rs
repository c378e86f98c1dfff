pub mod dfa;
pub mod nfa;

pub use dfa::{epsilon_closure, move_on, to_dfa, Dfa};
pub use nfa::{to_nfa, Nfa, NfaState, Transition};
