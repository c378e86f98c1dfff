//! Regular expressions compiled to deterministic finite automata.
//!
//! Patterns can be compiled at run time with [`compile`], or while building
//! with the [`regex!`] macro, which emits a `const fn` matcher. Expansions of
//! `regex!` refer to `subset_regex_util`, so crates using the macro need it as
//! a dependency as well.
//!
//! ```
//! let dfa = subset_regex::compile("(a|b)*c").unwrap();
//! assert!(subset_regex::matches(&dfa, "abbac"));
//! assert!(!subset_regex::matches(&dfa, "abba"));
//! ```
//!
//! A pattern that does not compile is rejected while building:
//!
//! ```compile_fail
//! subset_regex::regex!("(a|b");
//! ```

pub use proc_subset_regex::regex;
pub use subset_regex_transformer::{compile, matches, Dfa, SyntaxError};

pub mod suite;
