//! Runner for JSON test suites.
//!
//! A suite is an array of cases:
//!
//! ```json
//! [{ "name": "star", "regex": "a*", "test_strings": [{ "input": "aa", "expected": true }] }]
//! ```
//!
//! Each pattern is compiled once. A pattern that fails to compile is reported
//! and its test strings are skipped; the remaining cases still run.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use subset_regex_transformer::automata::{to_dfa, to_nfa};
use subset_regex_transformer::regex::display_lexemes;
use subset_regex_transformer::{augment, compile, to_postfix, Dfa, SyntaxError};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestString {
    pub input: String,
    pub expected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Case {
    pub name: String,
    pub regex: String,
    #[serde(default)]
    pub test_strings: Vec<TestString>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Suite {
    pub cases: Vec<Case>,
}

impl Suite {
    pub fn from_reader(reader: impl Read) -> Result<Suite> {
        serde_json::from_reader(reader).context("malformed test suite")
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Suite> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("while loading {}", path.display()))
    }

    pub fn run(&self) -> SuiteReport {
        SuiteReport {
            cases: self.cases.iter().map(run_case).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub input: String,
    pub expected: bool,
    pub actual: bool,
}

impl Verdict {
    pub fn is_mismatch(&self) -> bool {
        self.expected != self.actual
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Compiled(Vec<Verdict>),
    CompileError(SyntaxError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    pub name: String,
    pub pattern: String,
    pub outcome: Outcome,
}

impl CaseReport {
    pub fn mismatches(&self) -> Vec<&Verdict> {
        match &self.outcome {
            Outcome::Compiled(verdicts) => verdicts.iter().filter(|v| v.is_mismatch()).collect(),
            Outcome::CompileError(_) => Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(&self.outcome, Outcome::Compiled(verdicts) if verdicts.iter().all(|v| !v.is_mismatch()))
    }
}

impl Display for CaseReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}: {}", self.name, self.pattern)?;
        match &self.outcome {
            Outcome::CompileError(e) => writeln!(f, "    failed to compile: {e}")?,
            Outcome::Compiled(verdicts) => {
                for v in verdicts {
                    let marker = if v.is_mismatch() { "MISMATCH" } else { "ok" };
                    writeln!(
                        f,
                        "    {marker:<8} {:?} is {}, was expected {}",
                        v.input, v.actual, v.expected
                    )?;
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteReport {
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn is_success(&self) -> bool {
        self.cases.iter().all(CaseReport::is_success)
    }

    pub fn mismatch_count(&self) -> usize {
        self.cases.iter().map(|c| c.mismatches().len()).sum()
    }

    pub fn compile_error_count(&self) -> usize {
        self.cases
            .iter()
            .filter(|c| matches!(c.outcome, Outcome::CompileError(_)))
            .count()
    }
}

impl Display for SuiteReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for case in &self.cases {
            writeln!(f, "{case}")?;
        }
        writeln!(
            f,
            "{} patterns, {} failed to compile, {} mismatches",
            self.cases.len(),
            self.compile_error_count(),
            self.mismatch_count()
        )
    }
}

fn check_strings(dfa: &Dfa, test_strings: &[TestString]) -> Vec<Verdict> {
    test_strings
        .iter()
        .map(|t| {
            let actual = dfa.matches(&t.input);
            if actual != t.expected {
                info!("{:?}: got {actual}, expected {}", t.input, t.expected);
            }
            Verdict {
                input: t.input.clone(),
                expected: t.expected,
                actual,
            }
        })
        .collect()
}

pub fn run_case(case: &Case) -> CaseReport {
    debug!("running {} ({:?})", case.name, case.regex);
    let outcome = match compile(&case.regex) {
        Ok(dfa) => Outcome::Compiled(check_strings(&dfa, &case.test_strings)),
        Err(e) => {
            warn!("{}: skipping {} test strings: {e}", case.name, case.test_strings.len());
            Outcome::CompileError(e)
        }
    };

    CaseReport {
        name: case.name.clone(),
        pattern: case.regex.clone(),
        outcome,
    }
}

/// Renders every intermediate stage of compiling `case`'s pattern.
pub fn diagnostics(case: &Case) -> Result<String, SyntaxError> {
    let augmented = augment(&case.regex)?;
    let postfix = to_postfix(&case.regex)?;
    let nfa = to_nfa(&postfix)?;
    let nfa_dump = format!("{nfa:?}");
    let dfa = to_dfa(nfa);

    Ok(format!(
        "{}: {}\nWith concat_op: {}\nPostFix form: {}\nNFA:\n{nfa_dump}DFA:\n{dfa:?}",
        case.name,
        case.regex,
        display_lexemes(&augmented),
        display_lexemes(&postfix),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUITE: &str = r#"[
        {
            "name": "grouping",
            "regex": "(a|b)*c",
            "test_strings": [
                { "input": "aabbc", "expected": true },
                { "input": "aabbca", "expected": true }
            ]
        },
        { "name": "broken", "regex": "(a|b", "test_strings": [{ "input": "a", "expected": true }] },
        { "name": "plus", "regex": "a+", "test_strings": [{ "input": "", "expected": false }] }
    ]"#;

    #[test]
    fn loads_suite() {
        let suite = Suite::from_reader(SUITE.as_bytes()).unwrap();
        assert_eq!(suite.cases.len(), 3);
        assert_eq!(suite.cases[0].test_strings[1].input, "aabbca");
    }

    #[test]
    fn rejects_malformed_json() {
        let err = Suite::from_reader("{ not json".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("malformed test suite"));
    }

    #[test]
    fn missing_file_has_context() {
        let err = Suite::from_path("/nonexistent/suite.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/suite.json"));
    }

    #[test]
    fn compile_errors_skip_case_and_continue() {
        let report = Suite::from_reader(SUITE.as_bytes()).unwrap().run();

        assert_eq!(report.compile_error_count(), 1);
        assert!(matches!(
            report.cases[1].outcome,
            Outcome::CompileError(SyntaxError::UnclosedParen { .. })
        ));
        assert!(report.cases[2].is_success());
        assert!(!report.is_success());
    }

    #[test]
    fn reports_mismatches() {
        let report = Suite::from_reader(SUITE.as_bytes()).unwrap().run();
        let mismatches = report.cases[0].mismatches();

        assert_eq!(report.mismatch_count(), 1);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].input, "aabbca");
        assert!(!mismatches[0].actual);
        assert!(report.to_string().contains("3 patterns, 1 failed to compile, 1 mismatches"));
    }

    #[test]
    fn diagnostics_show_every_stage() {
        let case = Case {
            name: "concat".into(),
            regex: "ab".into(),
            test_strings: Vec::new(),
        };
        let dump = diagnostics(&case).unwrap();

        assert!(dump.starts_with("concat: ab\nWith concat_op: a.b\nPostFix form: ab.\n"));
        assert!(dump.contains("NFA:\nstart: q0, accept: q3"));
        assert!(dump.contains("DFA:\nstart: q0, accepting: {q2}"));
    }

    #[test]
    fn diagnostics_fail_on_bad_pattern() {
        let case = Case {
            name: "bad".into(),
            regex: "a)".into(),
            test_strings: Vec::new(),
        };
        assert_eq!(diagnostics(&case), Err(SyntaxError::UnmatchedCloseParen { position: 1 }));
    }
}
