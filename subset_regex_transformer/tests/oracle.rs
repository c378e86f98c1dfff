use itertools::Itertools;
use quickcheck::{Arbitrary, Gen, QuickCheck};
use regex::Regex;
use subset_regex_transformer::compile;

fn oracle(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{pattern})$")).unwrap()
}

/// Patterns in the shared subset of both syntaxes. Quantifiers are always
/// applied to a group so they never stack.
#[derive(Clone, Debug)]
struct Pattern(String);

fn expr(g: &mut Gen, depth: u32) -> String {
    let choice = if depth == 0 { 0 } else { u8::arbitrary(g) % 6 };
    match choice {
        0 => g.choose(&['a', 'b', 'c']).unwrap().to_string(),
        1 => format!("{}{}", expr(g, depth - 1), expr(g, depth - 1)),
        2 => format!("{}|{}", expr(g, depth - 1), expr(g, depth - 1)),
        3 => format!("({})*", expr(g, depth - 1)),
        4 => format!("({})+", expr(g, depth - 1)),
        _ => format!("({})?", expr(g, depth - 1)),
    }
}

impl Arbitrary for Pattern {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = u32::arbitrary(g) % 5;
        Pattern(expr(g, depth))
    }
}

#[derive(Clone, Debug)]
struct Word(String);

impl Arbitrary for Word {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 8;
        Word((0..len).map(|_| *g.choose(&['a', 'b', 'c', 'd']).unwrap()).collect())
    }
}

fn agrees_with_regex(pattern: Pattern, words: Vec<Word>) -> bool {
    let dfa = compile(&pattern.0).unwrap();
    let re = oracle(&pattern.0);
    words.iter().all(|w| dfa.matches(&w.0) == re.is_match(&w.0))
}

#[test]
fn random_patterns_agree_with_regex() {
    QuickCheck::new()
        .tests(500)
        .quickcheck(agrees_with_regex as fn(Pattern, Vec<Word>) -> bool);
}

#[test]
fn exhaustive_short_inputs() {
    let _ = env_logger::builder().is_test(true).try_init();

    let patterns = ["(a|b)*abb", "a(b|c)*a", "(ab|ba)+", "a?b?c?", "((a|b)c)*|c+"];
    let inputs = std::iter::once(String::new())
        .chain((1..=5).flat_map(|len| {
            (0..len)
                .map(|_| ['a', 'b', 'c'])
                .multi_cartesian_product()
                .map(|w| w.into_iter().collect::<String>())
                .collect_vec()
        }))
        .collect_vec();

    for pattern in patterns {
        let dfa = compile(pattern).unwrap();
        let re = oracle(pattern);
        for input in &inputs {
            assert_eq!(dfa.matches(input), re.is_match(input), "{pattern:?} on {input:?}");
        }
    }
}
