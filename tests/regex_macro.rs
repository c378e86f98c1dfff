use subset_regex::{compile, regex};

const fn grouping(s: &str) -> bool {
    regex!("(a|b)*c").test(s)
}

const fn plus(s: &str) -> bool {
    regex!("a+").test(s)
}

#[test]
fn evaluates_in_const_context() {
    const ACCEPTS: bool = grouping("abbac");
    const REJECTS: bool = grouping("abba");
    assert!(ACCEPTS);
    assert!(!REJECTS);
}

#[test]
fn literal_concatenation() {
    let r = regex!("ab");
    assert!(r.test("ab"));
    for input in ["", "a", "abc", "ba"] {
        assert!(!r.test(input), "{input:?}");
    }
}

#[test]
fn quantifiers() {
    assert!(!plus(""));
    assert!(plus("a"));
    assert!(plus("aaa"));

    let star = regex!("a*");
    assert!(star.test(""));
    assert!(star.test("aaaa"));
    assert!(!star.test("b"));

    let optional = regex!("a?b");
    assert!(optional.test("b"));
    assert!(optional.test("ab"));
    assert!(!optional.test("a"));
}

#[test]
fn non_ascii_literals() {
    let r = regex!("é+ß");
    assert!(r.test("ééß"));
    assert!(!r.test("eß"));
}

#[test]
fn agrees_with_runtime_compile() {
    let generated = regex!("(ab|ba)+c?");
    let dfa = compile("(ab|ba)+c?").unwrap();
    for input in ["ab", "abba", "bac", "abc", "a", "", "abab", "abcc", "bb"] {
        assert_eq!(generated.test(input), dfa.matches(input), "{input:?}");
    }
}

#[test]
fn agrees_with_regex_crate() {
    let generated = regex!("x(y|z)*x");
    let re = ::regex::Regex::new("^(?:x(y|z)*x)$").unwrap();
    for input in ["xx", "xyx", "xyzzyx", "x", "xyz", "yx", "xxx"] {
        assert_eq!(generated.test(input), re.is_match(input), "{input:?}");
    }
}
