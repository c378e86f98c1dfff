use std::path::Path;
use subset_regex::suite::{Outcome, Suite};

#[test]
fn demo_suite_passes() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/suite.json");
    let report = Suite::from_path(&path).unwrap().run();

    assert_eq!(report.cases.len(), 7);
    assert_eq!(report.mismatch_count(), 0);
    assert!(report.is_success(), "{report}");
    assert!(report
        .cases
        .iter()
        .all(|c| matches!(c.outcome, Outcome::Compiled(_))));
}
