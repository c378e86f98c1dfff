use anyhow::Result;
use clap::Parser;
use log::error;
use std::path::PathBuf;
use subset_regex::suite::{diagnostics, Suite};

#[derive(Debug, Parser)]
#[clap(name = "subset_regex", about = "Runs JSON regex test suites against the compiled automata")]
struct Options {
    /// Print the augmented, postfix, NFA and DFA forms of every case
    #[clap(long)]
    diagnostics: bool,

    #[clap(required = true, value_name = "SUITE")]
    suites: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let options = Options::parse();

    let mut all_passed = true;
    for path in &options.suites {
        let suite = Suite::from_path(path)?;

        if options.diagnostics {
            for case in &suite.cases {
                match diagnostics(case) {
                    Ok(dump) => println!("{dump}"),
                    Err(e) => error!("{}: {e}", case.name),
                }
            }
        }

        let report = suite.run();
        println!("{}", path.display());
        print!("{report}");
        all_passed &= report.is_success();
    }

    if !all_passed {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn parses_options() {
        let options =
            Options::try_parse_from(["subset_regex", "--diagnostics", "a.json", "b.json"]).unwrap();
        assert!(options.diagnostics);
        assert_eq!(options.suites, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
    }

    #[test]
    fn requires_a_suite() {
        let err = Options::try_parse_from(["subset_regex"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        let err = Options::try_parse_from(["subset_regex", "--diagnostics"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn rejects_unknown_flags() {
        let err = Options::try_parse_from(["subset_regex", "--fast", "a.json"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
