/// Tracery — expand a grammar from a rule set.
///
/// Usage: tracery [--rules <file.json|file.ron>] [--origin <expr>] [--seed <n>] [--count <n>]
///
/// Without `--rules`, a JSON rule set is read from stdin when it is piped.
use std::io::{self, IsTerminal, Read};
use std::path::Path;
use std::process::ExitCode;

use tracery::{Grammar, RuleSet, RuleSetError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str =
    "Usage: tracery [--rules <file.json|file.ron>] [--origin <expr>] [--seed <n>] [--count <n>]";

struct Options {
    rules_path: Option<String>,
    origin: String,
    seed: Option<u64>,
    count: usize,
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays clean (respects RUST_LOG)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    let rules = match read_rule_set(options.rules_path.as_deref()) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("Error: failed to load rule set: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut builder = Grammar::builder().with_default_modifiers();
    if let Some(seed) = options.seed {
        builder = builder.seed(seed);
    }
    if let Some(rules) = rules {
        builder = builder.rule_set(rules);
    }
    let mut grammar = builder.build();

    for _ in 0..options.count {
        println!("{}", grammar.flatten(&options.origin));
    }
    ExitCode::SUCCESS
}

/// Returns `Ok(None)` when help was requested.
fn parse_args(args: &[String]) -> Result<Option<Options>, String> {
    let mut options = Options {
        rules_path: None,
        origin: "#origin#".to_string(),
        seed: None,
        count: 1,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => return Ok(None),
            "--rules" if i + 1 < args.len() => {
                i += 1;
                options.rules_path = Some(args[i].clone());
            }
            "--origin" if i + 1 < args.len() => {
                i += 1;
                options.origin = args[i].clone();
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                let seed = args[i]
                    .parse()
                    .map_err(|_| format!("--seed must be an integer, got '{}'", args[i]))?;
                options.seed = Some(seed);
            }
            "--count" if i + 1 < args.len() => {
                i += 1;
                options.count = args[i]
                    .parse()
                    .map_err(|_| format!("--count must be an integer, got '{}'", args[i]))?;
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
        i += 1;
    }

    Ok(Some(options))
}

fn read_rule_set(path: Option<&str>) -> Result<Option<RuleSet>, RuleSetError> {
    if let Some(path) = path {
        return RuleSet::load(Path::new(path)).map(Some);
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    let mut input = String::new();
    stdin.lock().read_to_string(&mut input)?;
    if input.trim().is_empty() {
        return Ok(None);
    }
    RuleSet::from_json(&input).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        std::iter::once("tracery")
            .chain(items.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn defaults() {
        let options = parse_args(&args(&[])).unwrap().unwrap();
        assert_eq!(options.origin, "#origin#");
        assert_eq!(options.count, 1);
        assert!(options.seed.is_none());
        assert!(options.rules_path.is_none());
    }

    #[test]
    fn all_flags() {
        let options = parse_args(&args(&[
            "--rules", "r.json", "--origin", "#story#", "--seed", "42", "--count", "3",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(options.rules_path.as_deref(), Some("r.json"));
        assert_eq!(options.origin, "#story#");
        assert_eq!(options.seed, Some(42));
        assert_eq!(options.count, 3);
    }

    #[test]
    fn help_and_errors() {
        assert!(parse_args(&args(&["--help"])).unwrap().is_none());
        assert!(parse_args(&args(&["--seed", "abc"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["--rules"])).is_err());
    }
}
