//! Prints a word cross-reference table for a text file.
//!
//! ```text
//! cross_refs <input> [--output <report>] [--enumerate <numbered-output>] [-v|-q]
//! ```
//!
//! The log level defaults to `warn`. Each `-v` raises it one step and `-q`
//! silences it; without either flag `CROSS_REFS_LOG` (e.g. `debug`) is used.

use std::env;
use std::fmt;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use cross_refs::{AnalysisError, TextAnalyzer};
use log::{error, info};
use simplelog::{ColorChoice, Config as LogConfig, LevelFilter, TermLogger, TerminalMode};

const LOG_ENV: &str = "CROSS_REFS_LOG";
const USAGE: &str =
    "usage: cross_refs <input> [--output <report>] [--enumerate <numbered-output>] [-v|-q]";

#[derive(Debug, PartialEq, Eq)]
struct Config {
    input: PathBuf,
    output: Option<PathBuf>,
    enumerate: Option<PathBuf>,
    log_level: LevelFilter,
}

#[derive(Debug, PartialEq, Eq)]
enum UsageError {
    MissingInput,
    MissingValue(&'static str),
    Unexpected(String),
    Help,
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInput => f.write_str("no input file given"),
            Self::MissingValue(flag) => write!(f, "{flag} needs a file name"),
            Self::Unexpected(arg) => write!(f, "unexpected argument `{arg}`"),
            Self::Help => f.write_str(USAGE),
        }
    }
}

impl Config {
    /// Parses the arguments after the program name. `env_level` is the raw
    /// value of `CROSS_REFS_LOG`, if set.
    fn parse<I>(args: I, env_level: Option<&str>) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut input = None;
        let mut output = None;
        let mut enumerate = None;
        let mut verbosity: Option<i8> = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Err(UsageError::Help),
                "-o" | "--output" => {
                    let value = args.next().ok_or(UsageError::MissingValue("--output"))?;
                    output = Some(PathBuf::from(value));
                }
                "-e" | "--enumerate" => {
                    let value = args.next().ok_or(UsageError::MissingValue("--enumerate"))?;
                    enumerate = Some(PathBuf::from(value));
                }
                "-q" | "--quiet" => verbosity = Some(-1),
                flag if flag.starts_with("-v") && flag[1..].bytes().all(|b| b == b'v') => {
                    let steps = i8::try_from(flag.len() - 1).unwrap_or(i8::MAX);
                    verbosity = Some(verbosity.unwrap_or(0).max(0).saturating_add(steps));
                }
                _ if arg.starts_with('-') || input.is_some() => {
                    return Err(UsageError::Unexpected(arg));
                }
                _ => input = Some(PathBuf::from(arg)),
            }
        }

        let log_level = match verbosity {
            Some(-1) => LevelFilter::Off,
            Some(0) | None => env_level
                .and_then(|level| level.parse().ok())
                .unwrap_or(LevelFilter::Warn),
            Some(1) => LevelFilter::Info,
            Some(2) => LevelFilter::Debug,
            Some(_) => LevelFilter::Trace,
        };

        Ok(Self {
            input: input.ok_or(UsageError::MissingInput)?,
            output,
            enumerate,
            log_level,
        })
    }
}

fn run(config: &Config) -> Result<(), AnalysisError> {
    let mut analyzer = TextAnalyzer::new();
    analyzer.analyze_file(&config.input)?;
    info!(
        "{} distinct words in {}",
        analyzer.dictionary().len(),
        config.input.display()
    );

    match &config.output {
        Some(path) => analyzer.print_analysis_file(path)?,
        None => analyzer.print_analysis(BufWriter::new(io::stdout().lock()))?,
    }

    if let Some(path) = &config.enumerate {
        TextAnalyzer::enumerate_lines_file(&config.input, path)?;
        info!("numbered lines written to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let env_level = env::var(LOG_ENV).ok();
    let config = match Config::parse(env::args().skip(1), env_level.as_deref()) {
        Ok(config) => config,
        Err(UsageError::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("cross_refs: {err}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    // Fails only when a logger is already installed.
    let _ = TermLogger::init(
        config.log_level,
        LogConfig::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("cross_refs: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str], env_level: Option<&str>) -> Result<Config, UsageError> {
        Config::parse(args.iter().map(|arg| (*arg).to_owned()), env_level)
    }

    #[test]
    fn input_alone_uses_defaults() {
        let config = parse(&["notes.txt"], None).unwrap();
        assert_eq!(
            config,
            Config {
                input: PathBuf::from("notes.txt"),
                output: None,
                enumerate: None,
                log_level: LevelFilter::Warn,
            }
        );
    }

    #[test]
    fn flags_in_any_order() {
        let config = parse(&["-e", "num.txt", "in.txt", "--output", "out.txt", "-vv"], None).unwrap();
        assert_eq!(config.input, PathBuf::from("in.txt"));
        assert_eq!(config.output, Some(PathBuf::from("out.txt")));
        assert_eq!(config.enumerate, Some(PathBuf::from("num.txt")));
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn flags_beat_the_environment() {
        assert_eq!(parse(&["a"], Some("trace")).unwrap().log_level, LevelFilter::Trace);
        assert_eq!(parse(&["a"], Some("bogus")).unwrap().log_level, LevelFilter::Warn);
        assert_eq!(parse(&["a", "-q"], Some("trace")).unwrap().log_level, LevelFilter::Off);
        assert_eq!(parse(&["a", "-v"], Some("trace")).unwrap().log_level, LevelFilter::Info);
    }

    #[test]
    fn bad_command_lines() {
        assert_eq!(parse(&[], None), Err(UsageError::MissingInput));
        assert_eq!(parse(&["a", "--output"], None), Err(UsageError::MissingValue("--output")));
        assert_eq!(parse(&["a", "b"], None), Err(UsageError::Unexpected("b".to_owned())));
        assert_eq!(parse(&["--nope"], None), Err(UsageError::Unexpected("--nope".to_owned())));
        assert_eq!(parse(&["--help"], None), Err(UsageError::Help));
    }
}
