pub mod util;
pub mod interpreter;
pub mod repl;

use std::fmt::{Display, Formatter};
use std::io::{Read, Write};
use std::path::PathBuf;
use clap::Parser as ClapParser;
use crate::interpreter::environment::Environment;
use crate::interpreter::{evaluator, renderer, TauschError};

#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(help = "Expression to evaluate; read from standard input if neither this nor --file is given")]
    pub expression: Option<String>,
    #[clap(short, long, conflicts_with = "expression", help = "Read the expression from a file")]
    pub file: Option<PathBuf>,

    #[clap(long = "vars", value_name = "JSON_FILE", help = "JSON object of variables (booleans, numbers and strings)")]
    pub variables: Option<PathBuf>,
    #[clap(short = 'D', long = "define", value_name = "NAME=VALUE", help = "Define a variable; overrides --vars and --env")]
    pub defines: Vec<String>,
    #[clap(long = "env", help = "Make the process environment available as string variables")]
    pub process_env: bool,

    #[clap(short, long, help = "Read expressions interactively, one per line")]
    pub interactive: bool,
    #[clap(long, help = "Print the parsed expression tree to standard error")]
    pub print_tree: bool,
    #[clap(long, help = "Print the parsed expression as a Graphviz DOT graph to standard error")]
    pub print_dot: bool,
    #[clap(short = 'n', long, help = "Do not print a trailing newline after the result")]
    pub no_newline: bool,

    #[clap(short, long, help = "Print verbose log output")]
    pub verbose: bool,
}

impl Config {
    /// The interactive prompt shows the tree in verbose mode as well.
    pub fn shows_tree(&self) -> bool {
        self.print_tree || (self.interactive && self.verbose)
    }
}

/// Payload of the error `run` returns after a diagnostic was already printed.
#[derive(Debug)]
pub struct AlreadyReported;

impl Display for AlreadyReported {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error already reported")
    }
}

impl std::error::Error for AlreadyReported {}

/// Message to print for an error returned by [`run`], or `None` if it was already printed.
pub fn error_message(err: &std::io::Error) -> Option<String> {
    if err.get_ref().is_some_and(|inner| inner.is::<AlreadyReported>()) {
        None
    } else {
        Some(format!("Error: {}", err))
    }
}

pub fn run(config: Config) -> Result<(), std::io::Error> {
    let environment = load_environment(&config)?;

    if config.verbose {
        eprintln!("[verbose] {} variables available", environment.len());
    }

    if config.interactive {
        return repl::run(&config, &environment);
    }

    let (name, source) = read_source(&config)?;

    let output = match process(&config, &source, &environment) {
        Ok(output) => output,
        Err(err) => {
            report_error(&name, &source, &err);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, AlreadyReported));
        },
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;

    if !config.no_newline {
        stdout.write_all(b"\n")?;
    }

    stdout.flush()
}

/// Sources are applied lowest precedence first: process environment, `--vars`, `--define`.
pub fn load_environment(config: &Config) -> Result<Environment, std::io::Error> {
    let mut environment = Environment::new();

    if config.process_env {
        environment.extend_from_strings(std::env::vars());
    }

    if let Some(path) = &config.variables {
        if config.verbose {
            eprintln!("[verbose] Reading variables from {}", path.to_string_lossy());
        }

        let source = std::fs::read_to_string(path)
            .map_err(|err| std::io::Error::new(err.kind(), format!("Could not read {}: {}", path.to_string_lossy(), err)))?;
        environment.extend_from_json(&source)?;
    }

    for definition in &config.defines {
        environment.define(definition)?;
    }

    Ok(environment)
}

pub fn read_source(config: &Config) -> Result<(String, String), std::io::Error> {
    if let Some(expression) = &config.expression {
        Ok((String::from("<argument>"), expression.clone()))
    } else if let Some(path) = &config.file {
        let source = std::fs::read_to_string(path)
            .map_err(|err| std::io::Error::new(err.kind(), format!("Could not read {}: {}", path.to_string_lossy(), err)))?;
        Ok((path.to_string_lossy().into_owned(), source))
    } else {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)
            .map_err(|err| std::io::Error::new(err.kind(), format!("Could not read standard input: {}", err)))?;
        Ok((String::from("<stdin>"), source))
    }
}

/// Compiles, evaluates and renders one expression, printing the tree and graph if configured.
pub fn process(config: &Config, source: &str, environment: &Environment) -> Result<String, TauschError> {
    let expr = interpreter::compile(source)?;
    crate::println_debug!("Parsed {:?}", expr);

    if config.shows_tree() {
        eprint!("{}", expr.to_tree_string());
    }

    if config.print_dot {
        eprint!("{}", expr.to_dot());
    }

    let value = evaluator::evaluate(&expr, environment)?;

    if config.verbose {
        eprintln!("[verbose] Result is a {}", value.kind());
    }

    Ok(renderer::render(&value))
}

pub fn report_error(name: &str, source: &str, err: &TauschError) {
    match err.get_pos() {
        Some(pos) => eprint!("[{}:{}:{}] ", name, pos.line, pos.column),
        None => eprint!("[{}] ", name),
    }

    eprintln!("{} failed: {}", err.stage(), err);

    if let TauschError::Parser(err) = err {
        if let Some(suggestion) = err.suggestion(source) {
            eprintln!("    Suggestion: {}", suggestion.trim_end());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("tausch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    pub fn test_defines_reach_the_expression() {
        let config = config(&["-D", "cond=true", "-D", "a=42", "--define", "b=text", "if cond; a : b"]);
        let environment = load_environment(&config).unwrap();

        assert_eq!(config.expression.as_deref(), Some("if cond; a : b"));
        assert_eq!(process(&config, config.expression.as_deref().unwrap(), &environment), Ok(String::from("42")));
    }

    #[test]
    pub fn test_malformed_define() {
        let err = load_environment(&config(&["-D", "novalue"])).unwrap_err();

        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
        assert_eq!(err.to_string(), "Expected NAME=VALUE, got 'novalue'");
    }

    #[test]
    pub fn test_invalid_utf8_file_has_a_message() {
        let path = std::env::temp_dir().join(format!("tausch-invalid-utf8-{}.txt", std::process::id()));
        std::fs::write(&path, b"\xff\xfe").unwrap();

        let result = read_source(&config(&["--file", path.to_str().unwrap()]));
        std::fs::remove_file(&path).unwrap();

        let err = result.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);

        let message = error_message(&err).expect("read failures must be printed");
        assert!(message.starts_with("Error: Could not read "), "{}", message);
    }

    #[test]
    pub fn test_language_errors_are_not_printed_twice() {
        let err = std::io::Error::new(std::io::ErrorKind::InvalidData, AlreadyReported);

        assert_eq!(error_message(&err), None);
        assert!(error_message(&std::io::Error::from(std::io::ErrorKind::InvalidData)).is_some());
        assert!(error_message(&std::io::Error::new(std::io::ErrorKind::InvalidData, "bad")).is_some());
    }

    #[test]
    pub fn test_tree_in_verbose_prompt() {
        assert!(config(&["-i", "-v"]).shows_tree());
        assert!(config(&["--print-tree", "a"]).shows_tree());
        assert!(!config(&["-v", "a"]).shows_tree());
        assert!(!config(&["-i"]).shows_tree());
    }

    #[test]
    pub fn test_print_dot_flag() {
        let config = config(&["--print-dot", "-D", "a=1", "a"]);

        assert!(config.print_dot);
        assert_eq!(process(&config, "a", &load_environment(&config).unwrap()), Ok(String::from("1")));
    }

    #[test]
    pub fn test_expression_conflicts_with_file() {
        assert!(Config::try_parse_from(["tausch", "--file", "input.tausch", "a"]).is_err());
    }
}
