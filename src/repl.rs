//! Interactive prompt: one expression per line against a fixed environment

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use crate::interpreter::environment::Environment;
use crate::interpreter::renderer;
use crate::util;
use crate::{process, report_error, Config};

const PROMPT: &str = "> ";
const EXIT_COMMAND: &str = "exit";

/// Completes variable names from the environment the prompt was started with.
pub struct TauschHelper {
    names: Vec<String>,
}

impl TauschHelper {
    pub fn new(environment: &Environment) -> TauschHelper {
        TauschHelper {
            names: environment.sorted().into_iter().map(|(name, _)| name.to_owned()).collect(),
        }
    }

    /// Start of the word ending at `pos` and the names it may complete to.
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<&str>) {
        let head = &line[..pos];
        let start = head.char_indices().rev()
            .find(|(_, c)| !util::is_identifier_part(*c))
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let prefix = &head[start..];

        let names = self.names.iter()
            .map(String::as_str)
            .filter(|name| name.starts_with(prefix))
            .collect();

        (start, names)
    }
}

impl Completer for TauschHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, names) = self.candidates(line, pos);

        Ok((start, names.into_iter()
            .map(|name| Pair { display: name.to_owned(), replacement: name.to_owned() })
            .collect()))
    }
}

impl Hinter for TauschHelper {
    type Hint = String;
}

impl Highlighter for TauschHelper {}

impl Validator for TauschHelper {}

impl Helper for TauschHelper {}

pub fn run(config: &Config, environment: &Environment) -> Result<(), std::io::Error> {
    let mut editor: Editor<TauschHelper, DefaultHistory> = Editor::new().map_err(readline_error)?;
    editor.set_helper(Some(TauschHelper::new(environment)));

    println!("{}", describe_environment(environment));

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(readline_error(err)),
        };

        let input = line.trim();

        if input.is_empty() {
            continue;
        } else if input.eq_ignore_ascii_case(EXIT_COMMAND) {
            break;
        }

        if let Err(err) = editor.add_history_entry(input) {
            if config.verbose {
                eprintln!("[verbose] Could not add history entry: {}", err);
            }
        }

        match process(config, input, environment) {
            Ok(output) => println!("Result: {}", output),
            Err(err) => report_error("<input>", input, &err),
        }
    }

    Ok(())
}

/// Lists the variables an expression may reference, sorted by name.
pub fn describe_environment(environment: &Environment) -> String {
    if environment.is_empty() {
        return String::from("No variables available");
    }

    let mut output = String::from("Available variables:");

    for (name, value) in environment.sorted() {
        output.push_str(&format!("\n  {} = {} ({})", name, renderer::render(value), value.kind()));
    }

    output
}

fn readline_error(err: ReadlineError) -> std::io::Error {
    match err {
        ReadlineError::Io(err) => err,
        err => std::io::Error::new(std::io::ErrorKind::Other, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper() -> TauschHelper {
        TauschHelper::new(&Environment::from_iter([("hello", "42"), ("help", "x"), ("world", "69"), ("cond", "true")]))
    }

    #[test]
    pub fn test_describe_environment() {
        let environment = Environment::from_iter([("world", "69"), ("cond", "x")]);

        assert_eq!(describe_environment(&environment), "Available variables:\n  cond = x (string)\n  world = 69 (string)");
        assert_eq!(describe_environment(&Environment::new()), "No variables available");
    }

    #[test]
    pub fn test_complete_first_word() {
        assert_eq!(helper().candidates("hel", 3), (0, vec!["hello", "help"]));
        assert_eq!(helper().candidates("w", 1), (0, vec!["world"]));
    }

    #[test]
    pub fn test_complete_after_punctuation() {
        assert_eq!(helper().candidates("if cond;hel", 11), (8, vec!["hello", "help"]));
        assert_eq!(helper().candidates("if co", 5), (3, vec!["cond"]));
        assert_eq!(helper().candidates("if cond; hello : ", 17), (17, vec!["cond", "hello", "help", "world"]));
    }

    #[test]
    pub fn test_complete_in_middle_of_line() {
        assert_eq!(helper().candidates("wo : x", 2), (0, vec!["world"]));
    }

    #[test]
    pub fn test_no_completion() {
        assert_eq!(helper().candidates("zzz", 3), (0, Vec::<&str>::new()));
    }
}
