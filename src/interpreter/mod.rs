pub mod ast;
pub mod lexer;
pub mod parser;
pub mod value;
pub mod environment;
pub mod evaluator;
pub mod renderer;

use std::fmt::{Display, Formatter};
use crate::interpreter::ast::Expr;
use crate::interpreter::environment::Environment;
use crate::interpreter::evaluator::EvalError;
use crate::interpreter::lexer::{LexerError, TokenPos};
use crate::interpreter::parser::ParseError;
use crate::interpreter::value::Value;

/// Failure of one pipeline stage. Only the first error of an invocation is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TauschError {
    Lexer(LexerError),
    Parser(ParseError),
    Eval(EvalError),
}

impl TauschError {
    /// Evaluation errors have no position; they refer to variables, not to source text.
    pub fn get_pos(&self) -> Option<TokenPos> {
        match self {
            TauschError::Lexer(err) => Some(err.get_pos()),
            TauschError::Parser(err) => Some(err.get_pos()),
            TauschError::Eval(_) => None,
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            TauschError::Lexer(_) => "Tokenizing",
            TauschError::Parser(_) => "Parsing",
            TauschError::Eval(_) => "Evaluation",
        }
    }
}

impl Display for TauschError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TauschError::Lexer(err) => write!(f, "{}", err),
            TauschError::Parser(err) => write!(f, "{}", err),
            TauschError::Eval(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for TauschError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TauschError::Lexer(err) => Some(err),
            TauschError::Parser(err) => Some(err),
            TauschError::Eval(err) => Some(err),
        }
    }
}

impl From<LexerError> for TauschError {
    fn from(err: LexerError) -> Self {
        TauschError::Lexer(err)
    }
}

impl From<ParseError> for TauschError {
    fn from(err: ParseError) -> Self {
        TauschError::Parser(err)
    }
}

impl From<EvalError> for TauschError {
    fn from(err: EvalError) -> Self {
        TauschError::Eval(err)
    }
}

/// Lexes and parses `source` into a single expression.
pub fn compile(source: &str) -> Result<Expr, TauschError> {
    let tokens = lexer::tokenize(source)?;
    Ok(parser::parse(tokens)?)
}

pub fn eval(source: &str, environment: &Environment) -> Result<Value, TauschError> {
    let expr = compile(source)?;
    Ok(evaluator::evaluate(&expr, environment)?)
}

/// Runs the whole pipeline and renders the result.
pub fn substitute(source: &str, environment: &Environment) -> Result<String, TauschError> {
    eval(source, environment).map(|value| renderer::render(&value))
}
