use std::fmt::{Display, Formatter};
use crate::interpreter::ast::Expr;
use crate::interpreter::environment::Environment;
use crate::interpreter::lexer::Token;
use crate::interpreter::value::{Value, ValueKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    UndefinedVariable(String),
    TypeMismatch {
        name: String,
        expected: ValueKind,
        actual: ValueKind,
    },
}

impl Display for EvalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::UndefinedVariable(name) => write!(f, "Variable '{}' not found", name),
            EvalError::TypeMismatch { name, expected: ValueKind::Boolean, .. } =>
                write!(f, "Variable '{}' must be boolean", name),
            EvalError::TypeMismatch { name, expected, actual } =>
                write!(f, "Variable '{}' must be {}, found {}", name, expected, actual),
        }
    }
}

impl std::error::Error for EvalError {}

type EvalResult<T> = Result<T, EvalError>;

pub struct Evaluator<'env> {
    environment: &'env Environment,
}

impl<'env> Evaluator<'env> {
    pub fn new(environment: &'env Environment) -> Evaluator<'env> {
        Evaluator { environment }
    }

    pub fn evaluate(&self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Variable(name) => self.lookup(name).cloned(),
            Expr::Conditional { condition, then, otherwise, .. } => {
                if self.condition(condition)? {
                    self.evaluate(then)
                } else if let Some(otherwise) = otherwise {
                    self.evaluate(otherwise)
                } else {
                    Ok(Value::Absent)
                }
            },
        }
    }

    fn lookup(&self, name: &Token) -> EvalResult<&'env Value> {
        self.environment.get(name.source())
            .ok_or_else(|| EvalError::UndefinedVariable(name.source().to_owned()))
    }

    // Only place where a variable's kind is checked
    fn condition(&self, name: &Token) -> EvalResult<bool> {
        match self.lookup(name)? {
            Value::Boolean(value) => Ok(*value),
            other => Err(EvalError::TypeMismatch {
                name: name.source().to_owned(),
                expected: ValueKind::Boolean,
                actual: other.kind(),
            }),
        }
    }
}

/// Evaluates `expr` against `environment` without modifying it.
pub fn evaluate(expr: &Expr, environment: &Environment) -> EvalResult<Value> {
    Evaluator::new(environment).evaluate(expr)
}
