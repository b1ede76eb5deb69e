use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use crate::interpreter::value::{Number, Value};
use crate::util;

#[derive(Debug)]
pub enum EnvironmentError {
    Json(serde_json::Error),
    NotAnObject,
    UnsupportedValue {
        name: String,
        kind: &'static str,
    },
    MalformedDefinition(String),
    InvalidName(String),
}

impl Display for EnvironmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvironmentError::Json(err) => write!(f, "Invalid JSON: {}", err),
            EnvironmentError::NotAnObject => write!(f, "Variables must be given as a JSON object"),
            EnvironmentError::UnsupportedValue { name, kind } =>
                write!(f, "Variable '{}' is {}; only booleans, numbers and strings are supported", name, kind),
            EnvironmentError::MalformedDefinition(definition) =>
                write!(f, "Expected NAME=VALUE, got '{}'", definition),
            EnvironmentError::InvalidName(name) => write!(f, "'{}' is not a valid variable name", name),
        }
    }
}

impl std::error::Error for EnvironmentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnvironmentError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for EnvironmentError {
    fn from(err: serde_json::Error) -> Self {
        EnvironmentError::Json(err)
    }
}

impl From<EnvironmentError> for std::io::Error {
    fn from(err: EnvironmentError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, err)
    }
}

type EnvironmentResult<T> = Result<T, EnvironmentError>;

/// Variables visible to an expression. Names are case-sensitive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Environment {
    variables: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            variables: HashMap::new(),
        }
    }

    /// Parses a JSON object whose members are booleans, numbers or strings.
    pub fn from_json(source: &str) -> EnvironmentResult<Self> {
        let mut environment = Environment::new();
        environment.extend_from_json(source)?;
        Ok(environment)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Variables sorted by name.
    pub fn sorted(&self) -> Vec<(&str, &Value)> {
        let mut variables: Vec<_> = self.variables.iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        variables.sort_by(|(a, _), (b, _)| a.cmp(b));
        variables
    }

    /// Overrides existing variables with the members of a JSON object.
    pub fn extend_from_json(&mut self, source: &str) -> EnvironmentResult<()> {
        let serde_json::Value::Object(members) = serde_json::from_str::<serde_json::Value>(source)? else {
            return Err(EnvironmentError::NotAnObject);
        };

        for (name, value) in members {
            let value = Self::convert_json(&name, value)?;
            self.variables.insert(name, value);
        }

        Ok(())
    }

    /// Adds a `NAME=VALUE` definition. `VALUE` is read as a JSON scalar when it is one,
    /// otherwise it is taken verbatim as a string.
    pub fn define(&mut self, definition: &str) -> EnvironmentResult<()> {
        let Some((name, raw)) = definition.split_once('=') else {
            return Err(EnvironmentError::MalformedDefinition(definition.to_owned()));
        };

        if !util::is_identifier(name) {
            return Err(EnvironmentError::InvalidName(name.to_owned()));
        }

        let value = match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(json @ (serde_json::Value::Bool(_) | serde_json::Value::Number(_) | serde_json::Value::String(_))) =>
                Self::convert_json(name, json)?,
            _ => Value::String(raw.to_owned()),
        };

        self.variables.insert(name.to_owned(), value);
        Ok(())
    }

    /// Adds string variables, skipping names that could never be referenced.
    pub fn extend_from_strings(&mut self, variables: impl IntoIterator<Item = (String, String)>) {
        for (name, value) in variables {
            if util::is_identifier(&name) {
                self.variables.insert(name, Value::String(value));
            }
        }
    }

    fn convert_json(name: &str, value: serde_json::Value) -> EnvironmentResult<Value> {
        let unsupported = |kind: &'static str| EnvironmentError::UnsupportedValue { name: name.to_owned(), kind };

        match value {
            serde_json::Value::Bool(value) => Ok(Value::Boolean(value)),
            serde_json::Value::Number(number) => number.as_i64().map(i128::from)
                .or_else(|| number.as_u64().map(i128::from))
                .map(Number::Integer)
                .or_else(|| number.as_f64().map(Number::Float))
                .map(Value::Number)
                .ok_or_else(|| unsupported("an unrepresentable number")),
            serde_json::Value::String(value) => Ok(Value::String(value)),
            serde_json::Value::Null => Err(unsupported("null")),
            serde_json::Value::Array(_) => Err(unsupported("an array")),
            serde_json::Value::Object(_) => Err(unsupported("an object")),
        }
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Environment {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        Environment {
            variables: iter.into_iter().map(|(name, value)| (name.into(), value.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn test_from_json() {
        let environment = Environment::from_json(r#"{"hello": 42, "world": "69", "cond": true, "pi": 3.5}"#).unwrap();

        assert_eq!(environment.len(), 4);
        assert_eq!(environment.get("hello"), Some(&Value::from(42)));
        assert_eq!(environment.get("world"), Some(&Value::from("69")));
        assert_eq!(environment.get("cond"), Some(&Value::Boolean(true)));
        assert_eq!(environment.get("pi"), Some(&Value::from(3.5)));
        assert_eq!(environment.get("Hello"), None);
    }

    #[test]
    pub fn test_from_json_keeps_large_integers() {
        let environment = Environment::from_json(r#"{"id": 9007199254740993, "big": 18446744073709551615, "neg": -9007199254740993, "f": 1.5e300}"#).unwrap();

        assert_eq!(environment.get("id"), Some(&Value::from(9_007_199_254_740_993_i64)));
        assert_eq!(environment.get("big"), Some(&Value::from(u64::MAX)));
        assert_eq!(environment.get("neg"), Some(&Value::from(-9_007_199_254_740_993_i64)));
        assert_eq!(environment.get("f"), Some(&Value::from(1.5e300)));
    }

    #[test]
    pub fn test_from_json_rejects_nested_values() {
        for source in [r#"{"a": null}"#, r#"{"a": [1]}"#, r#"{"a": {"b": 1}}"#] {
            assert!(matches!(Environment::from_json(source),
                Err(EnvironmentError::UnsupportedValue { ref name, .. }) if name == "a"));
        }
    }

    #[test]
    pub fn test_from_json_requires_object() {
        assert!(matches!(Environment::from_json("[1, 2]"), Err(EnvironmentError::NotAnObject)));
        assert!(matches!(Environment::from_json("{"), Err(EnvironmentError::Json(_))));
    }

    #[test]
    pub fn test_define() {
        let mut environment = Environment::new();
        environment.define("flag=true").unwrap();
        environment.define("count=12").unwrap();
        environment.define("quoted=\"true\"").unwrap();
        environment.define("text=hello world").unwrap();
        environment.define("eq=a=b").unwrap();
        environment.define("empty=").unwrap();

        assert_eq!(environment.get("flag"), Some(&Value::Boolean(true)));
        assert_eq!(environment.get("count"), Some(&Value::from(12)));
        assert_eq!(environment.get("quoted"), Some(&Value::from("true")));
        assert_eq!(environment.get("text"), Some(&Value::from("hello world")));
        assert_eq!(environment.get("eq"), Some(&Value::from("a=b")));
        assert_eq!(environment.get("empty"), Some(&Value::from("")));
    }

    #[test]
    pub fn test_define_errors() {
        let mut environment = Environment::new();

        assert!(matches!(environment.define("novalue"), Err(EnvironmentError::MalformedDefinition(_))));
        assert!(matches!(environment.define("9lives=1"), Err(EnvironmentError::InvalidName(_))));
        assert!(matches!(environment.define("=1"), Err(EnvironmentError::InvalidName(_))));
        assert!(environment.is_empty());
    }

    #[test]
    pub fn test_later_sources_override() {
        let mut environment = Environment::new();
        environment.extend_from_strings([(String::from("a"), String::from("env")), (String::from("bad-name"), String::from("x"))]);
        environment.extend_from_json(r#"{"a": 1, "b": 2}"#).unwrap();
        environment.define("b=false").unwrap();

        assert_eq!(environment.sorted(), vec![("a", &Value::from(1)), ("b", &Value::Boolean(false))]);
    }
}
