use crate::interpreter::value::{Number, Value};

/// Textual form of a value. Nothing else in the crate turns values into text.
pub fn render(value: &Value) -> String {
    match value {
        Value::Boolean(value) => value.to_string(),
        Value::Number(Number::Integer(value)) => value.to_string(),
        Value::Number(Number::Float(value)) => render_float(*value),
        Value::String(value) => value.clone(),
        Value::Absent => String::new(),
    }
}

fn render_float(value: f64) -> String {
    if value == 0.0 {
        // Also catches -0.0
        String::from("0")
    } else {
        // f64's Display is already the shortest exact decimal without exponent
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn test_boolean() {
        assert_eq!(render(&Value::Boolean(true)), "true");
        assert_eq!(render(&Value::Boolean(false)), "false");
    }

    #[test]
    pub fn test_number() {
        assert_eq!(render(&Value::from(42.0)), "42");
        assert_eq!(render(&Value::from(-7.0)), "-7");
        assert_eq!(render(&Value::from(0.5)), "0.5");
        assert_eq!(render(&Value::from(2.25)), "2.25");
        assert_eq!(render(&Value::from(-0.0)), "0");
        assert_eq!(render(&Value::from(1e21)), "1000000000000000000000");
        assert_eq!(render(&Value::from(0.1 + 0.2)), "0.30000000000000004");
    }

    #[test]
    pub fn test_integer_is_exact() {
        assert_eq!(render(&Value::from(9_007_199_254_740_993_i64)), "9007199254740993");
        assert_eq!(render(&Value::from(u64::MAX)), "18446744073709551615");
        assert_eq!(render(&Value::from(i64::MIN)), "-9223372036854775808");
        assert_eq!(render(&Value::from(0)), "0");
    }

    #[test]
    pub fn test_string_is_verbatim() {
        assert_eq!(render(&Value::from("say \"hi\"\n")), "say \"hi\"\n");
        assert_eq!(render(&Value::from("")), "");
    }

    #[test]
    pub fn test_absent() {
        assert_eq!(render(&Value::Absent), "");
    }
}
