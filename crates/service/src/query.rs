//! Filter-expression evaluation for the ticketing mock's list endpoint.
//!
//! The grammar is a sequence of conditions joined by `^`; every condition
//! must hold. There is no OR, no grouping, no precedence.

use serde_json::Value;

/// One condition of a `^`-joined filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `ISEMPTY<field>`: the field, coerced to text, is empty or absent
    /// after trimming whitespace.
    IsEmpty(String),
    /// `<field>=<value>`: the field, coerced to text, equals the value
    /// exactly.
    Equals(String, String),
    /// A condition matching neither pattern. It cannot be validated as
    /// satisfied, so it excludes every record.
    Unrecognized(String),
}

pub fn parse_query(expr: &str) -> Vec<Condition> {
    expr.split('^')
        .map(|cond| {
            if cond.contains("ISEMPTY") {
                Condition::IsEmpty(cond.replace("ISEMPTY", ""))
            } else if let Some((field, value)) = cond.split_once('=') {
                Condition::Equals(field.to_string(), value.to_string())
            } else {
                Condition::Unrecognized(cond.to_string())
            }
        })
        .collect()
}

/// Evaluate all conditions against one record (logical AND).
pub fn record_matches(record: &Value, conditions: &[Condition]) -> bool {
    conditions.iter().all(|cond| match cond {
        Condition::IsEmpty(field) => match record.get(field) {
            Some(v) => value_text(v).trim().is_empty(),
            None => true,
        },
        Condition::Equals(field, value) => match record.get(field) {
            Some(v) => value_text(v) == *value,
            None => false,
        },
        Condition::Unrecognized(_) => false,
    })
}

/// Text form of a field value: strings verbatim, everything else via its
/// JSON rendering.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
