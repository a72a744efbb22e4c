/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Fragment argument values.
//!
//! These are the values bound to fragment parameters, either supplied by the
//! directive (`x=1`) or declared as defaults in a signature (`b=5`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A value bound to a fragment parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FragmentValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<FragmentValue>),
    Map(BTreeMap<String, FragmentValue>),
}

impl FragmentValue {
    /// Parse a literal as written in a signature default or an argument list.
    ///
    /// Accepted forms: `null`, `true`, `false`, integers, floats and
    /// single-quoted strings (`\'` and `\\` escapes).
    pub fn parse_literal(input: &str) -> Result<FragmentValue, String> {
        let input = input.trim();
        match input {
            "" => return Err("empty literal".to_string()),
            "null" => return Ok(FragmentValue::Null),
            "true" => return Ok(FragmentValue::Bool(true)),
            "false" => return Ok(FragmentValue::Bool(false)),
            _ => {}
        }

        if let Some(body) = input.strip_prefix('\'') {
            return parse_quoted(body).map(FragmentValue::String);
        }

        let looks_numeric = input
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '+' || c == '.');
        if looks_numeric {
            if let Ok(i) = input.parse::<i64>() {
                return Ok(FragmentValue::Integer(i));
            }
            if let Ok(f) = input.parse::<f64>() {
                return Ok(FragmentValue::Float(f));
            }
        }

        Err(format!("not a literal: {}", input))
    }
}

/// Parse the remainder of a single-quoted literal (opening quote removed).
fn parse_quoted(body: &str) -> Result<String, String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => out.push(escaped),
                None => return Err("dangling escape in string literal".to_string()),
            },
            '\'' => {
                return if chars.as_str().is_empty() {
                    Ok(out)
                } else {
                    Err(format!("unexpected text after string literal: {}", chars.as_str()))
                };
            }
            other => out.push(other),
        }
    }
    Err("unterminated string literal".to_string())
}

/// Split a comma-separated list at the top level.
///
/// Commas inside parentheses, braces, brackets or single-quoted literals do
/// not split. Returns an empty list for blank input.
pub(crate) fn split_top_level(input: &str) -> Result<Vec<&str>, String> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut in_literal = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        if in_literal {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '\'' => in_literal = false,
                _ => {}
            }
            continue;
        }
        match c {
            '\'' => in_literal = true,
            '(' | '{' | '[' => depth += 1,
            ')' | '}' | ']' => {
                depth -= 1;
                if depth < 0 {
                    return Err(format!("unbalanced '{}'", c));
                }
            }
            ',' if depth == 0 => {
                parts.push(input[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    if in_literal {
        return Err("unterminated string literal".to_string());
    }
    if depth != 0 {
        return Err("unbalanced brackets".to_string());
    }
    parts.push(input[start..].trim());

    if parts.iter().any(|p| p.is_empty()) {
        return Err("empty list element".to_string());
    }
    Ok(parts)
}

impl From<serde_json::Value> for FragmentValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FragmentValue::Null,
            serde_json::Value::Bool(b) => FragmentValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => FragmentValue::Integer(i),
                None => FragmentValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => FragmentValue::String(s),
            serde_json::Value::Array(items) => {
                FragmentValue::List(items.into_iter().map(FragmentValue::from).collect())
            }
            serde_json::Value::Object(map) => FragmentValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, FragmentValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for FragmentValue {
    fn from(value: &str) -> Self {
        FragmentValue::String(value.to_string())
    }
}

impl From<i64> for FragmentValue {
    fn from(value: i64) -> Self {
        FragmentValue::Integer(value)
    }
}

impl From<i32> for FragmentValue {
    fn from(value: i32) -> Self {
        FragmentValue::Integer(i64::from(value))
    }
}

impl From<bool> for FragmentValue {
    fn from(value: bool) -> Self {
        FragmentValue::Bool(value)
    }
}

impl fmt::Display for FragmentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentValue::Null => Ok(()),
            FragmentValue::Bool(b) => write!(f, "{}", b),
            FragmentValue::Integer(i) => write!(f, "{}", i),
            FragmentValue::Float(x) => write!(f, "{}", x),
            FragmentValue::String(s) => f.write_str(s),
            FragmentValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            FragmentValue::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", k, v)?;
                }
                f.write_str("}")
            }
        }
    }
}
