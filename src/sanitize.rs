use serde_json::Value;
use tracing::{error, warn};

const EMPTY_PAYLOADS: [&str; 3] = ["null", "undefined", "[]"];

// `-Infinity` must go before `Infinity`, which would leave a `-null`.
const NON_JSON_TOKENS: [&str; 4] = ["-Infinity", "NaN", "Infinity", "None"];

/// Parses an untrusted JSON payload, returning `default` on any malformed or
/// empty input. Array elements that are `null` or non-finite become `0`.
pub fn sanitize(raw: &str, default: Value) -> Value {
    if raw.is_empty() || EMPTY_PAYLOADS.contains(&raw) {
        warn!(raw, "empty or missing dataset, using default");
        return default;
    }

    let cleaned = NON_JSON_TOKENS
        .iter()
        .fold(raw.to_string(), |acc, token| acc.replace(token, "null"));
    let cleaned = null_out_of_range(&cleaned);

    match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Array(items)) => Value::Array(items.into_iter().map(zero_if_missing).collect()),
        Ok(other) => other,
        Err(err) => {
            error!(raw, "failed to parse dataset: {err}");
            default
        }
    }
}

pub fn numbers(raw: &str, default: &[f64]) -> Vec<f64> {
    let fallback = Value::from(default.to_vec());
    match sanitize(raw, fallback) {
        Value::Array(items) => items.iter().map(number_or_zero).collect(),
        other => {
            warn!(kind = value_kind(&other), "numeric dataset is not an array, using default");
            default.to_vec()
        }
    }
}

pub fn labels(raw: &str, default: &[&str]) -> Vec<String> {
    let fallback = Value::from(default.to_vec());
    match sanitize(raw, fallback) {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => text,
                other => other.to_string(),
            })
            .collect(),
        other => {
            warn!(kind = value_kind(&other), "label dataset is not an array, using default");
            default.iter().map(|label| label.to_string()).collect()
        }
    }
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Number literals too large for an `f64` fail the whole parse; they become
/// `null` so only that element is lost. String contents are left alone.
fn null_out_of_range(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some((start, ch)) = chars.next() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        if ch == '"' {
            in_string = true;
            out.push(ch);
            continue;
        }
        if ch != '-' && !ch.is_ascii_digit() {
            out.push(ch);
            continue;
        }

        let mut end = start + ch.len_utf8();
        while let Some(&(index, next)) = chars.peek() {
            if !(next.is_ascii_digit() || matches!(next, '.' | 'e' | 'E' | '+' | '-')) {
                break;
            }
            end = index + next.len_utf8();
            chars.next();
        }
        let literal = &text[start..end];
        match literal.parse::<f64>() {
            Ok(value) if value.is_infinite() => out.push_str("null"),
            _ => out.push_str(literal),
        }
    }
    out
}

fn zero_if_missing(item: Value) -> Value {
    match &item {
        Value::Null => Value::from(0),
        Value::Number(number) if !number.as_f64().is_some_and(f64::is_finite) => Value::from(0),
        _ => item,
    }
}

fn number_or_zero(item: &Value) -> f64 {
    match item {
        Value::Number(number) => number.as_f64().map(finite_or_zero).unwrap_or(0.0),
        Value::String(text) => text.trim().parse::<f64>().map(finite_or_zero).unwrap_or(0.0),
        _ => 0.0,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
