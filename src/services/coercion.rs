//! Value coercion for dump value lines.
//!
//! Coercion is total: every raw line maps to some JSON value, and malformed
//! embedded JSON degrades to `null` instead of failing the conversion.

use crate::models::{CoercionPolicy, RecognizedKey};
use regex::Regex;
use serde_json::{Number, Value};
use std::sync::LazyLock;

/// Optional minus, ASCII digits, optional fractional part. No exponent, no leading `+`.
static NUMERIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("Invalid numeric regex"));

/// Largest integer an `f64` holds exactly (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Characters stripped by line trimming: Unicode white space except NEL
/// (U+0085), plus the byte order mark (U+FEFF).
pub(crate) fn is_blank(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

pub(crate) fn trim_blank(line: &str) -> &str {
    line.trim_matches(is_blank)
}

/// Coerce a raw value line using the policy of the key it belongs to.
pub fn coerce_value(raw: &str, key: RecognizedKey) -> Value {
    coerce_with_policy(raw, key.policy())
}

pub fn coerce_with_policy(raw: &str, policy: CoercionPolicy) -> Value {
    let trimmed = trim_blank(raw);

    match policy {
        CoercionPolicy::StripWhitespace => {
            Value::String(trimmed.chars().filter(|&c| !is_blank(c)).collect())
        }
        CoercionPolicy::Json => parse_embedded_json(trimmed),
        CoercionPolicy::StringOnly => Value::String(trimmed.to_string()),
        CoercionPolicy::Infer => infer_value(trimmed),
    }
}

/// Coerce a button binding value and render it back to the string stored in
/// `controllerEmulationBindings`.
///
/// Numbers come out in their shortest form, so `"07"` binds as `"7"`.
pub fn coerce_binding(raw: &str) -> String {
    match infer_value(trim_blank(raw)) {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(&n),
        other => other.to_string(),
    }
}

/// ECMAScript `Number::toString` rendering: plain decimals for magnitudes in
/// `[1e-7, 1e21)`, `d.ddde±x` outside that range.
fn number_to_string(number: &Number) -> String {
    let Some(value) = number.as_f64().filter(|_| number.is_f64()) else {
        return number.to_string();
    };
    if value == 0.0 {
        return "0".to_string();
    }

    // Shortest round-trip digits, e.g. "1.5e-7" or "1e19"
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exponent.parse::<i32>().unwrap_or(0) + 1;

    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int_part, frac_part) = digits.split_at(n as usize);
        format!("{}.{}", int_part, frac_part)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat(-n as usize), digits)
    } else {
        let sign = if n > 0 { '+' } else { '-' };
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", lead, sign, (n - 1).abs())
        } else {
            format!("{}.{}e{}{}", lead, rest, sign, (n - 1).abs())
        }
    };

    if value < 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

fn parse_embedded_json(trimmed: &str) -> Value {
    if trimmed.is_empty() || trimmed == "null" {
        return Value::Null;
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Embedded JSON rejected, using null: {}", e);
            Value::Null
        }
    }
}

fn infer_value(trimmed: &str) -> Value {
    match trimmed {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if NUMERIC_PATTERN.is_match(trimmed) {
        if let Some(number) = parse_number(trimmed) {
            return Value::Number(number);
        }
    }

    Value::String(trimmed.to_string())
}

/// Parse a numeric literal the way a JSON consumer reads it back: integral
/// values become integers, everything else a finite float.
fn parse_number(literal: &str) -> Option<Number> {
    let value: f64 = literal.parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}
