// Copyright 2024 The json-compare Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Leaf comparison of scalar values and object field names.

use bigdecimal::BigDecimal;
use regex::Regex;
use serde_json::{Number, Value};
use std::borrow::Cow;
use std::str::FromStr;
use tracing::trace;

const QUOTE_START: &str = r"\Q";
const QUOTE_END: &str = r"\E";

/// Compares the leaves of two JSON trees.
///
/// The matcher calls [`compare_values`](JsonComparator::compare_values) for every pair of
/// scalars it meets and [`compare_fields`](JsonComparator::compare_fields) for every
/// expected field name against the keys of the actual object.
///
/// # Examples
///
/// A comparator treating every expected string as literal text:
///
/// ```
/// use json_compare::{DefaultJsonComparator, JsonComparator};
/// use serde_json::Value;
///
/// struct LiteralComparator;
///
/// impl JsonComparator for LiteralComparator {
///     fn compare_values(&self, expected: &Value, actual: &Value) -> bool {
///         match (expected, actual) {
///             (Value::String(expected), Value::String(actual)) => expected == actual,
///             _ => DefaultJsonComparator.compare_values(expected, actual),
///         }
///     }
///
///     fn compare_fields(&self, expected: &str, actual: &str) -> bool {
///         expected == actual
///     }
/// }
///
/// assert!(LiteralComparator.compare_values(&"a.c".into(), &"a.c".into()));
/// assert!(!LiteralComparator.compare_values(&"a.c".into(), &"abc".into()));
/// ```
pub trait JsonComparator: Send + Sync {
    /// Compares an expected scalar against an actual scalar.
    fn compare_values(&self, expected: &Value, actual: &Value) -> bool;

    /// Compares an expected field name (already stripped of its `!` marker)
    /// against an actual object key.
    fn compare_fields(&self, expected: &str, actual: &str) -> bool {
        matches_pattern(expected, actual)
    }

    /// Whether failures should carry the hint about unintentional regexes.
    fn regex_hint(&self) -> bool {
        false
    }
}

/// The comparator used unless another one is configured.
///
/// Expected strings are regular expressions matched in full against the textual form of
/// the actual scalar, with `.` matching new lines and `^`/`$` matching at line breaks.
/// Text between `\Q` and `\E` is taken literally. A pattern that does not compile is
/// compared as plain text.
///
/// Numbers compare by decimal value, so `1`, `1.0` and `1e0` are all equal. Booleans and
/// `null` compare by value.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultJsonComparator;

impl JsonComparator for DefaultJsonComparator {
    fn compare_values(&self, expected: &Value, actual: &Value) -> bool {
        match (expected, actual) {
            (Value::String(pattern), actual) => matches_pattern(pattern, &textual(actual)),
            (Value::Number(expected), Value::Number(actual)) => numbers_equal(expected, actual),
            (Value::Bool(expected), Value::Bool(actual)) => expected == actual,
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }

    fn regex_hint(&self) -> bool {
        true
    }
}

fn textual(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(text) => Cow::Borrowed(text),
        other => Cow::Owned(other.to_string()),
    }
}

/// Matches `text` in full against `pattern`.
pub(crate) fn matches_pattern(pattern: &str, text: &str) -> bool {
    let quoted = quote_literals(pattern);
    // the bare pattern must compile first, or an unbalanced `)` could close the anchoring group
    let anchored =
        Regex::new(&quoted).and_then(|_| Regex::new(&format!(r"\A(?sm:{})\z", quoted)));
    match anchored {
        Ok(re) => re.is_match(text),
        Err(err) => {
            trace!(pattern, %err, "pattern is not a valid regex, comparing as text");
            pattern == text
        }
    }
}

/// Replaces every `\Q...\E` section with its escaped content. An unterminated `\Q`
/// quotes the rest of the pattern.
fn quote_literals(pattern: &str) -> Cow<'_, str> {
    let Some(mut start) = find_quote_start(pattern) else {
        return Cow::Borrowed(pattern);
    };

    let mut out = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;
    loop {
        out.push_str(&rest[..start]);
        let quoted = &rest[start + QUOTE_START.len()..];
        match quoted.find(QUOTE_END) {
            Some(end) => {
                out.push_str(&regex::escape(&quoted[..end]));
                rest = &quoted[end + QUOTE_END.len()..];
            }
            None => {
                out.push_str(&regex::escape(quoted));
                return Cow::Owned(out);
            }
        }
        match find_quote_start(rest) {
            Some(next) => start = next,
            None => {
                out.push_str(rest);
                return Cow::Owned(out);
            }
        }
    }
}

// Skips escaped pairs so that `\\Q` stays an escaped backslash followed by `Q`.
fn find_quote_start(pattern: &str) -> Option<usize> {
    let bytes = pattern.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'\\' {
            if bytes.get(idx + 1) == Some(&b'Q') {
                return Some(idx);
            }
            idx += 2;
        } else {
            idx += 1;
        }
    }
    None
}

fn numbers_equal(expected: &Number, actual: &Number) -> bool {
    match (
        BigDecimal::from_str(&expected.to_string()),
        BigDecimal::from_str(&actual.to_string()),
    ) {
        (Ok(expected), Ok(actual)) => expected == actual,
        _ => expected == actual,
    }
}
