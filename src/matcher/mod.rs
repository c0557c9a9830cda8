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

//! The recursive matcher walking an expected pattern and an actual document side by side.

mod array;
mod misc;
mod object;
pub mod path;
mod use_case;

pub(crate) use misc::Indent;
pub use use_case::UseCase;

use crate::comparator::JsonComparator;
use misc::{Crop, CROP_LIMIT};
use path::{deep_path_expression, JSONPath};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Toggles making the match stricter than the permissive default.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareMode {
    /// The actual object may not have fields the pattern does not account for.
    #[serde(rename = "JSON_OBJECT_NON_EXTENSIBLE")]
    ObjectNonExtensible,
    /// The actual array may not have more elements than the pattern.
    #[serde(rename = "JSON_ARRAY_NON_EXTENSIBLE")]
    ArrayNonExtensible,
    /// Array elements are matched position by position.
    #[serde(rename = "JSON_ARRAY_STRICT_ORDER")]
    ArrayStrictOrder,
}

/// A set of [`CompareMode`]s. The empty set is the permissive default.
///
/// # Examples
///
/// ```
/// use json_compare::{CompareMode, CompareModes};
///
/// let modes = CompareModes::from([CompareMode::ArrayStrictOrder]);
/// assert!(modes.contains(CompareMode::ArrayStrictOrder));
/// assert!(!modes.contains(CompareMode::ObjectNonExtensible));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompareModes(HashSet<CompareMode>);

impl CompareModes {
    /// Constructs an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mode to the set.
    pub fn insert(&mut self, mode: CompareMode) {
        self.0.insert(mode);
    }

    /// Checks whether the mode is enabled.
    pub fn contains(&self, mode: CompareMode) -> bool {
        self.0.contains(&mode)
    }

    /// Checks whether no mode is enabled, i.e. the match is fully permissive.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the enabled modes in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = CompareMode> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<CompareMode> for CompareModes {
    fn from_iter<I: IntoIterator<Item = CompareMode>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<CompareMode> for CompareModes {
    fn extend<I: IntoIterator<Item = CompareMode>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl<const N: usize> From<[CompareMode; N]> for CompareModes {
    fn from(modes: [CompareMode; N]) -> Self {
        modes.into_iter().collect()
    }
}

/// Everything a single match reads but never changes.
#[derive(Clone, Copy)]
pub(crate) struct Config<'a> {
    pub(crate) comparator: &'a dyn JsonComparator,
    pub(crate) modes: &'a CompareModes,
}

impl<'a> Config<'a> {
    pub(crate) fn new(comparator: &'a dyn JsonComparator, modes: &'a CompareModes) -> Self {
        Self { comparator, modes }
    }

    pub(crate) fn has(&self, mode: CompareMode) -> bool {
        self.modes.contains(mode)
    }

    /// Matches `expected` against `actual` and returns every difference found.
    pub(crate) fn diff(&self, expected: &Value, actual: &Value) -> Vec<String> {
        let mut acc = vec![];

        if let Some(paths) = deep_paths(expected) {
            for (expression, expected) in paths {
                self.diff_deep_path(expression, expected, actual, &mut acc);
            }
            return acc;
        }

        let mut folder = DiffFolder {
            expected,
            config: *self,
            acc: &mut acc,
        };
        fold_json(actual, &mut folder);
        acc
    }

    /// Resolves a JSON path against `actual` and matches `expected` against the result.
    pub(crate) fn diff_deep_path(
        &self,
        expression: &str,
        expected: &Value,
        actual: &Value,
        acc: &mut Vec<String>,
    ) {
        let prefix = format!("Json path '{}'", expression);
        let path = match expression.jsonpath() {
            Ok(path) => path,
            Err(err) => {
                debug!(expression, %err, "invalid deep path");
                acc.push(format!("{} -> Invalid JSON path", prefix));
                return;
            }
        };

        let found = path.resolve(actual);
        trace!(%path, results = found.len(), "resolved deep path");
        let diffs = if path.is_definite() {
            match found.first() {
                Some(value) => self.diff(expected, value),
                None => vec!["No results for path".to_string()],
            }
        } else {
            let results = Value::Array(found.into_iter().cloned().collect());
            self.diff(expected, &results)
        };

        push_prefixed(acc, &prefix, diffs);
    }
}

/// Matches an expected pattern against an actual document.
///
/// Returns every difference found, in the declaration order of the pattern. An empty list
/// means the documents match. Content mismatches never fail the call, they are reported
/// as entries of the list.
///
/// # Examples
///
/// ```
/// use json_compare::{match_json, CompareModes, DefaultJsonComparator};
/// use serde_json::json;
///
/// let diffs = match_json(
///     &json!({"a": 100, "e": "lorem100"}),
///     &json!({"a": 100, "c": true}),
///     &DefaultJsonComparator,
///     &CompareModes::new(),
/// );
/// assert_eq!(diffs, vec!["Field 'e' was NOT FOUND"]);
/// ```
pub fn match_json(
    expected: &Value,
    actual: &Value,
    comparator: &dyn JsonComparator,
    modes: &CompareModes,
) -> Vec<String> {
    let diffs = Config::new(comparator, modes).diff(expected, actual);
    debug!(differences = diffs.len(), "json match finished");
    diffs
}

/// Returns the deep path keys of an object made only of `#(<jsonpath>)` keys.
pub(crate) fn deep_paths(expected: &Value) -> Option<Vec<(&str, &Value)>> {
    let fields = expected.as_object().filter(|fields| !fields.is_empty())?;
    fields
        .iter()
        .map(|(key, value)| deep_path_expression(key).map(|expression| (expression, value)))
        .collect()
}

pub(crate) fn push_prefixed(acc: &mut Vec<String>, segment: &str, diffs: Vec<String>) {
    acc.extend(
        diffs
            .into_iter()
            .map(|diff| format!("{} -> {}", segment, diff)),
    );
}

/// Pretty-printed rendering of an element, cropped for embedding in a diff line.
pub(crate) fn render(value: &Value) -> String {
    format!("{:#}", value).crop(CROP_LIMIT)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "NULL",
        Value::Bool(_) => "BOOLEAN",
        Value::Number(_) => "NUMBER",
        Value::String(_) => "STRING",
        Value::Array(_) => "ARRAY",
        Value::Object(_) => "OBJECT",
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

struct DiffFolder<'a, 'b> {
    expected: &'a Value,
    config: Config<'a>,
    acc: &'b mut Vec<String>,
}

macro_rules! scalar_compare {
    ($name:ident) => {
        fn $name(&mut self, actual: &Value) {
            if !is_scalar(self.expected) {
                return self.on_kind_mismatch(actual);
            }

            if !self.config.comparator.compare_values(self.expected, actual) {
                self.acc.push(format!(
                    "Expected value: {} But got: {}",
                    self.expected, actual
                ));
            }
        }
    };
}

impl<'a, 'b> DiffFolder<'a, 'b> {
    scalar_compare!(on_null);
    scalar_compare!(on_bool);
    scalar_compare!(on_number);
    scalar_compare!(on_string);

    fn on_array(&mut self, actual: &Value) {
        match (self.expected, actual) {
            (Value::Array(expected), Value::Array(items)) => {
                let diffs = array::match_array(expected, actual, items, self.config);
                self.acc.extend(diffs);
            }
            _ => self.on_kind_mismatch(actual),
        }
    }

    fn on_object(&mut self, actual: &Value) {
        match (self.expected, actual) {
            (Value::Object(expected), Value::Object(fields)) => {
                let diffs = object::match_object(expected, actual, fields, self.config);
                self.acc.extend(diffs);
            }
            _ => self.on_kind_mismatch(actual),
        }
    }

    fn on_kind_mismatch(&mut self, actual: &Value) {
        self.acc.push(format!(
            "Different JSON types: expected {} but got {}",
            kind(self.expected),
            kind(actual)
        ));
    }
}

fn fold_json(json: &Value, folder: &mut DiffFolder<'_, '_>) {
    match json {
        Value::Null => folder.on_null(json),
        Value::Bool(_) => folder.on_bool(json),
        Value::Number(_) => folder.on_number(json),
        Value::String(_) => folder.on_string(json),
        Value::Array(_) => folder.on_array(json),
        Value::Object(_) => folder.on_object(json),
    }
}
