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

#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

mod comparator;
mod convert;
mod error;
mod matcher;

pub use comparator::{DefaultJsonComparator, JsonComparator};
pub use convert::{from_serialize, pretty_print, pretty_print_text, Serialized, ToJson};
pub use error::{AssertionError, ConversionError};
pub use matcher::{match_json, CompareMode, CompareModes, UseCase};

use tracing::debug;

const DIFF_SEPARATOR: &str = "\n_____________________________________\n";
const REGEX_HINT: &str = "Json matching by default uses regular expressions.\n\
    In case expected json contains any unintentional regexes, \
    then quote them between \\Q and \\E delimiters or use a custom comparator.";
const EQUAL_MESSAGE: &str = "JSONs are equal";

/// Builder for the assertions.
///
/// The builder is used to configure how the expected pattern is matched against the
/// actual JSON.
///
/// # Examples
///
/// ```
/// use json_compare::{CompareMode, JsonCompare};
///
/// let result = JsonCompare::new()
///     .with_mode(CompareMode::ObjectNonExtensible)
///     .assert_matches(r#"{"a": "\\d+"}"#, r#"{"a": 1, "b": 2}"#);
///
/// let err = result.unwrap_err();
/// assert!(err.to_string().contains("Actual JSON OBJECT has extra fields"));
/// ```
pub struct JsonCompare<'a> {
    modes: CompareModes,
    comparator: &'a dyn JsonComparator,
    message: Option<&'a str>,
}

impl<'a> JsonCompare<'a> {
    /// Constructs a new `JsonCompare` builder with no compare modes and the
    /// [`DefaultJsonComparator`].
    ///
    /// # Examples
    ///
    /// ```
    /// use json_compare::JsonCompare;
    /// let json_compare = JsonCompare::new();
    /// ```
    pub fn new() -> Self {
        Self {
            modes: CompareModes::new(),
            comparator: &DefaultJsonComparator,
            message: None,
        }
    }

    /// Enables a compare mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use json_compare::{CompareMode, JsonCompare};
    /// let json_compare = JsonCompare::new().with_mode(CompareMode::ArrayStrictOrder);
    /// ```
    pub fn with_mode(mut self, mode: CompareMode) -> Self {
        self.modes.insert(mode);
        self
    }

    /// Enables several compare modes at once.
    ///
    /// # Examples
    ///
    /// ```
    /// use json_compare::{CompareMode, JsonCompare};
    /// let json_compare = JsonCompare::new().with_modes([
    ///     CompareMode::ArrayNonExtensible,
    ///     CompareMode::ObjectNonExtensible,
    /// ]);
    /// ```
    pub fn with_modes(mut self, modes: impl IntoIterator<Item = CompareMode>) -> Self {
        self.modes.extend(modes);
        self
    }

    /// Sets the comparator used for scalars and field names.
    ///
    /// Failures reported with a custom comparator don't carry the hint about
    /// unintentional regexes.
    ///
    /// # Examples
    ///
    /// ```
    /// use json_compare::{JsonCompare, JsonComparator};
    /// use serde_json::Value;
    ///
    /// struct Exact;
    ///
    /// impl JsonComparator for Exact {
    ///     fn compare_values(&self, expected: &Value, actual: &Value) -> bool {
    ///         expected == actual
    ///     }
    /// }
    ///
    /// let result = JsonCompare::new()
    ///     .with_comparator(&Exact)
    ///     .assert_matches(r#"["a.c"]"#, r#"["abc"]"#);
    /// assert!(result.is_err());
    /// ```
    pub fn with_comparator(mut self, comparator: &'a dyn JsonComparator) -> Self {
        self.comparator = comparator;
        self
    }

    /// Sets a message appended to the failure report.
    ///
    /// # Examples
    ///
    /// ```
    /// use json_compare::JsonCompare;
    /// let json_compare = JsonCompare::new().with_message("user endpoint changed");
    /// ```
    pub fn with_message(mut self, message: &'a str) -> Self {
        self.message = Some(message);
        self
    }

    /// Returns every difference between the expected pattern and the actual JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use json_compare::JsonCompare;
    ///
    /// let diffs = JsonCompare::new()
    ///     .diffs(r#"{"a": 100, "e": "lorem100"}"#, r#"{"a": 100, "c": true}"#)
    ///     .unwrap();
    /// assert_eq!(diffs, vec!["Field 'e' was NOT FOUND"]);
    /// ```
    pub fn diffs<E, A>(&self, expected: &E, actual: &A) -> Result<Vec<String>, ConversionError>
    where
        E: ToJson + ?Sized,
        A: ToJson + ?Sized,
    {
        let expected = expected.to_json()?;
        let actual = actual.to_json()?;
        Ok(self.diff_values(&expected, &actual))
    }

    /// Asserts the actual JSON matches the expected pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use json_compare::JsonCompare;
    ///
    /// match JsonCompare::new().assert_matches(r#"{"name": "J.*"}"#, r#"{"name": "John", "id": 1}"#) {
    ///     Ok(()) => {
    ///         // handle success
    ///     }
    ///     Err(err) => panic!("{}", err),
    /// }
    /// ```
    pub fn assert_matches<E, A>(&self, expected: &E, actual: &A) -> Result<(), AssertionError>
    where
        E: ToJson + ?Sized,
        A: ToJson + ?Sized,
    {
        let expected = expected.to_json()?;
        let actual = actual.to_json()?;
        let diffs = self.diff_values(&expected, &actual);
        if diffs.is_empty() {
            return Ok(());
        }

        let mut message = format!(
            "FOUND {} DIFFERENCE(S):\n\n{}\n",
            diffs.len(),
            diffs.join(DIFF_SEPARATOR)
        );
        if self.comparator.regex_hint() {
            message.push_str(&format!("\n\n{}\n", REGEX_HINT));
        }
        if let Some(custom) = self.message {
            message.push_str(&format!("\n{}", custom));
        }

        Err(AssertionError::Mismatch {
            message,
            diffs,
            expected: pretty_print(Some(&expected)),
            actual: pretty_print(Some(&actual)),
        })
    }

    /// Asserts the actual JSON does NOT match the expected pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use json_compare::JsonCompare;
    ///
    /// let json_compare = JsonCompare::new();
    /// assert!(json_compare.assert_not_matches(r#"{"a": 1}"#, r#"{"a": 2}"#).is_ok());
    /// assert!(json_compare.assert_not_matches(r#"{"a": 1}"#, r#"{"a": 1}"#).is_err());
    /// ```
    pub fn assert_not_matches<E, A>(&self, expected: &E, actual: &A) -> Result<(), AssertionError>
    where
        E: ToJson + ?Sized,
        A: ToJson + ?Sized,
    {
        let expected = expected.to_json()?;
        let actual = actual.to_json()?;
        if !self.diff_values(&expected, &actual).is_empty() {
            return Ok(());
        }

        let message = match self.message {
            Some(custom) => format!("{}\n{}", EQUAL_MESSAGE, custom),
            None => EQUAL_MESSAGE.to_string(),
        };
        Err(AssertionError::Equal {
            message,
            expected: pretty_print(Some(&expected)),
            actual: pretty_print(Some(&actual)),
        })
    }

    fn diff_values(&self, expected: &serde_json::Value, actual: &serde_json::Value) -> Vec<String> {
        let modes = self.modes.iter().collect::<Vec<_>>();
        debug!(?modes, permissive = self.modes.is_empty(), "matching json");
        match_json(expected, actual, self.comparator, &self.modes)
    }
}

impl<'a> Default for JsonCompare<'a> {
    fn default() -> Self {
        Self::new()
    }
}

/// Asserts the actual JSON matches the expected pattern with the default configuration.
///
/// # Examples
///
/// ```
/// assert!(json_compare::assert_matches(r#"[1, "b.*"]"#, r#"["bar", 1]"#).is_ok());
/// ```
pub fn assert_matches<E, A>(expected: &E, actual: &A) -> Result<(), AssertionError>
where
    E: ToJson + ?Sized,
    A: ToJson + ?Sized,
{
    JsonCompare::new().assert_matches(expected, actual)
}

/// Asserts the actual JSON does NOT match the expected pattern with the default
/// configuration.
///
/// # Examples
///
/// ```
/// assert!(json_compare::assert_not_matches(r#"{"a": 1}"#, r#"{"b": 1}"#).is_ok());
/// ```
pub fn assert_not_matches<E, A>(expected: &E, actual: &A) -> Result<(), AssertionError>
where
    E: ToJson + ?Sized,
    A: ToJson + ?Sized,
{
    JsonCompare::new().assert_not_matches(expected, actual)
}

/// Panics unless the actual JSON matches the expected pattern.
///
/// An optional third argument is the [`JsonCompare`] to use.
///
/// # Examples
///
/// ```
/// use json_compare::{assert_json_matches, CompareMode, JsonCompare};
/// use serde_json::json;
///
/// assert_json_matches!(r#"{"id": "\\d+"}"#, json!({"id": 12, "name": "John"}));
/// assert_json_matches!(
///     "[1, 2]",
///     "[1, 2]",
///     JsonCompare::new().with_mode(CompareMode::ArrayStrictOrder)
/// );
/// ```
#[macro_export]
macro_rules! assert_json_matches {
    ($expected:expr, $actual:expr $(,)?) => {
        $crate::assert_json_matches!($expected, $actual, $crate::JsonCompare::new())
    };

    ($expected:expr, $actual:expr, $compare:expr $(,)?) => {
        if let Err(err) = $compare.assert_matches(&$expected, &$actual) {
            panic!("{}", err);
        }
    };
}

/// Panics if the actual JSON matches the expected pattern.
///
/// # Examples
///
/// ```
/// use json_compare::assert_json_not_matches;
///
/// assert_json_not_matches!(r#"{"id": 1}"#, r#"{"id": 2}"#);
/// ```
#[macro_export]
macro_rules! assert_json_not_matches {
    ($expected:expr, $actual:expr $(,)?) => {
        $crate::assert_json_not_matches!($expected, $actual, $crate::JsonCompare::new())
    };

    ($expected:expr, $actual:expr, $compare:expr $(,)?) => {
        if let Err(err) = $compare.assert_not_matches(&$expected, &$actual) {
            panic!("{}", err);
        }
    };
}
