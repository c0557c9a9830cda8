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

//! Conversion of inputs into JSON trees, and the way trees are rendered back to text.

use crate::error::ConversionError;
use serde::Serialize;
use serde_json::Value;

/// Anything that can be turned into the JSON tree the matcher works on.
///
/// Strings are parsed as JSON text, so `"1"` is the number one and `"\"1\""` the string.
/// Use [`Serialized`] or [`from_serialize`] for other types.
pub trait ToJson {
    fn to_json(&self) -> Result<Value, ConversionError>;
}

impl ToJson for str {
    fn to_json(&self) -> Result<Value, ConversionError> {
        serde_json::from_str(self).map_err(ConversionError::Parse)
    }
}

impl ToJson for String {
    fn to_json(&self) -> Result<Value, ConversionError> {
        self.as_str().to_json()
    }
}

impl ToJson for Value {
    fn to_json(&self) -> Result<Value, ConversionError> {
        Ok(self.clone())
    }
}

impl<T: ToJson + ?Sized> ToJson for &T {
    fn to_json(&self) -> Result<Value, ConversionError> {
        (**self).to_json()
    }
}

/// Wraps a [`Serialize`] value so it can be asserted on directly.
///
/// # Examples
///
/// ```
/// use json_compare::{JsonCompare, Serialized};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct User {
///     id: u32,
///     name: String,
/// }
///
/// let user = User { id: 7, name: "John".to_string() };
/// let result = JsonCompare::new().assert_matches(r#"{"name": "J.*"}"#, &Serialized(&user));
/// assert!(result.is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Serialized<T>(pub T);

impl<T: Serialize> ToJson for Serialized<T> {
    fn to_json(&self) -> Result<Value, ConversionError> {
        from_serialize(&self.0)
    }
}

/// Converts any [`Serialize`] value into a JSON tree.
pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Value, ConversionError> {
    serde_json::to_value(value).map_err(ConversionError::Serialize)
}

/// Renders a JSON tree as indented text. A missing tree renders as `null`.
pub fn pretty_print(value: Option<&Value>) -> String {
    match value {
        Some(value) => format!("{:#}", value),
        None => "null".to_string(),
    }
}

/// Re-indents JSON text. Empty text stays empty.
pub fn pretty_print_text(text: &str) -> Result<String, ConversionError> {
    if text.is_empty() {
        return Ok(String::new());
    }
    Ok(pretty_print(Some(&text.to_json()?)))
}
