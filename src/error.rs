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

use crate::matcher::Indent;
use thiserror::Error;

/// A value could not be turned into a JSON tree.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The text is not well-formed JSON.
    #[error("Invalid JSON\n{0}")]
    Parse(#[source] serde_json::Error),
    /// The value cannot be represented as JSON.
    #[error("Value cannot be converted to JSON\n{0}")]
    Serialize(#[source] serde_json::Error),
}

/// Error type for failed assertions.
#[derive(Debug, Error)]
pub enum AssertionError {
    /// The expected or actual value is not JSON, nothing was matched.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// The actual JSON does not match the expected pattern.
    #[error("{message}\nExpected:\n{}\nActual:\n{}", .expected.indent(4), .actual.indent(4))]
    Mismatch {
        /// Report of every difference, with hints and the custom message.
        message: String,
        /// Every difference found.
        diffs: Vec<String>,
        /// Pretty-printed expected JSON.
        expected: String,
        /// Pretty-printed actual JSON.
        actual: String,
    },
    /// The actual JSON matches a pattern it was asserted not to match.
    #[error("{message}")]
    Equal {
        message: String,
        expected: String,
        actual: String,
    },
}
