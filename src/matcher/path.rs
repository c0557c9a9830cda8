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

use regex::Regex;
use serde_json::Value;
use std::fmt;

pub(crate) const JSON_PATH_REGEX: &str =
    r"^\$(\.[a-zA-Z_][a-zA-Z0-9_\-]*|\.\*|\[\d+\]|\[\d*:\d*\]|\[\*\])*$";

const DEEP_PATH_PREFIX: &str = "#(";
const DEEP_PATH_SUFFIX: &str = ")";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Path<'a> {
    Root,
    Keys(Vec<Key<'a>>),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key<'a> {
    Idx(usize),
    IdxRange(usize, usize),
    IdxRangeStart(usize),
    IdxRangeEnd(usize),
    Wildcard,
    WildcardArray,
    Field(&'a str),
}

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error(transparent)]
    Regex(#[from] regex::Error),
    #[error("invalid JSON path: {0}")]
    Invalid(String),
    #[error("invalid index in JSON path segment: {0}")]
    Index(String),
}

// `FromStr` can't hand out a `Path` borrowing from its input.
pub trait JSONPath {
    fn jsonpath(&self) -> Result<Path<'_>, PathError>;
}

impl JSONPath for str {
    fn jsonpath(&self) -> Result<Path<'_>, PathError> {
        Path::from_jsonpath(self)
    }
}

/// Returns the JSON path wrapped in a deep path key such as `#($.a.b)`.
pub(crate) fn deep_path_expression(key: &str) -> Option<&str> {
    key.strip_prefix(DEEP_PATH_PREFIX)?
        .strip_suffix(DEEP_PATH_SUFFIX)
}

impl<'a> fmt::Display for Key<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Key::Idx(idx) => write!(f, "[{}]", idx),
            Key::Field(key) => write!(f, ".{}", key),
            Key::IdxRange(start, end) => write!(f, "[{}:{}]", start, end),
            Key::IdxRangeStart(start) => write!(f, "[{}:]", start),
            Key::IdxRangeEnd(end) => write!(f, "[:{}]", end),
            Key::Wildcard => write!(f, ".*"),
            Key::WildcardArray => write!(f, "[*]"),
        }
    }
}

impl<'a> Key<'a> {
    fn is_definite(&self) -> bool {
        matches!(self, Key::Idx(_) | Key::Field(_))
    }

    fn select<'v>(&self, value: &'v Value, acc: &mut Vec<&'v Value>) {
        match (self, value) {
            (Key::Field(field), Value::Object(map)) => acc.extend(map.get(*field)),
            (Key::Idx(idx), Value::Array(items)) => acc.extend(items.get(*idx)),
            (Key::IdxRange(start, end), Value::Array(items)) => {
                acc.extend(items.iter().take(*end).skip(*start))
            }
            (Key::IdxRangeStart(start), Value::Array(items)) => {
                acc.extend(items.iter().skip(*start))
            }
            (Key::IdxRangeEnd(end), Value::Array(items)) => acc.extend(items.iter().take(*end)),
            (Key::Wildcard | Key::WildcardArray, Value::Array(items)) => acc.extend(items.iter()),
            (Key::Wildcard | Key::WildcardArray, Value::Object(map)) => acc.extend(map.values()),
            _ => {}
        }
    }
}

impl<'a> Path<'a> {
    pub(crate) fn from_jsonpath(jsonpath: &'a str) -> Result<Self, PathError> {
        let re = Regex::new(JSON_PATH_REGEX)?;

        if !re.is_match(jsonpath) {
            return Err(PathError::Invalid(jsonpath.to_string()));
        }

        if jsonpath == "$" {
            return Ok(Path::Root);
        }

        let mut keys = Vec::new();

        for segment in jsonpath
            .trim_start_matches('$')
            .split(|c| c == '.' || c == '[')
            .skip(1)
        {
            keys.push(Self::parse_token(segment)?);
        }

        Ok(Path::Keys(keys))
    }

    fn parse_token(token: &'a str) -> Result<Key<'a>, PathError> {
        let mut token = token;
        let mut from_array = false;

        if let Some(stripped) = token.strip_suffix(']') {
            from_array = true;
            token = stripped;
        }

        if token == "*" || (from_array && token == ":") {
            match from_array {
                true => return Ok(Key::WildcardArray),
                false => return Ok(Key::Wildcard),
            }
        }

        if !from_array {
            return Ok(Key::Field(token));
        }

        let parse = |digits: &str| {
            digits
                .parse::<usize>()
                .map_err(|_| PathError::Index(token.to_string()))
        };

        match token.split_once(':') {
            Some((start, "")) => Ok(Key::IdxRangeStart(parse(start)?)),
            Some(("", end)) => Ok(Key::IdxRangeEnd(parse(end)?)),
            Some((start, end)) => Ok(Key::IdxRange(parse(start)?, parse(end)?)),
            None => Ok(Key::Idx(parse(token)?)),
        }
    }

    /// A definite path selects at most one value: it has no wildcards or ranges.
    pub(crate) fn is_definite(&self) -> bool {
        match self {
            Path::Root => true,
            Path::Keys(keys) => keys.iter().all(Key::is_definite),
        }
    }

    /// Collects every value the path selects inside `value`, in document order.
    pub(crate) fn resolve<'v>(&self, value: &'v Value) -> Vec<&'v Value> {
        let mut current = vec![value];
        if let Path::Keys(keys) = self {
            for key in keys {
                let mut next = Vec::new();
                for value in current {
                    key.select(value, &mut next);
                }
                current = next;
            }
        }
        current
    }
}

impl<'a> fmt::Display for Path<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "$")?;
        if let Path::Keys(keys) = self {
            for key in keys {
                write!(f, "{}", key)?;
            }
        }
        Ok(())
    }
}
