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

use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

pub(crate) const WILDCARD: &str = ".*";
const NEGATION: char = '!';
const ESCAPE: char = '\\';

/// The matching discipline of one expected field or array element.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UseCase {
    /// The entry must be present and match.
    Match,
    /// Any entry must be present (`.*`).
    MatchAny,
    /// No entry may match (`!pattern`).
    DoNotMatch,
    /// No entry may be present at all (`!.*`).
    DoNotMatchAny,
}

impl UseCase {
    pub(crate) fn is_positive(self) -> bool {
        matches!(self, UseCase::Match | UseCase::MatchAny)
    }

    /// Splits an expected field name into its use case and the pattern left once the
    /// marker is removed. `\!` escapes a literal leading `!`.
    pub(crate) fn of_field(key: &str) -> (UseCase, &str) {
        if let Some(literal) = key
            .strip_prefix(ESCAPE)
            .filter(|rest| rest.starts_with(NEGATION))
        {
            return (UseCase::Match, literal);
        }

        match key.strip_prefix(NEGATION) {
            Some(WILDCARD) => (UseCase::DoNotMatchAny, WILDCARD),
            Some(pattern) => (UseCase::DoNotMatch, pattern),
            None if key == WILDCARD => (UseCase::MatchAny, key),
            None => (UseCase::Match, key),
        }
    }

    /// Array elements carry their marker in their own text. Only string elements can be
    /// markers; any other element is matched as is.
    pub(crate) fn of_element(element: &Value) -> (UseCase, Cow<'_, Value>) {
        let Value::String(text) = element else {
            return (UseCase::Match, Cow::Borrowed(element));
        };

        match UseCase::of_field(text) {
            (use_case, pattern) if pattern.len() == text.len() => {
                (use_case, Cow::Borrowed(element))
            }
            (use_case, pattern) => (use_case, Cow::Owned(Value::String(pattern.to_string()))),
        }
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UseCase::Match => write!(f, "MATCH"),
            UseCase::MatchAny => write!(f, "MATCH_ANY"),
            UseCase::DoNotMatch => write!(f, "DO_NOT_MATCH"),
            UseCase::DoNotMatchAny => write!(f, "DO_NOT_MATCH_ANY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("a", UseCase::Match, "a")]
    #[test_case("a.*", UseCase::Match, "a.*")]
    #[test_case(".*", UseCase::MatchAny, ".*")]
    #[test_case("!a", UseCase::DoNotMatch, "a")]
    #[test_case("!.*", UseCase::DoNotMatchAny, ".*")]
    #[test_case("!.+", UseCase::DoNotMatch, ".+")]
    #[test_case("\\!a", UseCase::Match, "!a")]
    #[test_case("\\!.*", UseCase::Match, "!.*")]
    #[test_case("\\d", UseCase::Match, "\\d")]
    #[test_case("", UseCase::Match, "")]
    fn test_of_field(key: &str, use_case: UseCase, pattern: &str) {
        assert_eq!(UseCase::of_field(key), (use_case, pattern));
    }

    #[test]
    fn test_of_element() {
        let element = json!({"a": 1});
        assert_eq!(
            UseCase::of_element(&element),
            (UseCase::Match, Cow::Borrowed(&element))
        );

        let element = json!(".*");
        assert_eq!(UseCase::of_element(&element).0, UseCase::MatchAny);

        let element = json!("!.*");
        assert_eq!(UseCase::of_element(&element).0, UseCase::DoNotMatchAny);

        let element = json!("!lorem");
        let (use_case, target) = UseCase::of_element(&element);
        assert_eq!(use_case, UseCase::DoNotMatch);
        assert_eq!(target.into_owned(), json!("lorem"));

        let element = json!("\\!lorem");
        let (use_case, target) = UseCase::of_element(&element);
        assert_eq!(use_case, UseCase::Match);
        assert_eq!(target.into_owned(), json!("!lorem"));

        let element = json!(12);
        assert_eq!(UseCase::of_element(&element).0, UseCase::Match);
    }

    #[test]
    fn test_is_positive() {
        assert!(UseCase::Match.is_positive());
        assert!(UseCase::MatchAny.is_positive());
        assert!(!UseCase::DoNotMatch.is_positive());
        assert!(!UseCase::DoNotMatchAny.is_positive());
    }
}
