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

use super::path::deep_path_expression;
use super::{push_prefixed, CompareMode, Config, UseCase};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::trace;

/// Matches an expected object pattern against an actual object.
///
/// Expected fields are processed in declaration order. An actual field counts as consumed
/// only once a positive field matched it without differences, so negative fields declared
/// later still see the fields whose match failed.
pub(super) fn match_object(
    expected: &Map<String, Value>,
    actual: &Value,
    fields: &Map<String, Value>,
    config: Config<'_>,
) -> Vec<String> {
    let mut diffs = vec![];
    let mut consumed: HashSet<&str> = HashSet::new();

    for (key, expected_value) in expected {
        if let Some(expression) = deep_path_expression(key) {
            config.diff_deep_path(expression, expected_value, actual, &mut diffs);
            continue;
        }

        let (use_case, pattern) = UseCase::of_field(key);
        let candidates = fields
            .iter()
            .filter(|(field, _)| !consumed.contains(field.as_str()))
            .filter(|(field, _)| config.comparator.compare_fields(pattern, field))
            .collect::<Vec<_>>();
        trace!(field = %key, %use_case, candidates = candidates.len(), "matching object field");

        if !use_case.is_positive() {
            if !candidates.is_empty() {
                diffs.push(format!("Field '{}' was FOUND", key));
            }
            continue;
        }

        if candidates.is_empty() {
            diffs.push(format!("Field '{}' was NOT FOUND", key));
            continue;
        }

        for (field, actual_value) in candidates {
            let candidate_diffs = config.diff(expected_value, actual_value);
            if candidate_diffs.is_empty() {
                consumed.insert(field.as_str());
            } else {
                push_prefixed(&mut diffs, key, candidate_diffs);
            }
        }
    }

    if config.has(CompareMode::ObjectNonExtensible)
        && fields.keys().any(|field| !consumed.contains(field.as_str()))
    {
        diffs.push("Actual JSON OBJECT has extra fields".to_string());
    }

    diffs
}

#[cfg(test)]
mod test {
    use crate::comparator::DefaultJsonComparator;
    use crate::matcher::{match_json, CompareMode, CompareModes};
    use serde_json::{json, Value};

    fn diff(expected: &str, actual: &str, modes: &[CompareMode]) -> Vec<String> {
        let expected: Value = serde_json::from_str(expected).unwrap();
        let actual: Value = serde_json::from_str(actual).unwrap();
        let modes = modes.iter().copied().collect::<CompareModes>();
        match_json(&expected, &actual, &DefaultJsonComparator, &modes)
    }

    #[test]
    fn test_object() {
        assert!(diff("{}", "{}", &[]).is_empty());
        assert!(diff(r#"{"a":1}"#, r#"{"a":1}"#, &[]).is_empty());
        assert!(diff(r#"{"a":1}"#, r#"{"a":1,"b":123}"#, &[]).is_empty());
        assert!(diff(r#"{"a":{}}"#, r#"{"a":{"b":true}}"#, &[]).is_empty());
        assert!(diff(r#"{}"#, r#"{"a":1}"#, &[]).is_empty());

        assert_eq!(
            diff(r#"{"a":1}"#, r#"{"a":2}"#, &[]),
            vec!["a -> Expected value: 1 But got: 2"]
        );
    }

    #[test]
    fn test_single_field_not_found() {
        assert_eq!(
            diff(r#"{"a":100,"e":"lorem100"}"#, r#"{"a":100,"c":true}"#, &[]),
            vec!["Field 'e' was NOT FOUND"]
        );
    }

    #[test]
    fn test_multiple_field_not_found() {
        assert_eq!(
            diff(
                r#"{"a":100,"e":"lorem100","x":true}"#,
                r#"{"a":100,"c":true}"#,
                &[]
            ),
            vec!["Field 'e' was NOT FOUND", "Field 'x' was NOT FOUND"]
        );
    }

    #[test]
    fn test_in_depth_field_not_found() {
        assert_eq!(
            diff(
                r#"{"a":100,"x":51,"b":{"b1":"val1","b2":{"b21":"test"}}}"#,
                r#"{"b":{"b3":"val1","b2":{"b22":10.432}},"a":100,"c":true}"#,
                &[]
            ),
            vec![
                "Field 'x' was NOT FOUND",
                "b -> Field 'b1' was NOT FOUND",
                "b -> b2 -> Field 'b21' was NOT FOUND",
            ]
        );
    }

    #[test]
    fn test_do_not_match_field() {
        assert_eq!(
            diff(r#"{"c":true,"!a":100}"#, r#"{"a":200,"c":true}"#, &[]),
            vec!["Field '!a' was FOUND"]
        );
        assert!(diff(r#"{"c":true,"!b":100}"#, r#"{"a":200,"c":true}"#, &[]).is_empty());
    }

    #[test]
    fn test_multiple_do_not_match_fields() {
        assert_eq!(
            diff(
                r#"{"c":true,"!a":100,"!c":200,"!x":200}"#,
                r#"{"a":200,"c":true,"x":"lorem"}"#,
                &[]
            ),
            vec!["Field '!a' was FOUND", "Field '!x' was FOUND"]
        );
    }

    #[test]
    fn test_in_depth_do_not_match_fields() {
        assert_eq!(
            diff(
                r#"{"!c":true,"a":200,"x":{"!x1":"lorem","x2":{"!x21":"test"}}}"#,
                r#"{"c":true,"a":200,"x":{"x1":"lorem","x2":{"x23":"pat","x21":"lol"}}}"#,
                &[]
            ),
            vec![
                "Field '!c' was FOUND",
                "x -> Field '!x1' was FOUND",
                "x -> x2 -> Field '!x21' was FOUND",
            ]
        );
    }

    #[test]
    fn test_wildcard_key_quantifies_over_all_candidates() {
        assert_eq!(
            diff(
                r#"{".*":{"a":1,"x":2}}"#,
                r#"{"test1":{"a":10,"b":22},"test2":{"a":20,"x":2}}"#,
                &[]
            ),
            vec![
                ".* -> a -> Expected value: 1 But got: 10",
                ".* -> Field 'x' was NOT FOUND",
                ".* -> a -> Expected value: 1 But got: 20",
            ]
        );

        assert_eq!(
            diff(
                r#"{".*":{"a":1,"x":2}}"#,
                r#"{"test1":{"a":10,"b":22},"test2":{"a":1,"x":2}}"#,
                &[]
            ),
            vec![
                ".* -> a -> Expected value: 1 But got: 10",
                ".* -> Field 'x' was NOT FOUND",
            ]
        );
    }

    #[test]
    fn test_regex_key_pattern() {
        assert!(diff(r#"{"test\\d":1}"#, r#"{"test1":1,"test2":1}"#, &[]).is_empty());
        assert_eq!(
            diff(r#"{"test\\d":1}"#, r#"{"test1":1,"test2":2}"#, &[]),
            vec!["test\\d -> Expected value: 1 But got: 2"]
        );
        assert!(diff(r#"{"\\Qa.b\\E":1}"#, r#"{"a.b":1}"#, &[]).is_empty());
        assert_eq!(
            diff(r#"{"\\Qa.b\\E":1}"#, r#"{"axb":1}"#, &[]),
            vec!["Field '\\Qa.b\\E' was NOT FOUND"]
        );
    }

    #[test]
    fn test_negative_wildcard() {
        assert_eq!(
            diff(
                r#"{"b":2,"a":1,"c":{"c2":"lorem2","!.*":".*"},"!.*":".*"}"#,
                r#"{"a":1,"b":2,"c":{"c1":"lorem1","c2":"lorem2"},"d":1}"#,
                &[]
            ),
            vec!["c -> Field '!.*' was FOUND", "Field '!.*' was FOUND"]
        );

        assert!(diff(
            r#"{"b":2,"a":1,"c":{"c2":"lorem2","!.*":".*"},"!.*":".*"}"#,
            r#"{"a":1,"b":2,"c":{"c2":"lorem2"}}"#,
            &[]
        )
        .is_empty());
    }

    #[test]
    fn test_match_any() {
        assert_eq!(
            diff(
                r#"{"b":2,"a":1,"c":{"c1":"lorem2",".*":".*"},"!.*":".*"}"#,
                r#"{"a":1,"b":2,"c":{"c1":"lorem2"}}"#,
                &[]
            ),
            vec!["c -> Field '.*' was NOT FOUND", "Field '!.*' was FOUND"]
        );

        assert!(diff(
            r#"{"c1":"lorem2",".*":".*"}"#,
            r#"{"c1":"lorem2","c2":3}"#,
            &[]
        )
        .is_empty());
    }

    #[test]
    fn test_negative_sees_failed_positive() {
        // `a` failed its positive match, so it is still available to `!.*`.
        assert_eq!(
            diff(r#"{"a":1,"!.*":".*"}"#, r#"{"a":2}"#, &[]),
            vec![
                "a -> Expected value: 1 But got: 2",
                "Field '!.*' was FOUND"
            ]
        );
        assert!(diff(r#"{"a":1,"!a":1}"#, r#"{"a":1}"#, &[]).is_empty());
        assert_eq!(
            diff(r#"{"a":1,"!a":1}"#, r#"{"a":3}"#, &[]),
            vec!["a -> Expected value: 1 But got: 3", "Field '!a' was FOUND"]
        );
    }

    #[test]
    fn test_negative_value_is_ignored() {
        assert_eq!(
            diff(r#"{"!a":"no such value"}"#, r#"{"a":1}"#, &[]),
            vec!["Field '!a' was FOUND"]
        );
    }

    #[test]
    fn test_escaped_negation() {
        assert!(diff(r#"{"\\!a":1}"#, r#"{"!a":1}"#, &[]).is_empty());
        assert_eq!(
            diff(r#"{"\\!a":1}"#, r#"{"a":1}"#, &[]),
            vec!["Field '\\!a' was NOT FOUND"]
        );
    }

    #[test]
    fn test_non_extensible() {
        assert_eq!(
            diff(
                r#"{"b":2,"a":0,"c":{"c1":"lorem1"}}"#,
                r#"{"a":1,"b":2,"c":{"c2":"lorem2","c1":"lorem1"},"x":0}"#,
                &[CompareMode::ObjectNonExtensible]
            ),
            vec![
                "a -> Expected value: 0 But got: 1",
                "c -> Actual JSON OBJECT has extra fields",
                "Actual JSON OBJECT has extra fields",
            ]
        );
    }

    #[test]
    fn test_non_extensible_single_diff_for_many_extra_fields() {
        let actual = r#"{"a":1,"x":1,"y":2,"z":3}"#;
        assert!(diff(r#"{"a":1}"#, actual, &[]).is_empty());
        assert_eq!(
            diff(r#"{"a":1}"#, actual, &[CompareMode::ObjectNonExtensible]),
            vec!["Actual JSON OBJECT has extra fields"]
        );
        assert!(diff(
            r#"{"a":1,".*":".*"}"#,
            r#"{"a":1,"x":1}"#,
            &[CompareMode::ObjectNonExtensible]
        )
        .is_empty());
        assert!(diff("{}", "{}", &[CompareMode::ObjectNonExtensible]).is_empty());
        assert_eq!(
            diff("{}", r#"{"a":1}"#, &[CompareMode::ObjectNonExtensible]),
            vec!["Actual JSON OBJECT has extra fields"]
        );
    }

    #[test]
    fn test_mixed_deep_path_and_fields() {
        let actual = json!({"a": {"b": [1, 2]}, "c": 3});
        let expected = json!({"c": 3, "#($.a.b[1])": 2});
        let modes = CompareModes::new();
        assert!(match_json(&expected, &actual, &DefaultJsonComparator, &modes).is_empty());

        let expected = json!({"c": 3, "#($.a.b[0])": 2});
        assert_eq!(
            match_json(&expected, &actual, &DefaultJsonComparator, &modes),
            vec!["Json path '$.a.b[0]' -> Expected value: 2 But got: 1"]
        );
    }
}
