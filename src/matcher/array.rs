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

use super::misc::Indexes;
use super::{deep_paths, render, CompareMode, Config, UseCase};
use serde_json::Value;
use std::mem::discriminant;
use tracing::trace;

/// Matches an expected array pattern against an actual array.
///
/// Each expected element searches the actual elements not yet consumed, or only its own
/// position under [`CompareMode::ArrayStrictOrder`]. An element whose match fails reports
/// a single difference: the differences of the failed attempts are not kept.
pub(super) fn match_array(
    expected: &[Value],
    actual: &Value,
    items: &[Value],
    config: Config<'_>,
) -> Vec<String> {
    let mut diffs = vec![];
    let mut consumed = vec![false; items.len()];
    let strict_order = config.has(CompareMode::ArrayStrictOrder);

    for (position, element) in expected.iter().enumerate() {
        if let Some(paths) = deep_paths(element) {
            for (expression, expected_value) in paths {
                config.diff_deep_path(expression, expected_value, actual, &mut diffs);
            }
            continue;
        }

        let (use_case, target) = UseCase::of_element(element);
        let candidates = if strict_order {
            match consumed.get(position) {
                Some(false) => vec![position],
                _ => vec![],
            }
        } else {
            items
                .indexes()
                .into_iter()
                .filter(|idx| !consumed[*idx])
                .collect()
        };
        trace!(position, %use_case, candidates = candidates.len(), "matching array element");

        let number = position + 1;
        match use_case {
            UseCase::Match => {
                let found = candidates
                    .iter()
                    .copied()
                    .find(|idx| config.diff(&target, &items[*idx]).is_empty());
                match found {
                    Some(idx) => consumed[idx] = true,
                    None if strict_order && !candidates.is_empty() => diffs.push(format!(
                        "JSON ARRAY elements differ at position {}:\n{}",
                        number,
                        render(element)
                    )),
                    None => diffs.push(format!(
                        "Expected element from position {} was NOT FOUND:\n{}",
                        number,
                        render(element)
                    )),
                }
            }
            UseCase::MatchAny => {
                match pick_any(&candidates, &expected[number..], items, config) {
                    Some(idx) => consumed[idx] = true,
                    None => diffs.push(format!(
                        "Expected condition of type {} from position {} was NOT MET. Actual Json Array has no extra elements:\n{}",
                        use_case,
                        number,
                        render(element)
                    )),
                }
            }
            UseCase::DoNotMatch => {
                let found = candidates.iter().any(|idx| {
                    let item = &items[*idx];
                    discriminant(&*target) == discriminant(item)
                        && config.diff(&target, item).is_empty()
                });
                if found {
                    diffs.push(format!(
                        "Expected element from position {} was FOUND:\n{}",
                        number,
                        render(element)
                    ));
                }
            }
            UseCase::DoNotMatchAny => diffs.push(format!(
                "Expected element from position {} was FOUND:\n{}",
                number,
                render(element)
            )),
        }
    }

    if config.has(CompareMode::ArrayNonExtensible) && expected.len() < items.len() {
        diffs.push("Actual JSON ARRAY has extra elements".to_string());
    }

    diffs
}

/// Picks the candidate a wildcard element consumes: the first one no later plain element
/// of the same pattern matches, or else the first one.
fn pick_any(
    candidates: &[usize],
    remaining: &[Value],
    items: &[Value],
    config: Config<'_>,
) -> Option<usize> {
    let later = remaining
        .iter()
        .filter(|element| deep_paths(element).is_none())
        .filter(|element| UseCase::of_element(element).0 == UseCase::Match)
        .collect::<Vec<_>>();

    candidates
        .iter()
        .copied()
        .find(|idx| {
            later
                .iter()
                .all(|element| !config.diff(element, &items[*idx]).is_empty())
        })
        .or_else(|| candidates.first().copied())
}
