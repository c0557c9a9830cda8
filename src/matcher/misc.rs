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

/// Longest rendering of a JSON element embedded in a diff line.
pub(crate) const CROP_LIMIT: usize = 1000;

pub(crate) trait Indent {
    fn indent(&self, level: u32) -> String;
}

impl<T> Indent for T
where
    T: ToString,
{
    fn indent(&self, level: u32) -> String {
        let mut indent = String::new();
        for _ in 0..level {
            indent.push(' ');
        }

        self.to_string()
            .lines()
            .map(|line| format!("{}{}", indent, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub(crate) trait Crop {
    fn crop(&self, limit: usize) -> String;
}

impl Crop for str {
    fn crop(&self, limit: usize) -> String {
        match self.char_indices().nth(limit) {
            Some((end, _)) => format!("{}...", &self[..end]),
            None => self.to_string(),
        }
    }
}

pub(crate) trait Indexes {
    fn indexes(&self) -> Vec<usize>;
}

impl<T> Indexes for [T] {
    fn indexes(&self) -> Vec<usize> {
        (0..self.len()).collect()
    }
}
