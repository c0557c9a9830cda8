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

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use json_compare::{AssertionError, CompareMode, JsonCompare};

#[doc(hidden)]
#[macro_export]
macro_rules! handle_error {
    ($code:expr, $msg:expr, $($arg:tt)*) => {
        eprintln!($msg, $($arg)*);
        std::process::exit($code);
    };

    ($code:expr, $msg:expr) => {
        eprintln!($msg);
        std::process::exit($code);
    };
}

#[doc(hidden)]
struct Code;

impl Code {
    const SUCCESS: i32 = 0;
    const INTERNAL_ERROR: i32 = 1;
    const INVALID_ARGUMENT: i32 = 2;
    const CONVERSION_ERROR: i32 = 3;
    const ASSERTION_ERROR: i32 = 4;
}

#[doc(hidden)]
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    ObjectNonExtensible,
    ArrayNonExtensible,
    ArrayStrictOrder,
}

impl From<Mode> for CompareMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::ObjectNonExtensible => CompareMode::ObjectNonExtensible,
            Mode::ArrayNonExtensible => CompareMode::ArrayNonExtensible,
            Mode::ArrayStrictOrder => CompareMode::ArrayStrictOrder,
        }
    }
}

#[doc(hidden)]
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// File with the expected JSON pattern
    expected: PathBuf,

    /// File with the actual JSON, `-` reads standard input
    actual: PathBuf,

    /// Compare modes to enable
    #[clap(short, long, value_enum)]
    mode: Vec<Mode>,

    /// Succeed only when the actual JSON does NOT match the pattern
    #[clap(long)]
    not: bool,

    /// Message appended to the failure report
    #[clap(long)]
    message: Option<String>,
}

fn read_input(path: &Path) -> io::Result<String> {
    if path == Path::new("-") {
        return io::read_to_string(io::stdin());
    }
    fs::read_to_string(path)
}

#[doc(hidden)]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.expected == Path::new("-") && cli.actual == Path::new("-") {
        handle_error!(
            Code::INVALID_ARGUMENT,
            "Error: only one of the documents can be read from standard input"
        );
    }

    let expected = match read_input(&cli.expected) {
        Ok(text) => text,
        Err(err) => {
            handle_error!(
                Code::INTERNAL_ERROR,
                "Error reading {}: {}",
                cli.expected.display(),
                err
            );
        }
    };
    let actual = match read_input(&cli.actual) {
        Ok(text) => text,
        Err(err) => {
            handle_error!(
                Code::INTERNAL_ERROR,
                "Error reading {}: {}",
                cli.actual.display(),
                err
            );
        }
    };

    let mut json_compare = JsonCompare::new().with_modes(cli.mode.iter().copied().map(CompareMode::from));
    if let Some(message) = cli.message.as_deref() {
        json_compare = json_compare.with_message(message);
    }
    debug!(modes = ?cli.mode, negate = cli.not, "comparing documents");

    let result = match cli.not {
        true => json_compare.assert_not_matches(&expected, &actual),
        false => json_compare.assert_matches(&expected, &actual),
    };

    match result {
        Ok(()) => {
            println!("JSON documents {}", if cli.not { "differ" } else { "match" });
            std::process::exit(Code::SUCCESS);
        }
        Err(err) => match err {
            AssertionError::Conversion(err) => {
                handle_error!(Code::CONVERSION_ERROR, "Error: {}", err);
            }
            AssertionError::Mismatch { .. } | AssertionError::Equal { .. } => {
                handle_error!(Code::ASSERTION_ERROR, "{}", err);
            }
        },
    }
}
