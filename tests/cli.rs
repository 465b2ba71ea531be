// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Integration tests for the jsonpath-compile binary

#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;

fn cli() -> Command {
    Command::cargo_bin("jsonpath-compile").unwrap()
}

#[test]
fn test_parse_prints_canonical_text() {
    cli()
        .args(["parse", "--quiet", "--format", "text", "$.store.book [0]"])
        .assert()
        .success()
        .stdout("$.store.book[0]\n");
}

#[test]
fn test_parse_prints_debug_tree() {
    cli()
        .args(["parse", "a|b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Union"))
        .stderr(predicate::str::contains("Expression: a|b"));
}

#[test]
fn test_parse_json_output() {
    let output = cli()
        .args(["parse", "-q", "-f", "json", "$"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json, serde_json::json!("Root"));
}

#[test]
fn test_parse_reads_stdin() {
    cli()
        .args(["parse", "-q", "-f", "text"])
        .write_stdin("a where `this`\n")
        .assert()
        .success()
        .stdout("a where `this`\n");
}

#[test]
fn test_parse_error_exits_with_diagnostic() {
    cli()
        .args(["parse", "$."])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("JP0002"))
        .stderr(predicate::str::contains("   1 | $."));
}

#[test]
fn test_validate() {
    cli()
        .args(["validate", "--quiet", "$..a[1:2]"])
        .assert()
        .success()
        .stdout("VALID\n");

    cli()
        .args(["validate", "--quiet", "`nope`"])
        .assert()
        .failure()
        .stderr("INVALID\n");
}

#[test]
fn test_max_depth_flag() {
    cli()
        .args(["--max-depth", "2", "validate", "((a))"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nesting exceeds the limit of 2"));
}

#[test]
fn test_tokens_lists_kinds() {
    cli()
        .args(["tokens", "$.a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'$'"))
        .stdout(predicate::str::contains("ID"))
        .stdout(predicate::str::contains("1:3"));
}
