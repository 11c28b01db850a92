//! Integration tests for the `template` command.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_template_prints_sample() {
    let env = TestEnv::new();

    let expected = "\
%YAML 1.2
---

pdb model : my_model.pdb

# New B factor (-1 for no reset)
reset b-facs : -1

cell dimensions : [200, 200, 200]

# Kind of B factor refinement
# One of: rigid, individual, group
refinement : individual
";

    env.command()
        .arg("template")
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn test_template_reads_schema_from_env() {
    let env = TestEnv::new();

    env.command_bare()
        .env("CONFSCHEMA_SCHEMA", &env.schema)
        .arg("template")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("%YAML 1.2\n---\n"));
}

#[test]
fn test_template_to_file_validates() {
    let env = TestEnv::new();
    let output = env.path().join("template.yml");

    env.command()
        .arg("template")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    env.command()
        .arg("--quiet")
        .arg("check")
        .arg("-c")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("refinement: individual"));
}

#[test]
fn test_template_without_schema() {
    let env = TestEnv::new();

    env.command_bare()
        .arg("template")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("ERROR"))
        .stderr(predicate::str::contains("--schema"));
}

#[test]
fn test_template_bad_schema() {
    let env = TestEnv::with_schema("count : [integer, 1, null]\n");

    env.command()
        .arg("template")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No such converter: 'integer'"));
}

#[test]
fn test_template_missing_schema_file() {
    let env = TestEnv::new();

    env.command_bare()
        .arg("--schema")
        .arg(env.path().join("absent.yml"))
        .arg("template")
        .assert()
        .code(5);
}
