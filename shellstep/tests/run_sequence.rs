//! Library-level tests for multi-script sequencing.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use shellstep::config::RunConfig;
use shellstep::logging::Redactor;
use shellstep::run::{RunOutcome, run};
use shellstep::test_support::{StaticSharedState, TestUi};

fn write_script(path: &Path, body: &str) {
    fs::write(path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    fs::set_permissions(path, fs::Permissions::from_mode(0o700)).expect("chmod script");
}

#[test]
fn scripts_run_in_configured_order() {
    let temp = tempfile::tempdir().expect("tempdir");
    let log = temp.path().join("order.log");
    let first = temp.path().join("first.sh");
    let second = temp.path().join("second.sh");
    write_script(&first, &format!("echo first >> {}", log.display()));
    write_script(&second, &format!("echo second >> {}", log.display()));

    let config = RunConfig {
        scripts: vec![first, second],
        ..RunConfig::default()
    };
    let ui = TestUi::new();

    let outcome = run(&config, &ui, &StaticSharedState::new(), &Redactor::new()).expect("run");
    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(
        fs::read_to_string(&log).expect("read log"),
        "first\nsecond\n"
    );

    let messages = ui.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("first.sh"));
    assert!(messages[1].contains("second.sh"));
}

#[test]
fn declared_env_reaches_every_script() {
    let temp = tempfile::tempdir().expect("tempdir");
    let first_out = temp.path().join("first.txt");
    let second_out = temp.path().join("second.txt");
    let first = temp.path().join("first.sh");
    let second = temp.path().join("second.sh");
    write_script(&first, &format!("printf '%s' \"$GREETING\" > {}", first_out.display()));
    write_script(&second, &format!("printf '%s' \"$GREETING\" > {}", second_out.display()));

    let config = RunConfig {
        scripts: vec![first, second],
        env: vec!["GREETING=hello".to_string()],
        ..RunConfig::default()
    };
    let ui = TestUi::new();

    run(&config, &ui, &StaticSharedState::new(), &Redactor::new()).expect("run");
    assert_eq!(fs::read_to_string(&first_out).expect("read"), "hello");
    assert_eq!(fs::read_to_string(&second_out).expect("read"), "hello");
}

#[test]
fn quoted_value_survives_the_shell_round_trip() {
    let temp = tempfile::tempdir().expect("tempdir");
    let out = temp.path().join("value.txt");
    let script = temp.path().join("dump.sh");
    write_script(&script, &format!("printf '%s' \"$FOO\" > {}", out.display()));

    let config = RunConfig {
        scripts: vec![script],
        env: vec!["FOO=bar'baz".to_string()],
        ..RunConfig::default()
    };
    let ui = TestUi::new();

    run(&config, &ui, &StaticSharedState::new(), &Redactor::new()).expect("run");
    assert_eq!(fs::read_to_string(&out).expect("read"), "bar'baz");
}

#[test]
fn timeout_aborts_a_hanging_script() {
    let temp = tempfile::tempdir().expect("tempdir");
    let script = temp.path().join("hang.sh");
    write_script(&script, "sleep 5");

    let config = RunConfig {
        scripts: vec![script.clone()],
        timeout_secs: Some(1),
        ..RunConfig::default()
    };
    let ui = TestUi::new();

    let err = run(&config, &ui, &StaticSharedState::new(), &Redactor::new()).unwrap_err();
    assert!(format!("{err:#}").contains(&script.display().to_string()));
}
