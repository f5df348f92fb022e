use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

const CONFIG: &str = r#"
[log]
level = "warn"

[[subscriptions]]
event = "ws:incomingMessage -> 500"
label = "inbox"

[[subscriptions]]
event = "ws:incomingMessage"
label = "audit"
"#;

/// A `relay` command wired to a config file in a fresh directory.
fn relay_cmd(config: &str) -> (assert_cmd::Command, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("relay.toml");
    fs::write(&path, config).expect("write config");

    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("relay");
    cmd.timeout(Duration::from_secs(15));
    cmd.env_remove("RUST_LOG");
    cmd.arg("--config").arg(&path);
    (cmd, dir)
}

#[test]
fn trigger_reaches_plain_listeners_before_ports() {
    let (mut cmd, _dir) = relay_cmd(CONFIG);
    cmd.write_stdin("trigger WS:IncomingMessage | {\"author\": \"Roman\"}\n")
        .assert()
        .success()
        .stdout(
            "audit\tws:incomingmessage\t[{\"author\":\"Roman\"}]\n\
             inbox\tws:incomingmessage\t[{\"author\":\"Roman\"}]\n",
        );
}

#[test]
fn script_file_and_removals() {
    let (mut cmd, dir) = relay_cmd(CONFIG);
    let script = dir.path().join("session.relay");
    fs::write(
        &script,
        "# a port suffix still fires the whole event\n\
         trigger ws:incomingMessage -> 500 | 1\n\
         off ws:incomingMessage\n\
         trigger ws:incomingMessage | 2\n\
         off-port ws:incomingMessage -> 500\n\
         trigger ws:incomingMessage | 3\n",
    )
    .expect("write script");

    cmd.arg("--script")
        .arg(&script)
        .assert()
        .success()
        .stdout(
            "audit\tws:incomingmessage\t[1]\n\
             inbox\tws:incomingmessage\t[1]\n\
             inbox\tws:incomingmessage\t[2]\n",
        );
}

#[test]
fn malformed_line_fails_with_its_number() {
    let (mut cmd, _dir) = relay_cmd(CONFIG);
    cmd.write_stdin("trigger ws:incomingMessage\nexplode now\n")
        .assert()
        .failure()
        .stderr(contains("line 2"))
        .stdout("");
}

#[test]
fn environment_enables_unhandled_warnings() {
    let (mut cmd, _dir) = relay_cmd(CONFIG);
    cmd.env("RELAY__NOTIFIER__WARN_UNHANDLED", "true")
        .write_stdin("trigger nobody-listens\n")
        .assert()
        .success()
        .stdout("")
        .stderr(contains("Event fired with no listeners"));
}

#[test]
fn environment_overrides_the_file_level() {
    let (mut cmd, _dir) = relay_cmd(CONFIG);
    cmd.env("RELAY__NOTIFIER__WARN_UNHANDLED", "true")
        .env("RELAY__LOG__LEVEL", "error")
        .write_stdin("trigger nobody-listens\n")
        .assert()
        .success()
        .stderr(contains("Event fired with no listeners").not());
}

#[test]
fn missing_config_file_is_fatal() {
    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("relay");
    cmd.arg("--config")
        .arg("/definitely/not/here.toml")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(contains("Configuration is malformed"));
}
