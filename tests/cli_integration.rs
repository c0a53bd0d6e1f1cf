mod util;

use assert_cmd::Command;
use std::path::Path;

fn wallet_cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("wallet-cli").unwrap();
    cmd.env_remove("COLD_WALLET_PASSPHRASE")
        .env_remove("RUST_LOG")
        .arg("--home")
        .arg(home);
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn test_cli_create_prints_twelve_words() {
    let home = util::temp_home();
    let out = stdout_of(wallet_cli(home.path()).arg("create").arg("pw"));
    assert_eq!(out.trim().split(' ').count(), 12);
}

#[test]
fn test_cli_create_twice_fails_without_force() {
    let home = util::temp_home();
    wallet_cli(home.path()).args(["create", "pw"]).assert().success();

    let assert = wallet_cli(home.path()).args(["create", "pw"]).assert().failure().code(1);
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("wallet already exists"));

    wallet_cli(home.path()).args(["create", "pw", "--force"]).assert().success();
}

#[test]
fn test_cli_import_backup_and_export() {
    let home = util::temp_home();
    wallet_cli(home.path())
        .args(["import", util::PHRASE_A, "pw"])
        .assert()
        .success();

    let backup = stdout_of(wallet_cli(home.path()).args(["backup", "pw"]));
    assert_eq!(backup.trim(), util::PHRASE_A);

    let export = stdout_of(wallet_cli(home.path()).args(["e", "pw"]));
    assert!(export.contains("\n    \"main:BTC\": \"xpub"));
    let parsed: std::collections::BTreeMap<String, String> = serde_json::from_str(&export).unwrap();
    assert!(parsed["test:ETH"].starts_with("tpub"));
}

#[test]
fn test_cli_wrong_passphrase() {
    let home = util::temp_home();
    wallet_cli(home.path()).args(["import", util::PHRASE_B, "pw"]).assert().success();

    let assert = wallet_cli(home.path()).args(["export", "nope"]).assert().failure();
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("wrong password"));
}

#[test]
fn test_cli_passphrase_from_env_and_stdin() {
    let home = util::temp_home();
    wallet_cli(home.path())
        .env("COLD_WALLET_PASSPHRASE", "from-env")
        .args(["import", util::PHRASE_A])
        .assert()
        .success();

    let backup = stdout_of(wallet_cli(home.path()).arg("backup").write_stdin("from-env\n"));
    assert_eq!(backup.trim(), util::PHRASE_A);
}

#[test]
fn test_cli_status() {
    let home = util::temp_home();
    let before = stdout_of(wallet_cli(home.path()).arg("status"));
    assert_eq!(before.trim(), "absent");

    wallet_cli(home.path()).args(["c", "pw"]).assert().success();
    let after = stdout_of(wallet_cli(home.path()).arg("status"));
    assert_eq!(after.trim(), "present");
}

#[test]
fn test_cli_rejects_short_phrase() {
    let home = util::temp_home();
    let assert = wallet_cli(home.path())
        .args(["restore", "abandon abandon about", "pw"])
        .assert()
        .failure();
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("Invalid seed phrase"));
}

#[test]
fn test_cli_home_from_env() {
    let home = util::temp_home();
    let mut cmd = Command::cargo_bin("wallet-cli").unwrap();
    cmd.env_remove("COLD_WALLET_PASSPHRASE")
        .env_remove("RUST_LOG")
        .env("COLD_WALLET_HOME", home.path())
        .args(["create", "pw"])
        .assert()
        .success();

    assert!(home.path().join("main.db").exists());
    let status = stdout_of(wallet_cli(home.path()).arg("status"));
    assert_eq!(status.trim(), "present");
}
