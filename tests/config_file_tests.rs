//! Silent installations driven by a JSON configuration file

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::TestSetup;

#[allow(deprecated)]
fn installer_cmd() -> Command {
    Command::cargo_bin("mcwrap-installer").unwrap()
}

#[test]
fn test_config_file_drives_whole_install() {
    let setup = TestSetup::new();
    let install_path = setup.install_path("from-config");
    let config = setup.write_config(
        "install.json",
        &format!(
            r#"{{
                "install_path": "{}",
                "accept_license": true,
                "create_shortcuts": false,
                "install_service": false,
                "components": {{"examples": true}}
            }}"#,
            install_path.display()
        ),
    );

    installer_cmd()
        .env("MCWRAP_PAYLOAD_DIR", &setup.payload)
        .args(["--silent", "--config-file"])
        .arg(&config)
        .assert()
        .success();

    assert!(install_path.join("server.js").exists());
    assert!(
        install_path
            .join("examples/server.properties.example")
            .exists()
    );
    // Disabled via config
    assert!(!install_path.join("install-service.sh").exists());
    assert!(!install_path.join("install-service.bat").exists());
}

#[test]
fn test_cli_path_overrides_config_path() {
    let setup = TestSetup::new();
    let config_target = setup.install_path("config-target");
    let flag_target = setup.install_path("flag-target");
    let config = setup.write_config(
        "install.json",
        &format!(
            r#"{{"install_path": "{}", "accept_license": true}}"#,
            config_target.display()
        ),
    );

    installer_cmd()
        .env("MCWRAP_PAYLOAD_DIR", &setup.payload)
        .args(["--silent", "--no-shortcuts", "--no-service", "--config-file"])
        .arg(&config)
        .arg("--install-path")
        .arg(&flag_target)
        .assert()
        .success();

    assert!(flag_target.join("server.js").exists());
    assert!(!config_target.exists());
}

#[test]
fn test_license_accepted_in_config_file() {
    let setup = TestSetup::new();
    let install_path = setup.install_path("mcwrap");
    let config = setup.write_config(
        "install.json",
        &format!(
            r#"{{"install_path": "{}", "accept_license": true, "create_shortcuts": false, "install_service": false}}"#,
            install_path.display()
        ),
    );

    installer_cmd()
        .env("MCWRAP_PAYLOAD_DIR", &setup.payload)
        .args(["--silent", "--config-file"])
        .arg(&config)
        .assert()
        .success();

    assert!(install_path.join("install_info.json").exists());
}

#[test]
fn test_malformed_config_file_aborts_before_install() {
    let setup = TestSetup::new();
    let install_path = setup.install_path("mcwrap");
    let config = setup.write_config("broken.json", "{this is not json");

    installer_cmd()
        .env("MCWRAP_PAYLOAD_DIR", &setup.payload)
        .args(["--silent", "--accept-license", "--config-file"])
        .arg(&config)
        .arg("--install-path")
        .arg(&install_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse configuration file"));

    assert!(!install_path.exists());
}

#[test]
fn test_missing_config_file_aborts() {
    let setup = TestSetup::new();

    installer_cmd()
        .env("MCWRAP_PAYLOAD_DIR", &setup.payload)
        .args(["--silent", "--accept-license", "--config-file"])
        .arg(setup.temp.path().join("absent.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read configuration file"));
}

#[test]
fn test_unknown_config_keys_are_ignored() {
    let setup = TestSetup::new();
    let install_path = setup.install_path("mcwrap");
    let config = setup.write_config(
        "install.json",
        &format!(
            r#"{{"install_path": "{}", "accept_license": true, "create_shortcuts": false, "install_service": false, "future_option": 42}}"#,
            install_path.display()
        ),
    );

    installer_cmd()
        .env("MCWRAP_PAYLOAD_DIR", &setup.payload)
        .args(["--silent", "--config-file"])
        .arg(&config)
        .assert()
        .success();

    assert!(install_path.join("server.js").exists());
}
