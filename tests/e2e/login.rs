use httpmock::prelude::*;
use serde_json::json;

use crate::harness::{combined_output, CliHarness};

fn mock_annotatron(server: &MockServer, status: u16, username: &str) {
    server.mock(|when, then| {
        when.method(POST).path("/annotatron/v1/auth/token");
        then.status(status).json_body(json!({"token": "tok123"}));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/annotatron/v1/control/user")
            .header("authorization", "Token tok123");
        then.status(200).json_body(json!({
            "username": username,
            "is_superuser": false,
            "is_staff": true
        }));
    });
}

#[test]
fn test_cli_login_whoami_logout() {
    let server = MockServer::start();
    mock_annotatron(&server, 200, "alice");
    let h = CliHarness::new("login_flow").with_server(server.url("/annotatron"));

    let login = h.run_cli_with_env(&["login", "alice"], &[("ANNOTATRON_PASSWORD", "secret")]);
    let combined = combined_output(&login);
    assert!(login.status.success(), "login failed:\n{}", combined);
    assert!(combined.contains("[2/5] Saving token"), "{}", combined);
    assert!(combined.contains("[3/5] Testing"), "{}", combined);
    assert!(combined.contains("Logged in as alice (staff)"), "{}", combined);

    let status = h.run_cli(&["status"]);
    assert!(String::from_utf8_lossy(&status.stdout).contains("Logged in"));

    let whoami = h.run_cli(&["whoami"]);
    assert!(whoami.status.success(), "{}", combined_output(&whoami));
    assert_eq!(String::from_utf8_lossy(&whoami.stdout).trim(), "alice (staff)");

    let logout = h.run_cli(&["logout"]);
    assert!(String::from_utf8_lossy(&logout.stdout).contains("Logged out"));
    assert!(!h.run_cli(&["whoami"]).status.success());
}

#[test]
fn test_cli_login_bad_status() {
    let server = MockServer::start();
    mock_annotatron(&server, 500, "alice");
    let h = CliHarness::new("login_500").with_server(server.url("/annotatron"));

    let output = h.run_cli(&["login", "alice", "--password", "secret"]);
    let combined = combined_output(&output);
    assert!(!output.status.success());
    assert!(combined.contains("Internal error: bad status code 500"), "{}", combined);
    assert!(combined.contains("rejected by server (HTTP 500)"), "{}", combined);
    assert!(!h.app_dir().join("session.json").exists());
}

#[test]
fn test_cli_login_bad_status_propagate_policy() {
    let server = MockServer::start();
    mock_annotatron(&server, 500, "alice");
    let h = CliHarness::new("login_500_propagate").with_server(server.url("/annotatron"));
    std::fs::write(
        h.app_dir().join("config.toml"),
        "bad_status_policy = \"propagate\"\n",
    )
    .unwrap();

    let output = h.run_cli(&["login", "alice", "--password", "secret"]);
    let combined = combined_output(&output);
    assert!(!output.status.success());
    assert!(combined.contains("Internal error: bad status code 500"), "{}", combined);
    assert!(combined.contains("login failed"), "{}", combined);
    assert!(!combined.contains("rejected by server"), "{}", combined);
}

#[test]
fn test_cli_login_identity_mismatch() {
    let server = MockServer::start();
    mock_annotatron(&server, 200, "bob");
    let h = CliHarness::new("login_mismatch").with_server(server.url("/annotatron"));

    let output = h.run_cli(&["login", "alice", "--password", "secret"]);
    let combined = combined_output(&output);
    assert!(!output.status.success());
    assert!(combined.contains("Problem: security issue"), "{}", combined);
    // The token written before the identity check stays behind.
    assert!(h.app_dir().join("session.json").exists());
}
