use crate::harness::{combined_output, CliHarness};

#[test]
fn test_cli_whoami_requires_login() {
    let h = CliHarness::new("whoami_out");

    let output = h.run_cli(&["whoami"]);
    assert!(!output.status.success(), "whoami should fail without a session");

    let combined = combined_output(&output);
    assert!(
        combined.contains("Not logged in"),
        "expected a hint to log in.\n{}",
        combined
    );
}

#[test]
fn test_cli_login_unreachable_server() {
    let h = CliHarness::new("login_unreachable").with_server("http://127.0.0.1:9/annotatron/");

    let output = h.run_cli(&["login", "alice", "--password", "secret"]);
    assert!(!output.status.success());

    let combined = combined_output(&output);
    assert!(combined.contains("Authenticating..."), "{}", combined);
    assert!(combined.contains("Problem:"), "{}", combined);
    assert!(!h.app_dir().join("session.json").exists());
}

#[test]
fn test_cli_login_invalid_server_url() {
    let h = CliHarness::new("login_bad_url").with_server("not a url");

    let output = h.run_cli(&["login", "alice", "--password", "secret"]);
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("invalid server URL"));
}
