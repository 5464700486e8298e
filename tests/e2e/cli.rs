use crate::harness::CliHarness;

#[test]
fn test_cli_status_when_logged_out() {
    let h = CliHarness::new("status_out");

    let output = h.run_cli(&["status"]);
    assert!(
        output.status.success(),
        "annotatron status failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("http://localhost:8000/annotatron/"), "{}", stdout);
    assert!(stdout.contains("Not logged in."), "{}", stdout);
}

#[test]
fn test_cli_status_uses_config_file() {
    let h = CliHarness::new("status_config");
    std::fs::write(
        h.app_dir().join("config.toml"),
        "server_url = \"https://annotatron.example.org/annotatron/\"\n",
    )
    .unwrap();

    let output = h.run_cli(&["status"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("https://annotatron.example.org/annotatron/"),
        "{}",
        stdout
    );
}

#[test]
fn test_cli_logout_without_session() {
    let h = CliHarness::new("logout_noop");

    let output = h.run_cli(&["logout"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Not logged in."));
}

#[test]
fn test_cli_completion_bash() {
    let h = CliHarness::new("completion");

    let output = h.run_cli(&["completion", "bash"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("annotatron"));
}
