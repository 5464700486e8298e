use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Runs the CLI against an isolated app directory.
pub struct CliHarness {
    home: TempDir,
    server: Option<String>,
}

impl CliHarness {
    pub fn new(name: &str) -> Self {
        let home = tempfile::Builder::new()
            .prefix(&format!("annotatron-e2e-{}-", name))
            .tempdir()
            .expect("create temp app dir");
        Self { home, server: None }
    }

    pub fn with_server(mut self, url: impl Into<String>) -> Self {
        self.server = Some(url.into());
        self
    }

    pub fn app_dir(&self) -> PathBuf {
        self.home.path().to_path_buf()
    }

    pub fn run_cli(&self, args: &[&str]) -> Output {
        self.run_cli_with_env(args, &[])
    }

    pub fn run_cli_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_annotatron"));
        cmd.args(args)
            .env("ANNOTATRON_HOME", self.home.path())
            .env_remove("ANNOTATRON_SERVER")
            .env_remove("ANNOTATRON_PASSWORD")
            .env_remove("ANNOTATRON_LOG")
            .env_remove("RUST_LOG");
        if let Some(server) = &self.server {
            cmd.env("ANNOTATRON_SERVER", server);
        }
        for (key, value) in env {
            cmd.env(key, value);
        }
        cmd.output().expect("run annotatron binary")
    }
}

pub fn combined_output(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}
