//! Command-line interface

mod completion;
mod login;
mod logout;
mod status;
mod whoami;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

use crate::auth::HttpCredentialExchange;
use crate::config::{self, Config};
use crate::session::FileSessionStore;

pub use completion::CompletionArgs;
pub use login::LoginArgs;

#[derive(Parser)]
#[command(name = "annotatron", version, about = "Command-line client for Annotatron")]
pub struct Cli {
    /// Annotatron API base URL (overrides config.toml)
    #[arg(long, global = true, env = "ANNOTATRON_SERVER")]
    pub server: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store a session token
    Login(LoginArgs),
    /// Forget the stored session token
    Logout,
    /// Show who the stored session token belongs to
    Whoami,
    /// Show the configured server and whether a session is stored
    Status,
    /// Print shell completions
    Completion(CompletionArgs),
}

/// Resolved configuration shared by every command.
pub struct Context {
    pub app_dir: PathBuf,
    pub config: Config,
}

impl Context {
    pub fn load(server: Option<String>) -> Result<Self> {
        let app_dir = config::app_dir()?;
        let mut config = Config::load(&app_dir)?;
        if let Some(server) = server {
            config.server_url = server;
        }
        Ok(Self { app_dir, config })
    }

    pub fn store(&self) -> FileSessionStore {
        FileSessionStore::new(&self.app_dir)
    }

    pub fn exchange(&self) -> Result<HttpCredentialExchange> {
        HttpCredentialExchange::new(&self.config.server_url, self.config.timeout())
            .with_context(|| format!("cannot reach server at {}", self.config.server_url))
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let server = cli.server;
    match cli.command {
        Commands::Login(args) => login::run(&Context::load(server)?, args).await,
        Commands::Logout => logout::run(&Context::load(server)?),
        Commands::Whoami => whoami::run(&Context::load(server)?).await,
        Commands::Status => status::run(&Context::load(server)?),
        Commands::Completion(args) => completion::run(args),
    }
}
