//! `annotatron login` command implementation

use std::io::{self, IsTerminal, Write};

use anyhow::{bail, Context as _, Result};
use clap::Args;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tokio::sync::broadcast::error::RecvError;

use super::Context;
use crate::auth::{AuthOutcome, AuthenticationChanged, Credentials, Sequencer};
use crate::session::{EventBus, Progress};

#[derive(Args)]
pub struct LoginArgs {
    /// Username to log in as
    username: String,

    /// Password (prompted for when omitted)
    #[arg(long, env = "ANNOTATRON_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

pub async fn run(ctx: &Context, args: LoginArgs) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_password()?,
    };
    let credentials = Credentials::new(args.username, password);

    let sequencer = Sequencer::new(ctx.exchange()?, ctx.store())
        .with_policy(ctx.config.bad_status_policy);

    println!("Logging in to {}", ctx.config.server_url);

    let progress = EventBus::progress();
    let identity = EventBus::authentication_changed();
    let printer = tokio::spawn(print_progress(progress.subscribe()));
    let mut identity_rx = identity.subscribe();

    let result = sequencer
        .authenticate(&credentials, &progress, &identity)
        .await;

    // Dropping the bus closes the channel and ends the printer.
    drop(progress);
    printer.await?;

    match result.context("login failed")? {
        AuthOutcome::Authenticated(role) => {
            // The identity channel is the source of truth for the role shown.
            let announced = match identity_rx.try_recv() {
                Ok(AuthenticationChanged { authenticated }) => authenticated,
                Err(err) => {
                    tracing::warn!(error = %err, "no identity change announced");
                    role
                }
            };
            println!();
            println!("✓ Logged in as {} ({})", credentials.username, announced);
            Ok(())
        }
        AuthOutcome::Rejected { status } => {
            bail!("login rejected by server (HTTP {})", status)
        }
    }
}

async fn print_progress(mut rx: tokio::sync::broadcast::Receiver<Progress>) {
    loop {
        match rx.recv().await {
            Ok(event @ Progress::Failure { .. }) => eprintln!("  {}", event),
            Ok(event) => println!("  {}", event),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "progress printer fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn prompt_password() -> Result<String> {
    print!("Password: ");
    io::stdout().flush()?;

    let password = if io::stdin().is_terminal() {
        read_hidden()?
    } else {
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_string()
    };
    if password.is_empty() {
        bail!("no password given");
    }
    Ok(password)
}

/// Read a line from the terminal in raw mode so nothing is echoed.
fn read_hidden() -> Result<String> {
    terminal::enable_raw_mode()?;
    let result = read_hidden_keys();
    terminal::disable_raw_mode()?;
    println!();
    result
}

fn read_hidden_keys() -> Result<String> {
    let mut buffer = String::new();
    loop {
        if let Event::Key(key) = event::read()? {
            match apply_key(&mut buffer, key) {
                KeyStep::Continue => {}
                KeyStep::Done => return Ok(buffer),
                KeyStep::Cancelled => bail!("password prompt cancelled"),
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KeyStep {
    Continue,
    Done,
    Cancelled,
}

fn apply_key(buffer: &mut String, key: KeyEvent) -> KeyStep {
    if key.kind == KeyEventKind::Release {
        return KeyStep::Continue;
    }
    match key.code {
        KeyCode::Enter => KeyStep::Done,
        KeyCode::Esc => KeyStep::Cancelled,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            KeyStep::Cancelled
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            KeyStep::Continue
        }
        KeyCode::Backspace => {
            buffer.pop();
            KeyStep::Continue
        }
        _ => KeyStep::Continue,
    }
}
