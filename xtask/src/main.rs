//! Development tasks: `cargo xtask docs [--output PATH]`

use std::fs;
use std::path::PathBuf;

use annotatron_client::cli::Cli;
use clap::{Parser, Subcommand};

#[derive(Parser)]
struct Xtask {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Write the CLI reference as markdown
    Docs {
        #[arg(long, default_value = "docs/cli-reference.md")]
        output: PathBuf,
    },
}

fn main() -> std::io::Result<()> {
    match Xtask::parse().task {
        Task::Docs { output } => {
            let markdown = clap_markdown::help_markdown::<Cli>();
            if let Some(dir) = output.parent() {
                fs::create_dir_all(dir)?;
            }
            fs::write(&output, markdown)?;
            println!("wrote {}", output.display());
        }
    }
    Ok(())
}
