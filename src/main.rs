use anyhow::Result;
use clap::Parser;

use annotatron_client::cli::{self, Cli};
use annotatron_client::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    cli::run(cli).await
}
