//! `annotatron status` command implementation

use anyhow::Result;

use super::Context;
use crate::session::{is_authenticated, TOKEN_KEY};

pub fn run(ctx: &Context) -> Result<()> {
    let store = ctx.store();

    println!("Server:  {}", ctx.config.server_url);
    println!("Session: {}", store.path().display());

    if is_authenticated(&store)? {
        match store.updated_at(TOKEN_KEY)? {
            Some(at) => println!("✓ Logged in (token saved {})", at.format("%Y-%m-%d %H:%M:%S UTC")),
            None => println!("✓ Logged in"),
        }
    } else {
        println!("Not logged in.");
    }
    Ok(())
}
