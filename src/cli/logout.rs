//! `annotatron logout` command implementation

use anyhow::Result;

use super::Context;
use crate::session::{SessionStore, TOKEN_KEY};

pub fn run(ctx: &Context) -> Result<()> {
    let store = ctx.store();
    if store.remove(TOKEN_KEY)? {
        println!("✓ Logged out");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}
