//! `annotatron whoami` command implementation

use anyhow::{bail, Context as _, Result};

use super::Context;
use crate::auth::{resolve_role, CredentialExchange, SessionToken};
use crate::session::{SessionStore, TOKEN_KEY};

pub async fn run(ctx: &Context) -> Result<()> {
    let Some(token) = ctx.store().get(TOKEN_KEY)?.filter(|t| !t.is_empty()) else {
        bail!("Not logged in. Run 'annotatron login <username>' first.");
    };

    let identity = ctx
        .exchange()?
        .check_identity(&SessionToken::new(token))
        .await
        .context("stored session was not accepted; log in again")?;

    println!("{} ({})", identity.username, resolve_role(&identity));
    Ok(())
}
