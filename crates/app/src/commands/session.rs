//! Account and session commands

use std::time::Instant;

use inventaire_domain::Result;
use tracing::info;

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// Create a new account. Returns the new user identity.
pub async fn register_account(ctx: &AppContext, email: &str, password: &str) -> Result<String> {
    let start = Instant::now();
    let result = ctx.register(email, password).await;
    log_command_execution("session::register_account", start.elapsed(), result.as_ref().err());
    result
}

/// Authenticate and open a session with a live item feed.
pub async fn login(ctx: &mut AppContext, email: &str, password: &str) -> Result<()> {
    let start = Instant::now();
    let result = ctx.login(email, password).await;
    log_command_execution("session::login", start.elapsed(), result.as_ref().err());
    result
}

/// Close the current session. Safe to call when already logged out.
pub async fn logout(ctx: &mut AppContext) -> Result<()> {
    let start = Instant::now();
    ctx.logout().await;
    log_command_execution("session::logout", start.elapsed(), None);
    info!("logout complete");
    Ok(())
}
