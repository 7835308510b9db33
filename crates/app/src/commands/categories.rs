//! Category management commands

use std::time::Instant;

use inventaire_core::RenameOutcome;
use inventaire_domain::Result;

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// Current category set, in stored order.
pub fn list_categories(ctx: &AppContext) -> Result<Vec<String>> {
    Ok(ctx.session()?.controller.categories().to_vec())
}

pub async fn add_category(ctx: &mut AppContext, name: &str) -> Result<()> {
    let start = Instant::now();
    let result = ctx.session_mut()?.controller.add_category(name).await;
    log_command_execution("categories::add_category", start.elapsed(), result.as_ref().err());
    result
}

/// Rename a category, cascading onto owned items. The outcome reports how
/// many items were rewritten, skipped as foreign, or failed.
pub async fn rename_category(
    ctx: &mut AppContext,
    old_name: &str,
    new_name: &str,
) -> Result<RenameOutcome> {
    let start = Instant::now();
    let result = async {
        let session = ctx.session_mut()?;
        let items = session.items();
        session.controller.rename_category(old_name, new_name, &items).await
    }
    .await;
    log_command_execution("categories::rename_category", start.elapsed(), result.as_ref().err());
    result
}

/// Delete a category, refused while any owned item still uses it.
pub async fn delete_category(ctx: &mut AppContext, name: &str) -> Result<()> {
    let start = Instant::now();
    let result = async {
        let session = ctx.session_mut()?;
        let items = session.items();
        session.controller.delete_category(name, &items).await
    }
    .await;
    log_command_execution("categories::delete_category", start.elapsed(), result.as_ref().err());
    result
}
