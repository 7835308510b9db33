//! Item list and edit commands

use std::time::Instant;

use inventaire_domain::{InventaireError, Item, ItemDraft, Location, Result};
use serde::Serialize;

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// One rendered frame, owned and serializable for the UI layer
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub rows: Vec<Item>,
    pub team_leader_options: Vec<String>,
}

/// Render the current tab: visible rows plus the derived leader options.
pub fn render_frame(ctx: &mut AppContext) -> Result<Frame> {
    let start = Instant::now();
    let result = do_render(ctx);
    log_command_execution("items::render_frame", start.elapsed(), result.as_ref().err());
    result
}

fn do_render(ctx: &mut AppContext) -> Result<Frame> {
    let session = ctx.session_mut()?;
    let items = session.items();
    let view = session.controller.render(&items);
    Ok(Frame {
        rows: view.rows.into_iter().cloned().collect(),
        team_leader_options: view.team_leader_options,
    })
}

/// Switch between the chantier and atelier tabs.
pub fn set_active_tab(ctx: &mut AppContext, tab: Location) -> Result<()> {
    ctx.session_mut()?.controller.set_active_tab(tab);
    Ok(())
}

/// `None` means "All".
pub fn set_category_filter(ctx: &mut AppContext, category: Option<String>) -> Result<()> {
    ctx.session_mut()?.controller.set_category_filter(category);
    Ok(())
}

/// `None` means "All".
pub fn set_team_leader_filter(ctx: &mut AppContext, team_leader: Option<String>) -> Result<()> {
    ctx.session_mut()?.controller.set_team_leader_filter(team_leader);
    Ok(())
}

pub fn set_search(ctx: &mut AppContext, search: &str) -> Result<()> {
    ctx.session_mut()?.controller.set_search(search);
    Ok(())
}

/// Open the edit form for an item, prefilled from the live collection.
pub fn begin_edit(ctx: &mut AppContext, identity: &str) -> Result<ItemDraft> {
    let start = Instant::now();
    let result = (|| {
        let session = ctx.session_mut()?;
        let items = session.items();
        session.controller.begin_edit(identity, &items)
    })();
    log_command_execution("items::begin_edit", start.elapsed(), result.as_ref().err());
    result
}

pub fn cancel_edit(ctx: &mut AppContext) -> Result<()> {
    ctx.session_mut()?.controller.cancel_edit();
    Ok(())
}

/// Validate the draft and write it out (create or update per edit state).
pub async fn save_item(ctx: &mut AppContext, draft: &ItemDraft) -> Result<()> {
    let start = Instant::now();
    let result = do_save(ctx, draft).await;
    log_command_execution("items::save_item", start.elapsed(), result.as_ref().err());
    result
}

async fn do_save(ctx: &mut AppContext, draft: &ItemDraft) -> Result<()> {
    let session = ctx.session_mut()?;
    let items = session.items();
    session.controller.save_item(draft, &items).await
}

/// Delete an item after explicit confirmation.
///
/// The UI asks "are you sure" first; an unconfirmed call is rejected and
/// nothing is written.
pub async fn delete_item(ctx: &AppContext, identity: &str, confirmed: bool) -> Result<()> {
    let start = Instant::now();
    let result = do_delete(ctx, identity, confirmed).await;
    log_command_execution("items::delete_item", start.elapsed(), result.as_ref().err());
    result
}

async fn do_delete(ctx: &AppContext, identity: &str, confirmed: bool) -> Result<()> {
    if !confirmed {
        return Err(InventaireError::Validation(
            "deletion requires confirmation".to_string(),
        ));
    }
    ctx.session()?.controller.delete_item(identity).await
}
