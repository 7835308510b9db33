//! CSV export commands

use std::time::Instant;

use inventaire_core::export;
use inventaire_domain::Result;
use serde::Serialize;

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// A ready-to-download CSV document
#[derive(Debug, Clone, Serialize)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

/// Export the items of the active tab as CSV.
///
/// Fails with a validation error when the tab has no items.
pub fn export_current_tab(ctx: &AppContext) -> Result<CsvExport> {
    let start = Instant::now();
    let result = do_export(ctx);
    log_command_execution("export::export_current_tab", start.elapsed(), result.as_ref().err());
    result
}

fn do_export(ctx: &AppContext) -> Result<CsvExport> {
    let session = ctx.session()?;
    let tab = session.controller.active_tab();
    let items = session.items();
    let content = export::export_tab(&items, tab)?;
    Ok(CsvExport { filename: export::suggested_filename(tab), content })
}
