//! CSV export of the active tab's items
//!
//! Fixed 7-column table. A value containing a comma is wrapped in double
//! quotes with embedded quotes doubled; everything else is emitted as-is.

use inventaire_domain::{InventaireError, Item, Location, Result};

const CSV_HEADER: &str = "Name,Category,Quantity,Date,Site,TeamLeader,Location";

/// Builds the CSV document for every item on the given tab.
///
/// Returns a `Validation` error instead of an empty file when no item
/// matches the tab.
pub fn export_tab(items: &[Item], tab: Location) -> Result<String> {
    let rows: Vec<&Item> = items.iter().filter(|item| item.location == tab).collect();
    if rows.is_empty() {
        return Err(InventaireError::Validation(
            "nothing to export for current tab".to_string(),
        ));
    }

    let mut out = String::from(CSV_HEADER);
    for item in rows {
        out.push('\n');
        out.push_str(&csv_row(item));
    }
    Ok(out)
}

/// Download name suggested to the caller, per tab
pub fn suggested_filename(tab: Location) -> String {
    format!("inventaire_partage_{tab}.csv")
}

fn csv_row(item: &Item) -> String {
    [
        csv_field(&item.name),
        csv_field(&item.category),
        item.quantity.to_string(),
        csv_field(item.date.as_deref().unwrap_or("")),
        csv_field(item.site.as_deref().unwrap_or("")),
        csv_field(item.team_leader.as_deref().unwrap_or("")),
        item.location.to_string(),
    ]
    .join(",")
}

fn csv_field(value: &str) -> String {
    if value.contains(',') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
