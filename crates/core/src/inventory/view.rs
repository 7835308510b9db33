//! Pure row projection: `(item collection, ui state) -> visible rows`
//!
//! The filters are conjunctive and applied in a fixed order: location (tab),
//! category, team leader, then free-text search. None of them mutate
//! anything; rendering surfaces consume the returned references.

use inventaire_domain::{Item, Location};
use serde::{Deserialize, Serialize};

/// Sentinel option meaning "no filter" in derived select lists
pub const ALL_OPTION: &str = "All";

/// Active filters; `None` means "All"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub category: Option<String>,
    pub team_leader: Option<String>,
    pub search: String,
}

/// Transient UI session state.
///
/// Lives only in memory: it survives feed pushes but is reset to defaults on
/// logout and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    pub active_tab: Location,
    pub filters: Filters,
    /// Identity of the item being edited, when any
    pub edit_target: Option<String>,
}

/// Computes the visible row set for the given state.
pub fn visible_rows<'a>(items: &'a [Item], state: &UiState) -> Vec<&'a Item> {
    let search = state.filters.search.trim().to_lowercase();

    items
        .iter()
        .filter(|item| {
            if item.location != state.active_tab {
                return false;
            }
            if let Some(category) = &state.filters.category {
                if &item.category != category {
                    return false;
                }
            }
            if let Some(leader) = &state.filters.team_leader {
                // An absent leader is treated as empty text: it never
                // matches a named filter.
                if item.team_leader.as_deref().unwrap_or("") != leader {
                    return false;
                }
            }
            if !search.is_empty() {
                let name = item.name.to_lowercase();
                let site = item.site.as_deref().unwrap_or("").to_lowercase();
                if !name.contains(&search) && !site.contains(&search) {
                    return false;
                }
            }
            true
        })
        .collect()
}

/// Derives the team-leader filter options for the active tab.
///
/// "All" first, then the distinct non-empty leaders in discovery order.
/// Recomputed on every render; never stored.
pub fn team_leader_options(items: &[Item], tab: Location) -> Vec<String> {
    let mut options = vec![ALL_OPTION.to_string()];
    for item in items {
        if item.location != tab {
            continue;
        }
        if let Some(leader) = item.team_leader.as_deref() {
            if !leader.is_empty() && !options.iter().any(|o| o == leader) {
                options.push(leader.to_string());
            }
        }
    }
    options
}

/// Keeps the previous selection if it is still a valid option, otherwise
/// falls back to "All" (`None`).
pub fn reconcile_selection(selection: Option<String>, options: &[String]) -> Option<String> {
    selection.filter(|value| options.iter().any(|o| o == value))
}
