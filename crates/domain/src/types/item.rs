//! Inventory item types
//!
//! Items are owned by the external persistence layer; the client only ever
//! holds a fully-replaceable snapshot of them. The `owner` field is the
//! session identity that created the record and determines mutation rights,
//! independent of read visibility.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::InventaireError;

/// Physical location of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// On a construction site
    Chantier,
    /// In the workshop
    Atelier,
}

impl Location {
    /// Stable lowercase label, used in storage and CSV output
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chantier => "chantier",
            Self::Atelier => "atelier",
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::Chantier
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = InventaireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chantier" => Ok(Self::Chantier),
            "atelier" => Ok(Self::Atelier),
            other => Err(InventaireError::Validation(format!("unknown location: {other}"))),
        }
    }
}

/// An inventory item as delivered by the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Opaque external key, stable across updates
    pub identity: String,
    /// Session identity that created the record
    pub owner: String,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub date: Option<String>,
    pub site: Option<String>,
    pub team_leader: Option<String>,
    pub location: Location,
}

impl Item {
    /// Projects the item back into a writable record (rename cascade path)
    pub fn to_record(&self) -> ItemRecord {
        ItemRecord {
            owner: self.owner.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            quantity: self.quantity,
            date: self.date.clone(),
            site: self.site.clone(),
            team_leader: self.team_leader.clone(),
            location: self.location,
        }
    }
}

/// Writable item payload; the store assigns the identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub owner: String,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub date: Option<String>,
    pub site: Option<String>,
    pub team_leader: Option<String>,
    pub location: Location,
}

/// Raw form input for creating or updating an item.
///
/// Quantity stays text until validation so that inputs like `"-1"` or
/// `"abc"` are rejected with a validation message rather than failing
/// upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub category: String,
    pub quantity: String,
    pub date: String,
    pub site: String,
    pub team_leader: String,
    /// Defaults to the active tab for new items when absent
    pub location: Option<Location>,
}

impl From<&Item> for ItemDraft {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            category: item.category.clone(),
            quantity: item.quantity.to_string(),
            date: item.date.clone().unwrap_or_default(),
            site: item.site.clone().unwrap_or_default(),
            team_leader: item.team_leader.clone().unwrap_or_default(),
            location: Some(item.location),
        }
    }
}
