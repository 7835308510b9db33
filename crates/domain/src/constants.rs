//! Domain constants

/// Category set seeded for a session identity that has none stored yet.
///
/// Carried over from the original deployment, hence the French names.
pub const DEFAULT_CATEGORIES: [&str; 9] = [
    "Visseuses",
    "Batteries",
    "Visses autoforeuses",
    "Coupe tubes",
    "Riveteuses",
    "Rivets",
    "EEG",
    "Batteries neuves M/S/ST",
    "Batteries usagées M/S/ST",
];

/// Returns the default category set as owned strings.
pub fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| (*c).to_string()).collect()
}
