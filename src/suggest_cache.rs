// Suggest cache: maps the display names offered by the location lookup back to
// their location codes so the search can send codes instead of free text.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::offers::LocationSuggestion;

// The two location inputs of the search form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationField {
    Origin,
    Destination,
}

impl fmt::Display for LocationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationField::Origin => write!(f, "origin"),
            LocationField::Destination => write!(f, "destination"),
        }
    }
}

/// Lowercased display name → location code, one instance per location field.
///
/// Cloning yields another handle to the same entries, which is how the
/// autosuggest controller (writer) and the search coordinator (reader) share
/// a field's cache. Updates are additive: names from an earlier lookup stay
/// until a later lookup overwrites them.
#[derive(Debug, Clone, Default)]
pub struct SuggestCache {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl SuggestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the code for a display name, ignoring case.
    pub fn resolve(&self, display_name: &str) -> Option<String> {
        self.entries.read().get(&display_name.to_lowercase()).cloned()
    }

    pub fn insert(&self, display_name: &str, code: &str) {
        self.entries
            .write()
            .insert(display_name.to_lowercase(), code.to_string());
    }

    /// Inserts every suggestion, overwriting names already present. Returns the
    /// number of suggestions written.
    pub fn extend<'a, I>(&self, suggestions: I) -> usize
    where
        I: IntoIterator<Item = &'a LocationSuggestion>,
    {
        let mut entries = self.entries.write();
        let mut count = 0;
        for suggestion in suggestions {
            entries.insert(
                suggestion.display_name.to_lowercase(),
                suggestion.code.clone(),
            );
            count += 1;
        }
        count
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
