//! Destinations
//!
//! A destination is a single bookable tour with exactly one fixed time slot.

use chrono::naive::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

/// A frequently asked question shown on the catalog detail view
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Faq {
    /// The question
    pub question: String,

    /// The answer
    pub answer: String,
}

/// A bookable destination
#[derive(Clone, Debug)]
pub struct Destination {
    /// Destination ID
    pub id: Uuid,

    /// Display name, e.g. "Shore Temple"
    pub name: String,

    /// Town or area the tour takes place in
    pub location: String,

    /// Long-form description for the catalog
    pub description: String,

    /// Image shown on the catalog card
    pub image_url: String,

    /// Free-text tour duration, e.g. "1.5 hours"
    pub duration: String,

    /// The one fixed time slot the tour runs in, e.g. "9:00 AM - 10:30 AM"
    ///
    /// Bookings copy this value at creation time, they do not reference it.
    pub time_slot: String,

    /// Selling points listed on the catalog card
    pub highlights: Vec<String>,

    /// Questions and answers for the detail view
    pub faqs: Vec<Faq>,

    /// Creation date
    pub created_at: NaiveDateTime,

    /// Last updated at
    pub updated_at: NaiveDateTime,
}

impl Destination {
    /// Does this destination match a free-text search query?
    ///
    /// The needle must already be normalized with [`normalize_query`];
    /// name, location and description are searched.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }

        [
            self.name.as_str(),
            self.location.as_str(),
            self.description.as_str(),
        ]
        .iter()
        .any(|haystack| normalize_query(haystack).contains(needle))
    }
}

/// Normalize a search query for comparison
///
/// Unicode normalization, then lowercase, so composed and decomposed
/// spellings of the same text compare equal.
pub fn normalize_query(query: &str) -> String {
    query.nfc().collect::<String>().to_lowercase()
}
