use serde::{Deserialize, Serialize};

/// The canonical book record produced by every provider.
///
/// A `Book` is only handed to callers once a title was found, see [`Book::is_found`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Book {
    /// ISBN-13 when the provider knows it, otherwise ISBN-10.
    pub isbn: String,
    /// Title, never empty on a record returned by a provider.
    pub title: String,
    /// Display string of all authors, comma separated.
    pub authors: String,
    /// Cover image URL.
    pub image_url: String,
    /// Thumbnail URL.
    pub small_image_url: String,
    /// Publisher name.
    pub publisher: String,
    /// Blurb as given by the provider.
    pub description: String,
    /// Language code, e.g. `en`.
    pub language: String,
    /// Display string of all categories, comma separated.
    pub categories: String,
    /// Number of pages, zero when unknown.
    pub page_count: i64,
    /// Zero when the provider's year could not be read.
    pub publication_year: i64,
    /// Mean reader rating, zero when the provider has none.
    pub average_rating: f64,
    /// Tag of the provider that produced this record.
    pub source: String,
    /// [`Book::CONFIRMED`] once the record is complete.
    pub status: i64,
}

impl Book {
    /// Status value of a record that was found and confirmed by a provider.
    pub const CONFIRMED: i64 = 1;

    /// A record with an empty title is how providers say "nothing here".
    #[must_use]
    pub fn is_found(&self) -> bool {
        !self.title.is_empty()
    }
}
