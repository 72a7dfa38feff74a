//! Mapping of provider shaped records into the canonical [`Book`].

use crate::Book;

/// A book as a structured provider describes it, before any coalescing.
///
/// Adapters decode their own payloads into a `Volume` and leave every field they do not know
/// empty.
#[derive(Clone, Debug, Default, PartialEq)]
#[allow(missing_docs)]
pub struct Volume {
    pub title: String,
    pub authors: Vec<String>,
    /// Free text year as the provider wrote it, e.g. `"2004"` or `"unknown"`.
    pub published_year: String,
    pub publisher: String,
    pub description: String,
    pub isbn10: String,
    pub isbn13: String,
    pub page_count: i64,
    pub categories: Vec<String>,
    pub language: String,
    pub average_rating: f64,
    pub image_url: String,
    pub small_image_url: String,
    pub source: String,
}

/// Builds the canonical [`Book`] for a `volume` already known to exist.
///
/// - each image URL falls back to the other one when empty
/// - the ISBN-13 is preferred over the ISBN-10
/// - an unreadable year becomes `0`
/// - authors and categories are joined with `", "`
/// - the status is always [`Book::CONFIRMED`]
#[must_use]
pub fn normalize(volume: &Volume) -> Book {
    let small_image_url = or_else(&volume.small_image_url, &volume.image_url);
    let image_url = or_else(&volume.image_url, &volume.small_image_url);
    let isbn = or_else(&volume.isbn13, &volume.isbn10);

    Book {
        isbn,
        title: volume.title.clone(),
        authors: volume.authors.join(", "),
        image_url,
        small_image_url,
        publisher: volume.publisher.clone(),
        description: volume.description.clone(),
        language: volume.language.clone(),
        categories: volume.categories.join(", "),
        page_count: volume.page_count,
        publication_year: parse_year(&volume.published_year),
        average_rating: volume.average_rating,
        source: volume.source.clone(),
        status: Book::CONFIRMED,
    }
}

fn or_else(preferred: &str, fallback: &str) -> String {
    if preferred.is_empty() {
        fallback.to_owned()
    } else {
        preferred.to_owned()
    }
}

fn parse_year(year: &str) -> i64 {
    year.trim().parse().unwrap_or(0)
}
