use log::{error, info, trace};
use serde::Deserialize;

use crate::{
    normalize::{normalize, Volume},
    Book, Config, Error, ErrorKind, Provider,
};

use super::Client;

/// Tag given to records produced by [`Goodreads`].
pub const SOURCE: &str = "goodreads";

/// XML search adapter over the Goodreads search index.
///
/// Only the first `work` of the results is read and fields are picked by position in the
/// document, anything missing is left empty.
pub struct Goodreads<C> {
    client: C,
    url: String,
    key: String,
}

impl<C: Client> Goodreads<C> {
    /// Creates the adapter, taking the endpoint and developer key from `config`.
    pub fn new(client: C, config: &Config) -> Self {
        Self {
            client,
            url: config.goodreads_url.clone(),
            key: config.goodreads_key.clone(),
        }
    }

    fn get_volume(&self, isbn: &str) -> Result<Volume, Error> {
        info!("Searching for ISBN '{isbn}' using Goodreads search");
        let url = format!("{}?q={isbn}&key={}", self.url, self.key);

        let resp = self.client.fetch(&url, &[])?.ensure_success()?;
        trace!("Request was successful");

        let model: GoodreadsResponse = quick_xml::de::from_str(&resp.body).map_err(|e| {
            error!("Goodreads payload for '{isbn}' could not be decoded: {e}");
            Error::wrap(ErrorKind::Deserialize, e)
        })?;

        let work = model
            .search
            .results
            .work
            .into_iter()
            .next()
            .unwrap_or_default();

        if work.best_book.title.is_empty() {
            return Err(Error::not_found(format!(
                "Goodreads has no works for '{isbn}'"
            )));
        }

        Ok(work.into_volume(isbn))
    }
}

impl<C: Client> Provider for Goodreads<C> {
    fn name(&self) -> &str {
        "Goodreads"
    }

    fn lookup(&self, isbn: &str) -> Result<Book, Error> {
        self.get_volume(isbn).map(|volume| normalize(&volume))
    }
}

/// search > results > work > best_book
#[derive(Deserialize, Default)]
#[serde(default)]
struct GoodreadsResponse {
    search: Search,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Search {
    results: Results,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Results {
    work: Vec<Work>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Work {
    original_publication_year: Text,
    average_rating: String,
    best_book: BestBook,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct BestBook {
    title: String,
    author: Author,
    image_url: String,
    small_image_url: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Author {
    name: String,
}

/// Text content of an element whose attributes (`type`, `nil`) are of no interest.
#[derive(Deserialize, Default)]
#[serde(default)]
struct Text {
    #[serde(rename = "$text")]
    value: String,
}

impl Work {
    // The search result carries no identifiers so the queried ISBN is used.
    fn into_volume(self, isbn: &str) -> Volume {
        let Self {
            original_publication_year: Text {
                value: published_year,
            },
            average_rating,
            best_book:
                BestBook {
                    title,
                    author: Author { name },
                    image_url,
                    small_image_url,
                },
        } = self;

        let (isbn10, isbn13) = if isbn.len() == 13 {
            (String::new(), isbn.to_owned())
        } else {
            (isbn.to_owned(), String::new())
        };

        let authors = if name.is_empty() { vec![] } else { vec![name] };

        Volume {
            title,
            authors,
            published_year,
            average_rating: average_rating.trim().parse().unwrap_or(0.0),
            isbn10,
            isbn13,
            image_url,
            small_image_url,
            source: SOURCE.to_owned(),
            ..Volume::default()
        }
    }
}
