use log::{error, info, trace};
use serde::Deserialize;

use crate::{
    normalize::{normalize, Volume},
    Book, Config, Error, ErrorKind, Provider,
};

use super::Client;

/// Tag given to records produced by [`GoogleBooks`].
pub const SOURCE: &str = "google";

/// Structured catalog adapter over the Google Books volumes search.
pub struct GoogleBooks<C> {
    client: C,
    url: String,
}

impl<C: Client> GoogleBooks<C> {
    /// Creates the adapter, taking the endpoint from `config`.
    pub fn new(client: C, config: &Config) -> Self {
        Self {
            client,
            url: config.google_books_url.clone(),
        }
    }

    fn get_volume(&self, isbn: &str) -> Result<Volume, Error> {
        info!("Searching for ISBN '{isbn}' using Google Books API");
        let url = format!("{}?q=isbn:{isbn}", self.url);

        let resp = self.client.fetch(&url, &[])?.ensure_success()?;
        trace!("Request was successful");

        let model: GoogleModel = serde_json::from_str(&resp.body).map_err(|e| {
            error!("Google Books payload for '{isbn}' could not be decoded: {e}");
            Error::wrap(ErrorKind::Deserialize, e)
        })?;

        if model.total_items < 1 {
            return Err(Error::not_found(format!(
                "Google Books has no volumes for '{isbn}'"
            )));
        }

        model
            .items
            .into_iter()
            .next()
            .map(Volume::from)
            .ok_or_else(|| Error::not_found(format!("Google Books has no volumes for '{isbn}'")))
    }
}

impl<C: Client> Provider for GoogleBooks<C> {
    fn name(&self) -> &str {
        "Google Books"
    }

    fn lookup(&self, isbn: &str) -> Result<Book, Error> {
        self.get_volume(isbn).map(|volume| normalize(&volume))
    }
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(test, derive(Debug))]
struct GoogleModel {
    total_items: i64,
    items: Vec<Item>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(test, derive(Debug))]
struct Item {
    volume_info: VolumeInfo,
}

/// Volume information from the Google Book API, every field may be missing.
#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(test, derive(Debug))]
struct VolumeInfo {
    title: String,
    authors: Vec<String>,
    publisher: String,
    published_date: String,
    description: String,
    industry_identifiers: Vec<Identifier>,
    page_count: i64,
    categories: Vec<String>,
    language: String,
    average_rating: f64,
    image_links: ImageLinks,
}

#[derive(Deserialize, Default)]
#[serde(default)]
#[cfg_attr(test, derive(Debug))]
struct Identifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(test, derive(Debug))]
struct ImageLinks {
    small_thumbnail: String,
    thumbnail: String,
}

impl From<Item> for Volume {
    fn from(item: Item) -> Self {
        // Deconstruct item to take ownership of fields (avoids cloning).
        let Item {
            volume_info:
                VolumeInfo {
                    title,
                    authors,
                    publisher,
                    published_date,
                    description,
                    industry_identifiers,
                    page_count,
                    categories,
                    language,
                    average_rating,
                    image_links:
                        ImageLinks {
                            small_thumbnail,
                            thumbnail,
                        },
                },
        } = item;

        let mut isbn10 = String::new();
        let mut isbn13 = String::new();
        for Identifier { kind, identifier } in industry_identifiers {
            match kind.as_str() {
                "ISBN_10" => isbn10 = identifier,
                "ISBN_13" => isbn13 = identifier,
                _ => {}
            }
        }

        // published_date = Year-Month-Day, where only the year is kept.
        let published_year = published_date
            .split('-')
            .next()
            .unwrap_or_default()
            .to_owned();

        Self {
            title,
            authors,
            published_year,
            publisher,
            description,
            isbn10,
            isbn13,
            page_count,
            categories,
            language,
            average_rating,
            image_url: thumbnail,
            small_image_url: small_thumbnail,
            source: SOURCE.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GoogleBooks, GoogleModel, Volume};
    use crate::{
        api::{assert_url, impl_response_producer, MockClient, NetworkErrorProducer, Response},
        Book, Config, ErrorKind, Provider,
    };

    const GOOGLE_BOOK_JSON: &str = include_str!("../../tests/data/google_book.json");

    impl_response_producer! {
        ValidJsonProducer => Ok(Response::new(200, GOOGLE_BOOK_JSON)),
        NoVolumesProducer => Ok(Response::new(200, r#"{ "kind": "books#volumes", "totalItems": 0 }"#)),
        MalformedProducer => Ok(Response::new(200, "<html>rate limited</html>")),
        UnavailableProducer => Ok(Response::new(503, "")),
    }

    fn adapter<C: Default>() -> GoogleBooks<C> {
        GoogleBooks {
            client: C::default(),
            url: Config::default().google_books_url,
        }
    }

    #[test]
    fn isbn_url_format_is_correct() {
        assert!(adapter::<MockClient<ValidJsonProducer>>()
            .lookup("9780735619678")
            .is_ok());
        assert_url!("https://www.googleapis.com/books/v1/volumes?q=isbn:9780735619678");
    }

    #[test]
    fn valid_json_produces_normalized_book() {
        let book = adapter::<MockClient<ValidJsonProducer>>()
            .lookup("9780735619678")
            .expect("ValidJsonProducer always produces a valid json String to be deserialized");

        assert_eq!("Code Complete", book.title);
        assert_eq!("Steve McConnell", book.authors);
        assert_eq!("9780735619678", book.isbn);
        assert_eq!("Microsoft Press", book.publisher);
        assert_eq!(2004, book.publication_year);
        assert_eq!(914, book.page_count);
        assert_eq!("Computers", book.categories);
        assert_eq!("en", book.language);
        assert!((book.average_rating - 4.5).abs() < f64::EPSILON);
        assert_eq!(super::SOURCE, book.source);
        assert_eq!(Book::CONFIRMED, book.status);
        // only the small thumbnail is present in the fixture
        assert_eq!(book.small_image_url, book.image_url);
        assert!(!book.image_url.is_empty());
    }

    #[test]
    fn zero_total_items_is_not_found() {
        let err = adapter::<MockClient<NoVolumesProducer>>()
            .lookup("9780000000000")
            .unwrap_err();
        assert_eq!(ErrorKind::NotFound, err.kind(), "{err}");
    }

    #[test]
    fn undecodable_payload_is_deserialize_error() {
        let err = adapter::<MockClient<MalformedProducer>>()
            .lookup("9780735619678")
            .unwrap_err();
        assert_eq!(ErrorKind::Deserialize, err.kind());
        assert!(err.is_transient());
    }

    #[test]
    fn non_success_status_is_status_error() {
        let err = adapter::<MockClient<UnavailableProducer>>()
            .lookup("9780735619678")
            .unwrap_err();
        assert_eq!(ErrorKind::Status, err.kind());
    }

    #[test]
    fn network_error_is_passed_through() {
        let err = adapter::<MockClient<NetworkErrorProducer>>()
            .lookup("9780735619678")
            .unwrap_err();
        assert_eq!(ErrorKind::IO, err.kind());
    }

    #[test]
    fn volume_can_be_derived_from_json() {
        let mut model: GoogleModel = serde_json::from_str(GOOGLE_BOOK_JSON).unwrap();
        let volume = Volume::from(model.items.remove(0));

        assert_eq!("Code Complete", volume.title);
        assert_eq!(vec!["Steve McConnell".to_owned()], volume.authors);
        assert_eq!("2004", volume.published_year);
        assert_eq!("0735619670", volume.isbn10);
        assert_eq!("9780735619678", volume.isbn13);
        assert!(volume.image_url.is_empty());
    }
}
