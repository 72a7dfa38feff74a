use std::time::Duration;

use crate::{Error, ErrorKind};

const GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1/volumes";
const GOODREADS_URL: &str = "https://www.goodreads.com/search/index.xml";
const ISBNDB_URL: &str = "https://isbndb.com/book";
const USER_AGENT: &str = concat!("libris/", env!("CARGO_PKG_VERSION"));

/// Endpoints, credentials and limits used by the provider adapters.
#[derive(Clone, Debug)]
pub struct Config {
    /// Google Books volumes endpoint, queried with `?q=isbn:<isbn>`.
    pub google_books_url: String,
    /// Goodreads search index endpoint.
    pub goodreads_url: String,
    /// Goodreads developer key sent with every search.
    pub goodreads_key: String,
    /// Base of the ISBNdb book pages, the ISBN is appended as a path segment.
    pub isbndb_url: String,
    /// Session cookie sent to ISBNdb so the origin serves the book page instead of a block
    /// page. These expire so are never baked in.
    pub isbndb_cookie: Option<String>,
    /// Upper bound for a single request, exceeding it is an [`ErrorKind::IO`] error.
    pub timeout: Duration,
    /// `User-Agent` header of every request.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_books_url: GOOGLE_BOOKS_URL.to_owned(),
            goodreads_url: GOODREADS_URL.to_owned(),
            goodreads_key: String::new(),
            isbndb_url: ISBNDB_URL.to_owned(),
            isbndb_cookie: None,
            timeout: Duration::from_secs(5),
            user_agent: USER_AGENT.to_owned(),
        }
    }
}

impl Config {
    /// Builds the blocking HTTP client shared by all adapters.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::IO`] error when the TLS backend cannot be initialised.
    pub fn http_client(&self) -> Result<reqwest::blocking::Client, Error> {
        reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| Error::wrap(ErrorKind::IO, e))
    }
}
