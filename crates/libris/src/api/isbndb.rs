use log::{error, info, trace};
use scraper::{ElementRef, Html, Selector};

use crate::{Book, Config, Error, Provider};

use super::Client;

/// Tag given to records produced by [`Isbndb`].
pub const SOURCE: &str = "isbndb_crawl";

const ROW_SELECTOR: &str = "body div table tr";
const COVER_SELECTOR: &str = "body div .container .col-md-3 object";

/// Scrape adapter reading the public ISBNdb book page.
///
/// The page is only served to sessions that look like a browser, so a session cookie can be
/// configured and is sent with every request.
pub struct Isbndb<C> {
    client: C,
    url: String,
    cookie: Option<String>,
}

impl<C: Client> Isbndb<C> {
    /// Creates the adapter, taking the page URL and session cookie from `config`.
    pub fn new(client: C, config: &Config) -> Self {
        Self {
            client,
            url: config.isbndb_url.clone(),
            cookie: config.isbndb_cookie.clone().filter(|c| !c.is_empty()),
        }
    }
}

impl<C: Client> Provider for Isbndb<C> {
    fn name(&self) -> &str {
        "ISBNdb"
    }

    fn lookup(&self, isbn: &str) -> Result<Book, Error> {
        info!("Searching for ISBN '{isbn}' on the ISBNdb book page");
        let url = format!("{}/{isbn}", self.url);

        let headers: Vec<(&str, &str)> = self
            .cookie
            .as_deref()
            .map(|cookie| ("cookie", cookie))
            .into_iter()
            .collect();

        let resp = self
            .client
            .fetch(&url, &headers)?
            .ensure_success()
            .map_err(|e| {
                error!("ISBNdb page for '{isbn}' could not be fetched: {e}");
                e
            })?;
        trace!("Request was successful");

        let mut book = parse_page(&resp.body);
        if !book.is_found() {
            return Err(Error::not_found(format!(
                "ISBNdb page for '{isbn}' has no title"
            )));
        }

        if book.isbn.is_empty() {
            book.isbn = isbn.to_owned();
        }
        book.small_image_url = book.image_url.clone();
        book.source = SOURCE.to_owned();
        book.status = Book::CONFIRMED;

        Ok(book)
    }
}

/// Reads the book details table and cover of an ISBNdb page.
///
/// Row labels must match exactly, a row whose header reads "Full Title " is ignored. When a
/// label appears more than once the last row wins.
pub(crate) fn parse_page(html: &str) -> Book {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse(ROW_SELECTOR).expect("Row selector should always be valid");
    let th = Selector::parse("th").expect("th selector should always be valid");
    let td = Selector::parse("td").expect("td selector should always be valid");

    let mut book = Book::default();

    for row in document.select(&row_selector) {
        let label = cell_text(row, &th);
        let value = cell_text(row, &td);
        match label.as_str() {
            "Full Title" => book.title = value,
            "ISBN13" => book.isbn = value,
            "Publisher" => book.publisher = value,
            "Authors" => book.authors = value.trim().to_owned(),
            _ => {}
        }
    }

    let cover_selector =
        Selector::parse(COVER_SELECTOR).expect("Cover selector should always be valid");
    for object in document.select(&cover_selector) {
        if let Some(data) = object.value().attr("data") {
            book.image_url = data.to_owned();
        }
    }

    book
}

fn cell_text(row: ElementRef<'_>, selector: &Selector) -> String {
    row.select(selector).flat_map(|cell| cell.text()).collect()
}
