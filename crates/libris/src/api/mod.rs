//! HTTP transport port and the provider adapters built on top of it.

pub(crate) mod goodreads;
pub(crate) mod google_books;
pub(crate) mod isbndb;

pub use goodreads::Goodreads;
pub use google_books::GoogleBooks;
pub use isbndb::Isbndb;

use crate::{Error, ErrorKind};

/// The outbound side of every provider: issue a GET and hand back the status and body.
///
/// Implementations must be shareable between threads as one client serves concurrent lookups.
pub trait Client: Send + Sync {
    /// Sends a GET request to `url` with the extra `headers`.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::IO`] error when the request cannot be sent, times out, or the body cannot
    /// be read. A non-success status is *not* an error at this level.
    fn fetch(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response, Error>;
}

/// Status code and body text of a completed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Body decoded as text.
    pub body: String,
}

impl Response {
    /// Creates a new [`Response`].
    pub fn new<S: Into<String>>(status: u16, body: S) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for any 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-success response into an [`ErrorKind::Status`] error.
    ///
    /// # Errors
    ///
    /// When the status code is outside of the 2xx range.
    pub fn ensure_success(self) -> Result<Self, Error> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::new(
                ErrorKind::Status,
                format!("server responded with status code {}", self.status),
            ))
        }
    }
}

impl Client for reqwest::blocking::Client {
    fn fetch(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response, Error> {
        let mut request = self.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let resp = request
            .send()
            .map_err(|e| Error::wrap(ErrorKind::IO, e))?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(|e| Error::wrap(ErrorKind::IO, e))?;

        Ok(Response { status, body })
    }
}

#[cfg(test)]
pub(crate) use test::{
    assert_header, assert_url, impl_response_producer, MockClient, NetworkErrorProducer,
    Producer, HEADER_SINK, URL_SINK,
};

#[cfg(test)]
mod test {

    use super::*;

    thread_local! {
        pub(crate) static URL_SINK: std::cell::RefCell<Option<String>> = std::cell::RefCell::new(None);
        pub(crate) static HEADER_SINK: std::cell::RefCell<Vec<(String, String)>> = std::cell::RefCell::new(Vec::new());
    }

    /// Asserts that the expected URL is the same as the one provided to the [`MockClient`].
    ///
    /// The [`MockClient`] will update the static thread local `URL_SINK` with the URL string that
    /// was passed to it, this allows for asserting that adapters build the correct URL.
    macro_rules! assert_url {
        ($expected: expr) => {
            assert_url!($expected, "");
        };
        ($expected: expr, $($arg: tt)+) => {
            let url = crate::api::URL_SINK.with(|url| url.borrow().clone().unwrap_or_default());
            assert_eq!($expected, url, $($arg)+);
        };
    }

    /// Asserts the value of a header sent through the [`MockClient`], `None` when it was not sent.
    macro_rules! assert_header {
        ($name: expr, $expected: expr) => {
            let value = crate::api::HEADER_SINK.with(|headers| {
                headers
                    .borrow()
                    .iter()
                    .find(|(name, _)| name == $name)
                    .map(|(_, value)| value.clone())
            });
            assert_eq!($expected, value.as_deref());
        };
    }

    pub(crate) trait Producer<T>
    where
        Self: Default,
    {
        fn produce() -> Result<T, Error>;
    }

    #[derive(Default)]
    pub(crate) struct MockClient<P: Producer<Response> = EmptyResponseProducer> {
        _producer: std::marker::PhantomData<P>,
    }

    impl<P: Producer<Response> + Send + Sync> Client for MockClient<P> {
        fn fetch(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response, Error> {
            URL_SINK.with(|sink| *sink.borrow_mut() = Some(url.to_owned()));
            HEADER_SINK.with(|sink| {
                *sink.borrow_mut() = headers
                    .iter()
                    .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
                    .collect();
            });
            P::produce()
        }
    }

    macro_rules! impl_response_producer {
        ($($producer:ident => $exp:expr,)*) => {
            $(
                #[derive(Default)]
                pub(crate) struct $producer;

                impl crate::api::Producer<crate::api::Response> for $producer {
                    fn produce() -> Result<crate::api::Response, crate::Error> {
                        $exp
                    }
                }
            )*
        };
    }
    impl_response_producer! {
        EmptyResponseProducer => Ok(Response::new(200, "")),
        NetworkErrorProducer => Err(Error::new(ErrorKind::IO, "Network error")),
    }

    pub(crate) use assert_header;
    pub(crate) use assert_url;
    pub(crate) use impl_response_producer;
}
