pub(crate) type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The Errors that may occur when resolving a book.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<DynError>,
}

/// Types of errors that make up an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The provider, or every provider tried, has no record for the ISBN.
    NotFound,
    /// The request could not be sent or the response could not be read, including timeouts.
    IO,
    /// The provider answered with a non-success HTTP status code.
    Status,
    /// The provider answered successfully but the payload could not be decoded.
    Deserialize,
    /// The value given is not an ISBN-10 or ISBN-13.
    InvalidIsbn,
}

impl Error {
    /// Creates a new [`Error`] based on the [`ErrorKind`] and message to describe the error.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            source: None,
        }
    }

    /// Wraps an existing error as the source of [`Error`].
    pub fn wrap<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<DynError>,
    {
        Self {
            kind,
            message: None,
            source: Some(source.into()),
        }
    }

    /// Shorthand for an [`ErrorKind::NotFound`] error.
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Returns the kind of error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns `true` when the error is an authoritative "no record" answer.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    /// Returns `true` when the error is an operational failure that a caller may retry.
    ///
    /// Malformed upstream payloads count as transient.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::IO | ErrorKind::Status | ErrorKind::Deserialize
        )
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::NotFound => f.write_str("Book not found")?,
            ErrorKind::IO => f.write_str("IO error")?,
            ErrorKind::Status => f.write_str("Unexpected status error")?,
            ErrorKind::Deserialize => f.write_str("Deserialize error")?,
            ErrorKind::InvalidIsbn => f.write_str("Invalid ISBN")?,
        };

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(cause) = &self.source {
            write!(f, ": caused by {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| &**e as _)
    }
}
