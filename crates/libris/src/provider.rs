use crate::{Book, Error};

/// A single external source of book metadata.
///
/// `lookup` answers with a [`Book`] or one of two kinds of failure the [`Resolver`] tells apart:
/// [`ErrorKind::NotFound`] when the source has no record, and any transient kind
/// ([`Error::is_transient`]) when the call itself failed.
///
/// [`Resolver`]: crate::Resolver
/// [`ErrorKind::NotFound`]: crate::ErrorKind::NotFound
pub trait Provider: Send + Sync {
    /// Human readable name used in logs.
    fn name(&self) -> &str;

    /// Looks up the book for an already normalized `isbn`.
    ///
    /// # Errors
    ///
    /// See the trait documentation.
    fn lookup(&self, isbn: &str) -> Result<Book, Error>;
}
