use log::{info, trace, warn};

use crate::{
    api::{Goodreads, GoogleBooks, Isbndb},
    isbn, Book, Config, Error, Provider,
};

/// How the [`Resolver`] combines its providers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Policy {
    /// Ask the primary provider and only when it has no record ask the fallback provider.
    #[default]
    Fallback,
    /// Ask the primary and counterpart providers together and keep both records when their
    /// titles disagree.
    Reconcile,
}

/// Resolves an ISBN into canonical [`Book`] records using a set of providers.
///
/// The resolver holds no per call state, one instance can serve concurrent lookups.
pub struct Resolver {
    primary: Box<dyn Provider>,
    fallback: Box<dyn Provider>,
    counterpart: Box<dyn Provider>,
}

impl Resolver {
    /// Creates a resolver from the provider asked first, the provider asked when the first has no
    /// record, and the provider the first is compared against in [`Policy::Reconcile`].
    pub fn new(
        primary: Box<dyn Provider>,
        fallback: Box<dyn Provider>,
        counterpart: Box<dyn Provider>,
    ) -> Self {
        Self {
            primary,
            fallback,
            counterpart,
        }
    }

    /// Wires Google Books as primary, the ISBNdb page as fallback and Goodreads as counterpart,
    /// all sharing one HTTP client.
    ///
    /// # Errors
    ///
    /// When the HTTP client cannot be built, see [`Config::http_client`].
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let client = config.http_client()?;
        Ok(Self::new(
            Box::new(GoogleBooks::new(client.clone(), config)),
            Box::new(Isbndb::new(client.clone(), config)),
            Box::new(Goodreads::new(client, config)),
        ))
    }

    /// Resolves `isbn` with the given `policy`.
    ///
    /// [`Policy::Fallback`] always produces a single record, [`Policy::Reconcile`] one or two.
    ///
    /// # Errors
    ///
    /// See [`Resolver::fallback`] and [`Resolver::reconcile`].
    pub fn resolve(&self, isbn: &str, policy: Policy) -> Result<Vec<Book>, Error> {
        match policy {
            Policy::Fallback => self.fallback(isbn).map(|book| vec![book]),
            Policy::Reconcile => self.reconcile(isbn),
        }
    }

    /// Asks the primary provider and, only when it has no record, the fallback provider.
    ///
    /// A transient failure of the primary provider is returned as is, the fallback provider is
    /// not consulted.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::InvalidIsbn`] error when `isbn` is not an ISBN.
    /// An [`ErrorKind::NotFound`] error when neither provider has a record.
    /// Any transient error of the provider that was asked last.
    ///
    /// [`ErrorKind::InvalidIsbn`]: crate::ErrorKind::InvalidIsbn
    /// [`ErrorKind::NotFound`]: crate::ErrorKind::NotFound
    pub fn fallback(&self, isbn: &str) -> Result<Book, Error> {
        let isbn = isbn::normalize(isbn)?;

        match lookup(&*self.primary, &isbn) {
            Err(e) if e.is_not_found() => {
                info!(
                    "{} has no record for '{isbn}' - trying {}",
                    self.primary.name(),
                    self.fallback.name()
                );
                lookup(&*self.fallback, &isbn)
            }
            res => res,
        }
    }

    /// Asks the primary and counterpart providers concurrently and compares their titles.
    ///
    /// Equal titles (case sensitive) give only the primary record, different titles give both
    /// with the primary record first.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::InvalidIsbn`] error when `isbn` is not an ISBN.
    /// Otherwise the error of the primary provider, or of the counterpart when only it failed.
    /// Either provider failing fails the whole call.
    ///
    /// [`ErrorKind::InvalidIsbn`]: crate::ErrorKind::InvalidIsbn
    pub fn reconcile(&self, isbn: &str) -> Result<Vec<Book>, Error> {
        let isbn = isbn::normalize(isbn)?;

        let (primary, counterpart) = std::thread::scope(|scope| {
            let counterpart = scope.spawn(|| lookup(&*self.counterpart, &isbn));
            let primary = lookup(&*self.primary, &isbn);
            let counterpart = counterpart
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            (primary, counterpart)
        });

        let primary = primary?;
        let counterpart = counterpart?;

        if primary.title == counterpart.title {
            trace!("Providers agree on the title '{}'", primary.title);
            Ok(vec![primary])
        } else {
            info!(
                "Providers disagree on the title of '{isbn}': '{}' and '{}'",
                primary.title, counterpart.title
            );
            Ok(vec![primary, counterpart])
        }
    }
}

/// A single attempt with one provider, an empty title is never let through.
fn lookup(provider: &dyn Provider, isbn: &str) -> Result<Book, Error> {
    let res = provider.lookup(isbn).and_then(|book| {
        if book.is_found() {
            Ok(book)
        } else {
            Err(Error::not_found(format!(
                "{} returned a record without a title",
                provider.name()
            )))
        }
    });

    match &res {
        Ok(_) => trace!("{} found '{isbn}'", provider.name()),
        Err(e) if e.is_not_found() => info!("{}: {e}", provider.name()),
        Err(e) => warn!("{} failed for '{isbn}': {e}", provider.name()),
    }

    res
}
