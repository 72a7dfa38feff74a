#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]
#![doc = include_str!("../README.md")]

pub mod api;
mod book;
mod config;
mod error;
pub mod isbn;
pub mod normalize;
mod provider;
mod resolve;

pub use book::Book;
pub use config::Config;
pub use error::{Error, ErrorKind};
pub use provider::Provider;
pub use resolve::{Policy, Resolver};

use log::trace;

/// Resolve the book for `isbn` using the default providers and [`Config`].
///
/// Prefer building a [`Resolver`] once when resolving more than a single ISBN so the HTTP
/// client is reused.
///
/// # Errors
///
/// An `Err` is returned when the HTTP client cannot be built.
/// Otherwise see [`Resolver::resolve`].
#[inline]
pub fn resolve(isbn: &str, policy: Policy) -> Result<Vec<Book>, Error> {
    trace!("Resolve ISBN '{isbn}' with the {policy:?} policy");
    Resolver::from_config(&Config::default())?.resolve(isbn, policy)
}
