use std::path::PathBuf;

use crate::{interact, shelf};

use libris::{isbn, Book, Config, Policy, Resolver};

use clap::{Args, Subcommand};
use eyre::WrapErr;
use log::{info, trace};

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Look up a book by ISBN and print it without storing it
    #[clap(arg_required_else_help = true)]
    Lookup {
        /// The ISBN to search for
        isbn: String,

        #[clap(flatten)]
        resolve: ResolveOpts,
    },

    /// Look up a book by ISBN and store it on the owner's shelf
    #[clap(arg_required_else_help = true)]
    Add {
        /// The ISBN to search for
        isbn: String,

        /// Whose shelf the book is stored on
        #[clap(short, long)]
        owner: String,

        #[clap(flatten)]
        resolve: ResolveOpts,

        /// Keep the Google Books record without asking when providers disagree
        #[clap(short, long)]
        confirm: bool,
    },

    /// Print a stored book
    #[clap(arg_required_else_help = true)]
    Get {
        /// The ISBN of the stored book
        isbn: String,

        /// Whose shelf to look on
        #[clap(short, long)]
        owner: String,
    },

    /// List the books stored on the owner's shelf
    #[clap(arg_required_else_help = true)]
    Ls {
        /// Whose shelf to list
        #[clap(short, long)]
        owner: String,

        /// Maximum number of books to list
        #[clap(long, default_value_t = 10)]
        limit: usize,

        /// Number of books to skip
        #[clap(long, default_value_t = 0)]
        offset: usize,
    },
}

#[derive(Debug, Args)]
pub struct ResolveOpts {
    /// Ask Google Books and Goodreads together and show both records when their titles differ
    ///
    /// Without this flag Google Books is asked first and the ISBNdb page is only read when
    /// Google Books has no record.
    #[clap(short, long)]
    reconcile: bool,
}

impl ResolveOpts {
    const fn policy(&self) -> Policy {
        if self.reconcile {
            Policy::Reconcile
        } else {
            Policy::Fallback
        }
    }
}

impl Commands {
    pub fn execute(self, config: &Config, file: Option<PathBuf>) -> eyre::Result<String> {
        match self {
            Commands::Lookup { isbn, resolve } => {
                let books = match resolve_books(config, &isbn, resolve.policy())? {
                    Some(books) => books,
                    None => return Ok(not_found_message(&isbn)),
                };
                Ok(serde_json::to_string_pretty(&books)?)
            }
            Commands::Add {
                isbn,
                owner,
                resolve,
                confirm,
            } => {
                let isbn = isbn::normalize(&isbn)?;
                let mut books = match resolve_books(config, &isbn, resolve.policy())? {
                    Some(books) => books,
                    None => return Ok(not_found_message(&isbn)),
                };

                let book = if books.len() > 1 && !confirm {
                    interact::user_select_book(books)?
                } else {
                    if books.len() > 1 {
                        info!("--confirm used - keeping the first record..");
                    }
                    books.remove(0)
                };

                let title = book.title.clone();
                let mut shelf = shelf::open_or_create_shelf(file)?;
                let replaced = shelf.upsert(&owner, &isbn, book);

                if shelf.dirty() {
                    trace!("Updating the shelf file..");
                    shelf.save()?;
                    trace!("Done!");
                }

                if replaced {
                    Ok(format!("Updated '{title}' on {owner}'s shelf"))
                } else {
                    Ok(format!("Added '{title}' to {owner}'s shelf"))
                }
            }
            Commands::Get { isbn, owner } => {
                let isbn = isbn::normalize(&isbn)?;
                let shelf = shelf::open_shelf(file)?;
                match shelf.get(&isbn, &owner) {
                    Some(book) => Ok(serde_json::to_string_pretty(book)?),
                    None => Ok(format!("No book with the ISBN '{isbn}' on {owner}'s shelf")),
                }
            }
            Commands::Ls {
                owner,
                limit,
                offset,
            } => {
                let shelf = shelf::open_shelf(file)?;
                let books = shelf.list(&owner, limit, offset);
                if books.is_empty() {
                    Ok(format!("No books on {owner}'s shelf"))
                } else {
                    Ok(serde_json::to_string_pretty(&books)?)
                }
            }
        }
    }
}

/// `None` when no provider has a record, which is not an error for the user.
fn resolve_books(config: &Config, isbn: &str, policy: Policy) -> eyre::Result<Option<Vec<Book>>> {
    let resolver = Resolver::from_config(config)?;
    match resolver.resolve(isbn, policy) {
        Ok(books) => Ok(Some(books)),
        Err(e) if e.is_not_found() => {
            trace!("{e}");
            Ok(None)
        }
        Err(e) => Err(e).wrap_err_with(|| format!("Failed to look up the ISBN '{isbn}'")),
    }
}

fn not_found_message(isbn: &str) -> String {
    format!("No book found for the ISBN '{isbn}'")
}
