#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::{path::PathBuf, process, time::Duration};

mod commands;
mod interact;
mod shelf;

use commands::Commands;

use libris::Config;

use clap::{Args, Parser};
use log::trace;

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        process::exit(2);
    }
}

fn try_main() -> eyre::Result<()> {
    let Cli {
        command,
        global_opts:
            GlobalOpts {
                file,
                verbosity,
                quiet,
                timeout,
                isbndb_cookie,
                goodreads_key,
            },
    } = Cli::parse();

    setup_errlog(verbosity as usize, quiet)?;

    let config = Config {
        timeout: Duration::from_secs(timeout),
        isbndb_cookie,
        goodreads_key: goodreads_key.unwrap_or_default(),
        ..Config::default()
    };
    trace!("Using a request timeout of {timeout}s");

    let message = command.execute(&config, file)?;
    println!("{message}");
    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> eyre::Result<()> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet { 0 } else { verbosity + 1 };

    stderrlog::new().verbosity(verbosity).init()?;
    Ok(())
}

#[derive(Parser)]
#[clap(name = "libris")]
#[clap(about = "Look up books by ISBN and keep them on a shelf file")]
#[clap(version, author)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(flatten)]
    global_opts: GlobalOpts,
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// The shelf file, by default the single .shelf.json file of the current directory
    #[clap(short, long, parse(from_os_str), global = true)]
    file: Option<PathBuf>,

    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbosity: u8,

    /// Only errors are written to stderr.
    #[clap(short, long, global = true)]
    quiet: bool,

    /// Seconds to wait for each provider before giving up
    #[clap(long, default_value_t = 5, global = true)]
    timeout: u64,

    /// Session cookie sent when reading ISBNdb book pages
    #[clap(long, env = "LIBRIS_ISBNDB_COOKIE", hide_env_values = true, global = true)]
    isbndb_cookie: Option<String>,

    /// Goodreads developer key used by --reconcile
    #[clap(long, env = "LIBRIS_GOODREADS_KEY", hide_env_values = true, global = true)]
    goodreads_key: Option<String>,
}
