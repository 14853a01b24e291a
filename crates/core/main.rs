#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::{io, path::PathBuf, process, time::Duration};

mod app;
mod file;
mod interact;

use app::App;
use interact::Terminal;

use bookbot::store;
use clap::Parser;
use log::{error, trace};

fn main() {
    if let Err(err) = try_main() {
        error!("{:#}", err);
        process::exit(2);
    }
}

fn try_main() -> eyre::Result<()> {
    let Cli {
        file,
        limit,
        timeout,
        verbosity,
        quiet,
    } = Cli::parse();

    setup_errlog(verbosity as usize, quiet)?;

    let file = file.map_or_else(|| PathBuf::from(store::DEFAULT_FILE_NAME), file::csv_path);
    let timeout = Duration::from_secs(timeout);
    trace!(
        "Using '{}' with a limit of {limit} results and a {timeout:?} timeout",
        file.display()
    );

    let fetch = |query: &str| bookbot::fetch_books_with_timeout(query, limit, timeout);

    App::new(Terminal, fetch, rand::thread_rng(), io::stdout(), file).run()
}

fn setup_errlog(verbosity: usize, quiet: bool) -> eyre::Result<()> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet { 0 } else { verbosity + 2 };

    stderrlog::new().verbosity(verbosity).init()?;
    Ok(())
}

#[derive(Parser)]
#[clap(name = "bookbot")]
#[clap(about = "Fetch books from Open Library, filter them and get a random suggestion")]
#[clap(version, author)]
struct Cli {
    /// The CSV file that fetched books are saved to and loaded from [default: books_data.csv]
    #[clap(short, long, parse(from_os_str))]
    file: Option<PathBuf>,

    /// The maximum number of books to fetch in one search
    #[clap(short, long, default_value_t = bookbot::DEFAULT_MAX_RESULTS)]
    limit: usize,

    /// Seconds to wait for Open Library before giving up
    #[clap(short, long, default_value_t = bookbot::DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    /// How chatty the program is
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,

    /// Only show errors on stderr, prompts and suggestions are still shown.
    #[clap(short, long)]
    quiet: bool,
}
