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

//! # bookbot
//!
//! bookbot is a library which fetches book records from the Open Library search API,
//! normalizes them into fixed-shape [`BookRecord`]s, keeps them in a CSV file and picks random
//! suggestions from them using optional [`filter::Criteria`].

mod api;
mod book;
mod error;
pub mod filter;
pub mod sample;
pub mod store;

use std::time::Duration;

pub use api::DEFAULT_TIMEOUT;
pub use book::{
    BookRecord, RawDocument, ValueList, LIST_SEPARATOR, UNKNOWN_AUTHOR, UNKNOWN_GENRE,
    UNKNOWN_TITLE,
};
pub use error::{Error, ErrorKind};

use api::Client;
use log::{error, info, trace};

/// Number of results requested when no other limit is chosen.
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Search Open Library for `query`, returning at most `max_results` normalized records.
///
/// # Errors
///
/// An [`Err`] of kind [`ErrorKind::Network`] is returned when the request fails, does not
/// complete within `timeout` or the server responds with a non-success status.
/// An [`Err`] of kind [`ErrorKind::Deserialize`] is returned when the response body is not the
/// expected JSON.
#[inline]
pub fn try_fetch_books(
    query: &str,
    max_results: usize,
    timeout: Duration,
) -> Result<Vec<BookRecord>, Error> {
    trace!("Fetch books for '{query}' with a timeout of {timeout:?}");
    let client = api::http_client(timeout)?;
    api::open_library::search(&client, query, max_results)
}

/// Search Open Library for `query`, returning at most `max_results` normalized records.
///
/// Any failure is logged and an empty [`Vec`] is returned instead, so this never fails. Use
/// [`try_fetch_books`] to inspect the failure.
#[must_use]
pub fn fetch_books(query: &str, max_results: usize) -> Vec<BookRecord> {
    fetch_books_with_timeout(query, max_results, DEFAULT_TIMEOUT)
}

/// Same as [`fetch_books`] but giving up on the request after `timeout`.
#[must_use]
pub fn fetch_books_with_timeout(
    query: &str,
    max_results: usize,
    timeout: Duration,
) -> Vec<BookRecord> {
    match api::http_client(timeout) {
        Ok(client) => fetch_with(&client, query, max_results),
        Err(err) => {
            error!("{err}");
            Vec::new()
        }
    }
}

fn fetch_with<C: Client>(client: &C, query: &str, max_results: usize) -> Vec<BookRecord> {
    match api::open_library::search(client, query, max_results) {
        Ok(books) => {
            info!("Fetched {} books.", books.len());
            books
        }
        Err(err) => {
            error!("{err}");
            Vec::new()
        }
    }
}
