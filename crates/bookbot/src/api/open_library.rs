use log::{info, trace, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::book::{BookRecord, RawDocument};

use super::{Client, Error};

pub(crate) const OPEN_LIBRARY_SEARCH_URL: &str = "https://openlibrary.org/search.json";

pub(crate) fn search<C: Client>(
    client: &C,
    query: &str,
    max_results: usize,
) -> Result<Vec<BookRecord>, Error> {
    info!("Searching Open Library for '{query}' (limit {max_results})");
    let params = [("q", query.to_owned()), ("limit", max_results.to_string())];

    let SearchModel { docs } = client.get_json(OPEN_LIBRARY_SEARCH_URL, &params)?;

    trace!("Request was successful - normalizing {} documents", docs.len());

    Ok(normalize_docs(docs))
}

/// Normalizes each document on its own so a bad document is skipped rather than failing the
/// whole response.
fn normalize_docs(docs: Vec<Value>) -> Vec<BookRecord> {
    docs.into_iter()
        .enumerate()
        .filter_map(|(i, doc)| match RawDocument::from_value(doc) {
            Ok(raw) => Some(BookRecord::from(raw)),
            Err(e) => {
                warn!("Skipping document {i}: {e}");
                None
            }
        })
        .collect()
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct SearchModel {
    #[serde(default)]
    docs: Vec<Value>,
}
