//! The normalized [`BookRecord`] and the rules for producing one from a raw search document.

use log::warn;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Title used when a document has no title.
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Authors used when a document has no author names.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
/// Genres used when a document has no subjects.
pub const UNKNOWN_GENRE: &str = "Unknown Genre";
/// Separator used to join multi-valued fields into a single string.
pub const LIST_SEPARATOR: &str = ", ";

/// One normalized book entry.
///
/// `authors` and `genres` are always present after normalization so they can be searched
/// without checking for a missing value first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Title of the book.
    pub title: String,
    /// Author names joined with [`LIST_SEPARATOR`].
    pub authors: String,
    /// Subjects joined with [`LIST_SEPARATOR`].
    pub genres: String,
    /// Year of first publication, when known.
    #[serde(default, deserialize_with = "crate::store::whole_number_cell")]
    pub published_year: Option<i64>,
    /// Number of editions.
    pub edition_count: i64,
}

impl BookRecord {
    /// Normalizes a raw search document, see [`RawDocument`].
    #[must_use]
    pub fn normalize(raw: RawDocument) -> Self {
        Self::from(raw)
    }

    /// The individual genre names of this record, trimmed and without empty names.
    pub fn genre_list(&self) -> impl Iterator<Item = &str> {
        self.genres
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
    }
}

/// A multi-valued document field that may be absent.
///
/// An absent list and a list with no values are treated the same: both are replaced by the
/// default given to [`ValueList::join_or`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueList(Option<Vec<String>>);

impl ValueList {
    /// Wraps a list of values.
    #[must_use]
    pub const fn new(values: Vec<String>) -> Self {
        Self(Some(values))
    }

    /// A list that was not present in the document.
    #[must_use]
    pub const fn absent() -> Self {
        Self(None)
    }

    /// Returns `true` when there is no value to join.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.as_ref().map_or(true, Vec::is_empty)
    }

    /// Joins the values with [`LIST_SEPARATOR`] or returns `default` when there are none.
    #[must_use]
    pub fn join_or(self, default: &str) -> String {
        if self.is_empty() {
            return default.to_owned();
        }
        self.0.unwrap_or_default().join(LIST_SEPARATOR)
    }
}

impl<'de> Deserialize<'de> for ValueList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let list = match Value::deserialize(deserializer)? {
            Value::Array(items) => Self::new(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        other => {
                            warn!("Ignoring non-text list value '{other}'");
                            None
                        }
                    })
                    .collect(),
            ),
            Value::String(s) => Self::new(vec![s]),
            _ => Self::absent(),
        };
        Ok(list)
    }
}

/// A single document as returned by the search API.
///
/// Every field is optional and a field holding an unexpected JSON type is treated as absent, so
/// one odd field never prevents the rest of the document from being read.
#[derive(Debug, Default, Deserialize)]
pub struct RawDocument {
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default)]
    author_name: ValueList,
    #[serde(default)]
    subject: ValueList,
    #[serde(default, deserialize_with = "lenient")]
    first_publish_year: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    edition_count: Option<i64>,
}

impl RawDocument {
    /// Attempts to read a raw document from any JSON value.
    ///
    /// Only fails when `value` is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

impl From<RawDocument> for BookRecord {
    fn from(raw: RawDocument) -> Self {
        let RawDocument {
            title,
            author_name,
            subject,
            first_publish_year,
            edition_count,
        } = raw;

        Self {
            title: title.unwrap_or_else(|| UNKNOWN_TITLE.to_owned()),
            authors: author_name.join_or(UNKNOWN_AUTHOR),
            genres: subject.join_or(UNKNOWN_GENRE),
            published_year: first_publish_year,
            edition_count: edition_count.unwrap_or_default(),
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match T::deserialize(value) {
        Ok(v) => Ok(Some(v)),
        Err(e) => {
            warn!("Ignoring unexpected document field value: {e}");
            Ok(None)
        }
    }
}
