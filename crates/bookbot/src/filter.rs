//! Narrowing a collection of [`BookRecord`]s with optional [`Criteria`].

use std::collections::BTreeSet;

use log::trace;

use crate::{BookRecord, Error, ErrorKind};

/// A set of optional predicates, all of which must hold for a record to match.
///
/// An absent predicate lets every record through. A record without a `published_year` never
/// satisfies a year bound.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Criteria {
    genre: Option<String>,
    min_edition_count: Option<i64>,
    min_year: Option<i64>,
    max_year: Option<i64>,
}

impl Criteria {
    /// Criteria that match every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds criteria from text as entered by a user.
    ///
    /// Blank values skip the filter they are for.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::InvalidInput`] is returned when one of the numeric
    /// values is not blank and is not a whole number.
    pub fn parse(
        genre: &str,
        min_edition_count: &str,
        min_year: &str,
        max_year: &str,
    ) -> Result<Self, Error> {
        Ok(Self {
            genre: non_blank(genre).map(str::to_owned),
            min_edition_count: parse_number("minimum edition count", min_edition_count)?,
            min_year: parse_number("minimum year", min_year)?,
            max_year: parse_number("maximum year", max_year)?,
        })
    }

    /// Only match records whose genres contain `genre`, ignoring case.
    #[must_use]
    pub fn with_genre<S: Into<String>>(mut self, genre: S) -> Self {
        let genre = genre.into();
        self.genre = non_blank(&genre).map(str::to_owned);
        self
    }

    /// Only match records with at least `count` editions.
    #[must_use]
    pub fn with_min_edition_count(mut self, count: i64) -> Self {
        self.min_edition_count = Some(count);
        self
    }

    /// Only match records first published in or after `year`.
    #[must_use]
    pub fn with_min_year(mut self, year: i64) -> Self {
        self.min_year = Some(year);
        self
    }

    /// Only match records first published in or before `year`.
    #[must_use]
    pub fn with_max_year(mut self, year: i64) -> Self {
        self.max_year = Some(year);
        self
    }

    /// Returns `true` when no predicate is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.genre.is_none()
            && self.min_edition_count.is_none()
            && self.min_year.is_none()
            && self.max_year.is_none()
    }

    /// Returns `true` when `book` satisfies every predicate that is set.
    #[must_use]
    pub fn matches(&self, book: &BookRecord) -> bool {
        self.genre_matches(book)
            && self
                .min_edition_count
                .map_or(true, |min| book.edition_count >= min)
            && year_within(book.published_year, self.min_year, |year, min| year >= min)
            && year_within(book.published_year, self.max_year, |year, max| year <= max)
    }

    fn genre_matches(&self, book: &BookRecord) -> bool {
        self.genre.as_ref().map_or(true, |genre| {
            book.genres
                .to_lowercase()
                .contains(&genre.to_lowercase())
        })
    }
}

fn year_within(year: Option<i64>, bound: Option<i64>, cmp: fn(i64, i64) -> bool) -> bool {
    match (year, bound) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(year), Some(bound)) => cmp(year, bound),
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

fn parse_number(name: &str, value: &str) -> Result<Option<i64>, Error> {
    non_blank(value)
        .map(|v| {
            v.parse::<i64>().map_err(|e| {
                Error::wrap(ErrorKind::InvalidInput, e)
                    .with_message(format!("'{v}' is not a whole number for the {name}"))
            })
        })
        .transpose()
}

/// Returns the records matching `criteria`, in their original order.
pub fn filter<'a, I>(records: I, criteria: &Criteria) -> Vec<&'a BookRecord>
where
    I: IntoIterator<Item = &'a BookRecord>,
{
    let matches = records
        .into_iter()
        .filter(|book| criteria.matches(book))
        .collect::<Vec<_>>();
    trace!("{} records matched {criteria:?}", matches.len());
    matches
}

/// The sorted set of every genre name found in `records`.
pub fn available_genres<'a, I>(records: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a BookRecord>,
{
    records
        .into_iter()
        .flat_map(BookRecord::genre_list)
        .map(str::to_owned)
        .collect()
}
