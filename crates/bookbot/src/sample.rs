//! Picking a random suggestion.

use log::{info, trace};
use rand::{seq::SliceRandom, Rng};

use crate::{
    filter::{filter, Criteria},
    BookRecord,
};

/// Number of matches kept for display in a [`Suggestion`].
pub const PREVIEW_LEN: usize = 5;

/// Picks one item uniformly at random, or [`None`] when `items` is empty.
///
/// Every call is independent of the previous ones.
pub fn sample<'a, T, R>(items: &'a [T], rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    items.choose(rng)
}

/// A randomly suggested book together with the matches it was picked from.
#[derive(Debug)]
pub struct Suggestion<'a> {
    /// The suggested book.
    pub book: &'a BookRecord,
    /// Every record that matched the criteria, in their original order.
    pub matches: Vec<&'a BookRecord>,
    /// `true` when nothing matched and the book was picked from the whole collection instead.
    pub fallback: bool,
}

impl<'a> Suggestion<'a> {
    /// The first few matches, at most [`PREVIEW_LEN`].
    #[must_use]
    pub fn preview(&self) -> &[&'a BookRecord] {
        &self.matches[..self.matches.len().min(PREVIEW_LEN)]
    }
}

/// Filters `records` with `criteria` and picks one of the matches.
///
/// When no record matches, a book is picked from all of `records` and the suggestion is marked as
/// a [`Suggestion::fallback`]. [`None`] is only returned when `records` is empty.
pub fn suggest<'a, R>(
    records: &'a [BookRecord],
    criteria: &Criteria,
    rng: &mut R,
) -> Option<Suggestion<'a>>
where
    R: Rng + ?Sized,
{
    if criteria.is_empty() {
        trace!("No filters given - every book is a match");
    }
    let matches = filter(records, criteria);

    if matches.is_empty() {
        info!("No books match the filters - picking from all {} books", records.len());
        return sample(records, rng).map(|book| Suggestion {
            book,
            matches,
            fallback: true,
        });
    }

    trace!("Picking from {} matching books", matches.len());
    let book = *sample(&matches, rng)?;
    Some(Suggestion {
        book,
        matches,
        fallback: false,
    })
}
