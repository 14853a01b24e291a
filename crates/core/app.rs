use std::{io::Write, path::PathBuf};

use bookbot::{
    filter::{available_genres, Criteria},
    sample::{suggest, Suggestion},
    store, BookRecord, ErrorKind,
};
use eyre::Result;
use log::{error, info, trace, warn};
use rand::Rng;

use crate::interact::Prompt;

const SOURCES: [&str; 2] = [
    "Fetch fresh data from Open Library",
    "Load existing data from the CSV file",
];

/// Where the interaction loop is, carrying the records it is working with.
#[derive(Debug, PartialEq)]
pub enum Step {
    ChooseSource,
    AwaitFilters(Vec<BookRecord>),
    ShowSuggestion(Vec<BookRecord>, Criteria),
    AskRepeat(Vec<BookRecord>),
    Done,
}

pub struct App<P, F, R, W> {
    prompt: P,
    fetch: F,
    rng: R,
    out: W,
    file: PathBuf,
}

impl<P, F, R, W> App<P, F, R, W>
where
    P: Prompt,
    F: FnMut(&str) -> Vec<BookRecord>,
    R: Rng,
    W: Write,
{
    pub fn new(prompt: P, fetch: F, rng: R, out: W, file: PathBuf) -> Self {
        Self {
            prompt,
            fetch,
            rng,
            out,
            file,
        }
    }

    /// Runs the interaction loop until the user has had enough suggestions.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.out, "Welcome to the Book Suggestion Bot!")?;

        let mut step = Step::ChooseSource;
        while step != Step::Done {
            step = self.next(step)?;
        }
        Ok(())
    }

    pub fn next(&mut self, step: Step) -> Result<Step> {
        match step {
            Step::ChooseSource => self.choose_source(),
            Step::AwaitFilters(records) => self.await_filters(records),
            Step::ShowSuggestion(records, criteria) => self.show_suggestion(records, &criteria),
            Step::AskRepeat(records) => self.ask_repeat(records),
            Step::Done => Ok(Step::Done),
        }
    }

    fn choose_source(&mut self) -> Result<Step> {
        let records = match self.prompt.select("Where should the books come from?", &SOURCES)? {
            Some(0) => self.fetch_records()?,
            Some(_) => self.load_records(),
            None => {
                writeln!(self.out, "Please choose where the books should come from.")?;
                None
            }
        };

        Ok(match records {
            Some(records) => Step::AwaitFilters(records),
            None => Step::ChooseSource,
        })
    }

    fn fetch_records(&mut self) -> Result<Option<Vec<BookRecord>>> {
        let query = self
            .prompt
            .input("Enter a search term for books (e.g., fiction, science)")?;
        if query.is_empty() {
            warn!("A search term is required to fetch books");
            return Ok(None);
        }

        let records = (self.fetch)(&query);
        if records.is_empty() {
            writeln!(
                self.out,
                "No books fetched, try again or load existing data."
            )?;
            return Ok(None);
        }

        if let Err(err) = store::save(&records, &self.file) {
            error!("{err}");
        }
        Ok(Some(records))
    }

    fn load_records(&mut self) -> Option<Vec<BookRecord>> {
        match store::load(&self.file) {
            Ok(records) if records.is_empty() => {
                warn!("{} has no books. Please fetch data first.", self.file.display());
                None
            }
            Ok(records) => Some(records),
            // already reported by the store
            Err(err) if err.kind() == ErrorKind::FileNotFound => None,
            Err(err) => {
                error!("{err}");
                None
            }
        }
    }

    fn await_filters(&mut self, records: Vec<BookRecord>) -> Result<Step> {
        let genres = available_genres(&records);
        writeln!(self.out, "\nAvailable genres in data:")?;
        writeln!(
            self.out,
            "{}",
            genres.into_iter().collect::<Vec<_>>().join(", ")
        )?;

        let genre = self
            .prompt
            .input("Enter genre to filter by (or press Enter to skip)")?;
        let min_edition_count = self
            .prompt
            .input("Enter minimum edition count to filter by (or press Enter to skip)")?;
        let min_year = self
            .prompt
            .input("Enter minimum publication year to filter by (or press Enter to skip)")?;
        let max_year = self
            .prompt
            .input("Enter maximum publication year to filter by (or press Enter to skip)")?;

        match Criteria::parse(&genre, &min_edition_count, &min_year, &max_year) {
            Ok(criteria) => Ok(Step::ShowSuggestion(records, criteria)),
            Err(err) => {
                error!("{err}");
                writeln!(self.out, "Invalid numeric input. Please try again.")?;
                Ok(Step::AwaitFilters(records))
            }
        }
    }

    fn show_suggestion(&mut self, records: Vec<BookRecord>, criteria: &Criteria) -> Result<Step> {
        trace!("Suggesting a book with {criteria:?}");
        match suggest(&records, criteria, &mut self.rng) {
            Some(suggestion) => write_suggestion(&mut self.out, &suggestion)?,
            None => info!("There are no books to suggest from"),
        }
        Ok(Step::AskRepeat(records))
    }

    fn ask_repeat(&mut self, records: Vec<BookRecord>) -> Result<Step> {
        if self
            .prompt
            .confirm("Would you like another suggestion?", false)?
        {
            Ok(Step::AwaitFilters(records))
        } else {
            writeln!(self.out, "Thank you for using the Book Suggestion Bot. Happy reading!")?;
            Ok(Step::Done)
        }
    }
}

fn write_suggestion<W: Write>(out: &mut W, suggestion: &Suggestion<'_>) -> std::io::Result<()> {
    if suggestion.fallback {
        writeln!(
            out,
            "No books found matching the filters. Suggesting a random book from the entire dataset."
        )?;
    } else {
        writeln!(
            out,
            "\nFound {} books matching your criteria.",
            suggestion.matches.len()
        )?;
        for book in suggestion.preview() {
            writeln!(
                out,
                "  {} | {} | {} | {} editions",
                book.title,
                book.authors,
                year_text(book),
                book.edition_count
            )?;
        }
    }

    let book = suggestion.book;
    writeln!(out, "\nRandom Book Suggestion:")?;
    writeln!(out, "Title: {}", book.title)?;
    writeln!(out, "Author(s): {}", book.authors)?;
    writeln!(out, "Genre(s): {}", book.genres)?;
    writeln!(out, "Published Year: {}", year_text(book))?;
    writeln!(out, "Edition Count: {}", book.edition_count)
}

fn year_text(book: &BookRecord) -> String {
    book.published_year
        .map_or_else(|| "Unknown".to_owned(), |y| y.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interact::{Answer, Scripted};

    use assert_fs::{prelude::*, TempDir};
    use rand::{rngs::StdRng, SeedableRng};

    fn book(title: &str, genres: &str, year: Option<i64>, editions: i64) -> BookRecord {
        BookRecord {
            title: title.to_owned(),
            authors: "Someone".to_owned(),
            genres: genres.to_owned(),
            published_year: year,
            edition_count: editions,
        }
    }

    fn records() -> Vec<BookRecord> {
        vec![
            book("A", "Fiction, Drama", Some(2001), 5),
            book("B", "Science", Some(1995), 2),
        ]
    }

    type TestApp<F> = App<Scripted, F, StdRng, Vec<u8>>;

    fn app<F>(answers: Vec<Answer>, fetch: F, file: PathBuf) -> TestApp<F>
    where
        F: FnMut(&str) -> Vec<BookRecord>,
    {
        App::new(
            Scripted::new(answers),
            fetch,
            StdRng::seed_from_u64(5),
            Vec::new(),
            file,
        )
    }

    fn no_fetch(_: &str) -> Vec<BookRecord> {
        panic!("fetch should not be called")
    }

    fn output<F>(app: &TestApp<F>) -> String {
        String::from_utf8(app.out.clone()).unwrap()
    }

    #[test]
    fn fetched_records_are_saved_and_used() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        let file = dir.child("books.csv");
        let mut queries = Vec::new();

        let mut app = app(
            vec![Answer::Select(0), Answer::Input("fiction")],
            |q: &str| {
                queries.push(q.to_owned());
                records()
            },
            file.path().to_path_buf(),
        );

        let step = app.next(Step::ChooseSource).unwrap();
        drop(app);

        assert_eq!(Step::AwaitFilters(records()), step);
        assert_eq!(vec!["fiction".to_owned()], queries);
        assert_eq!(records(), store::load(file.path()).unwrap());
    }

    #[test]
    fn nothing_fetched_returns_to_source_choice() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        let mut app = app(
            vec![Answer::Select(0), Answer::Input("zzzz")],
            |_: &str| Vec::new(),
            dir.child("books.csv").path().to_path_buf(),
        );

        assert_eq!(Step::ChooseSource, app.next(Step::ChooseSource).unwrap());
        assert!(output(&app).contains("No books fetched"));
    }

    #[test]
    fn blank_query_is_not_fetched() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        let mut app = app(
            vec![Answer::Select(0), Answer::Input("  ")],
            no_fetch,
            dir.child("books.csv").path().to_path_buf(),
        );

        assert_eq!(Step::ChooseSource, app.next(Step::ChooseSource).unwrap());
    }

    #[test]
    fn dismissed_source_choice_asks_again() {
        let mut app = app(vec![Answer::Cancel], no_fetch, PathBuf::from("unused.csv"));

        assert_eq!(Step::ChooseSource, app.next(Step::ChooseSource).unwrap());
        assert!(output(&app).contains("Please choose where the books should come from."));
    }

    #[test]
    fn pressing_enter_on_repeat_ends_the_session() {
        let mut app = app(vec![Answer::Enter], no_fetch, PathBuf::from("unused.csv"));

        assert_eq!(Step::Done, app.next(Step::AskRepeat(records())).unwrap());
        assert!(output(&app).ends_with("Happy reading!\n"));
    }

    #[test]
    fn missing_file_returns_to_source_choice() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        let mut app = app(
            vec![Answer::Select(1)],
            no_fetch,
            dir.child("missing.csv").path().to_path_buf(),
        );

        assert_eq!(Step::ChooseSource, app.next(Step::ChooseSource).unwrap());
    }

    #[test]
    fn existing_file_is_loaded() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        let file = dir.child("books.csv");
        store::save(&records(), file.path()).unwrap();

        let mut app = app(vec![Answer::Select(1)], no_fetch, file.path().to_path_buf());

        assert_eq!(
            Step::AwaitFilters(records()),
            app.next(Step::ChooseSource).unwrap()
        );
    }

    #[test]
    fn invalid_number_restarts_the_filter_round() {
        let mut app = app(
            vec![
                Answer::Input("fiction"),
                Answer::Input("three"),
                Answer::Input(""),
                Answer::Input(""),
            ],
            no_fetch,
            PathBuf::from("unused.csv"),
        );

        let step = app.next(Step::AwaitFilters(records())).unwrap();

        assert_eq!(Step::AwaitFilters(records()), step);
        let out = output(&app);
        assert!(out.contains("Drama, Fiction, Science"));
        assert!(out.contains("Invalid numeric input"));
    }

    #[test]
    fn filters_become_criteria() {
        let mut app = app(
            vec![
                Answer::Input("fiction"),
                Answer::Input("3"),
                Answer::Input(""),
                Answer::Input(""),
            ],
            no_fetch,
            PathBuf::from("unused.csv"),
        );

        let step = app.next(Step::AwaitFilters(records())).unwrap();

        assert_eq!(
            Step::ShowSuggestion(
                records(),
                Criteria::new().with_genre("fiction").with_min_edition_count(3)
            ),
            step
        );
    }

    #[test]
    fn suggestion_is_shown() {
        let mut app = app(vec![], no_fetch, PathBuf::from("unused.csv"));
        let criteria = Criteria::new().with_min_year(1990).with_max_year(2000);

        let step = app
            .next(Step::ShowSuggestion(records(), criteria))
            .unwrap();

        assert_eq!(Step::AskRepeat(records()), step);
        let out = output(&app);
        assert!(out.contains("Found 1 books matching your criteria."));
        assert!(out.contains("Title: B"));
        assert!(out.contains("Author(s): Someone"));
        assert!(out.contains("Genre(s): Science"));
        assert!(out.contains("Published Year: 1995"));
    }

    #[test]
    fn no_match_suggests_from_everything() {
        let mut app = app(vec![], no_fetch, PathBuf::from("unused.csv"));
        let criteria = Criteria::new().with_genre("poetry");

        app.next(Step::ShowSuggestion(records(), criteria)).unwrap();

        let out = output(&app);
        assert!(out.contains("Suggesting a random book from the entire dataset."));
        assert!(out.contains("Random Book Suggestion:"));
    }

    #[test]
    fn full_session_until_done() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        let file = dir.child("books.csv");
        store::save(&[book("Only", "Poetry", None, 1)], file.path()).unwrap();

        let mut app = app(
            vec![
                Answer::Select(1),
                Answer::Input("poetry"),
                Answer::Input(""),
                Answer::Input(""),
                Answer::Input(""),
                Answer::Confirm(true),
                Answer::Input(""),
                Answer::Input(""),
                Answer::Input("1900"),
                Answer::Input(""),
                Answer::Confirm(false),
            ],
            no_fetch,
            file.path().to_path_buf(),
        );

        app.run().unwrap();

        let out = output(&app);
        assert!(out.starts_with("Welcome to the Book Suggestion Bot!"));
        assert!(out.contains("Published Year: Unknown"));
        assert_eq!(2, out.matches("Title: Only").count());
        assert!(out.contains("entire dataset"));
        assert!(out.ends_with("Happy reading!\n"));
        assert_eq!(11, app.prompt.asked.len());
    }
}
