//! Saving and loading [`BookRecord`]s as a CSV file.
//!
//! The file has a header row (`title,authors,genres,published_year,edition_count`) followed by
//! one row per record. An unknown year is written as an empty cell.

use std::{
    fs::File,
    io::{self, Read, Write},
    path::Path,
};

use log::{error, info, trace};
use serde::{de, Deserialize, Deserializer};

use crate::{BookRecord, Error, ErrorKind};

/// Name of the file used when no other file is chosen.
pub const DEFAULT_FILE_NAME: &str = "books_data.csv";

/// Writes `records` to the file at `path`, replacing any existing content.
///
/// # Errors
///
/// An [`Err`] is returned when the file cannot be created or written to.
pub fn save<P: AsRef<Path>>(records: &[BookRecord], path: P) -> Result<(), Error> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| {
        Error::wrap(ErrorKind::IO, e)
            .with_message(format!("Cannot create the '{}' file", path.display()))
    })?;

    write_records(file, records)?;
    info!("Data saved to {}", path.display());
    Ok(())
}

/// Reads every record from the file at `path`.
///
/// # Errors
///
/// An [`Err`] of kind [`ErrorKind::FileNotFound`] is returned when there is no file at `path`.
/// An [`Err`] is returned when the file cannot be read or a row is not a valid record.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<BookRecord>, Error> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            error!("File {} not found. Please fetch data first.", path.display());
            Error::wrap(ErrorKind::FileNotFound, e)
                .with_message(format!("'{}' does not exist", path.display()))
        } else {
            Error::wrap(ErrorKind::IO, e)
                .with_message(format!("Cannot open the '{}' file", path.display()))
        }
    })?;

    let records = read_records(file)?;
    info!("Loaded {} books from {}", records.len(), path.display());
    Ok(records)
}

/// Writes a header row and one row per record to `writer`.
///
/// # Errors
///
/// An [`Err`] is returned when writing to `writer` fails.
pub fn write_records<W: Write>(writer: W, records: &[BookRecord]) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_writer(writer);

    // serialize only emits the header with the first row
    if records.is_empty() {
        wtr.write_record(HEADER).map_err(csv_error)?;
    }
    for record in records {
        wtr.serialize(record).map_err(csv_error)?;
    }

    wtr.flush()
        .map_err(|e| Error::wrap(ErrorKind::IO, e).with_message("Cannot flush records"))
}

/// Reads records from `reader`, which must start with a header row.
///
/// # Errors
///
/// An [`Err`] of kind [`ErrorKind::Deserialize`] is returned when a row is not a valid record.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<BookRecord>, Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    rdr.deserialize::<BookRecord>()
        .enumerate()
        .map(|(i, row)| {
            trace!("Reading row {}", i + 1);
            row.map_err(|e| {
                Error::wrap(ErrorKind::Deserialize, e).with_message(format!("Invalid row {}", i + 1))
            })
        })
        .collect()
}

const HEADER: [&str; 5] = [
    "title",
    "authors",
    "genres",
    "published_year",
    "edition_count",
];

fn csv_error(e: csv::Error) -> Error {
    let kind = if e.is_io_error() {
        ErrorKind::IO
    } else {
        ErrorKind::Deserialize
    };
    Error::wrap(kind, e)
}

/// 2^63, the first whole float past `i64::MAX`.
const I64_FLOAT_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Reads an optional whole number from a cell, accepting a float with no fractional part
/// (`2001.0`) as dataframe tools write integer columns that have gaps.
///
/// Floats outside the `i64` range are rejected rather than saturated.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn whole_number_cell<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(cell) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }

    if let Ok(n) = cell.parse::<i64>() {
        return Ok(Some(n));
    }
    match cell.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && (-I64_FLOAT_LIMIT..I64_FLOAT_LIMIT).contains(&f) => {
            Ok(Some(f as i64))
        }
        _ => Err(de::Error::custom(format!("'{cell}' is not a whole number"))),
    }
}
