pub(crate) type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The Errors that may occur when calling the bookbot functions.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<DynError>,
}

/// Types of errors that make up an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request could not be sent, timed out or the server answered with a non-success status.
    Network,
    /// An error caused when parsing/deserialization fails.
    Deserialize,
    /// A file was expected to exist but could not be found.
    FileNotFound,
    /// Text was entered where an integer value was expected.
    InvalidInput,
    /// The error is associated with an underlying IO error.
    IO,
}

impl Error {
    /// Creates a new [`Error`] based on the [`ErrorKind`] and message to describe the error.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            source: None,
        }
    }

    /// Wraps an existing error as the source of [`Error`].
    pub fn wrap<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<DynError>,
    {
        Self {
            kind,
            message: None,
            source: Some(source.into()),
        }
    }

    /// Adds a message describing the context in which the error occurred.
    #[must_use]
    pub fn with_message<S: Into<String>>(mut self, message: S) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the kind of error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::Network => f.write_str("Network error")?,
            ErrorKind::Deserialize => f.write_str("Deserialize error")?,
            ErrorKind::FileNotFound => f.write_str("File not found")?,
            ErrorKind::InvalidInput => f.write_str("Invalid input")?,
            ErrorKind::IO => f.write_str("IO error")?,
        };

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(cause) = &self.source {
            write!(f, ": caused by {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| &**e as _)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_message_and_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = Error::wrap(ErrorKind::FileNotFound, io).with_message("books_data.csv");

        assert_eq!(
            "File not found: books_data.csv: caused by no such file",
            err.to_string()
        );
        assert_eq!(ErrorKind::FileNotFound, err.kind());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn display_without_cause() {
        let err = Error::new(ErrorKind::InvalidInput, "'abc' is not a whole number");
        assert_eq!("Invalid input: 'abc' is not a whole number", err.to_string());
    }
}
