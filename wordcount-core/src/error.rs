use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, WordCountError>;

/// Errors surfaced while reading, counting or writing
#[derive(Error, Debug)]
pub enum WordCountError {
    /// An I/O operation on `path` failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File or directory being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Input path does not exist
    #[error("Input path does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Input pattern resolved to zero files
    #[error("Input pattern {0} matches 0 files")]
    NoInputFiles(String),

    /// Input glob could not be parsed
    #[error("Invalid input pattern {pattern}: {source}")]
    InvalidPattern {
        /// Offending pattern
        pattern: String,
        /// Parser error
        #[source]
        source: glob::PatternError,
    },

    /// Output directory is already present
    #[error("Output directory {} already exists", .0.display())]
    OutputExists(PathBuf),

    /// Job settings are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Record could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Worker pool could not be started
    #[error("Unable to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl WordCountError {
    /// Wraps an `io::Error` with the path it occurred on
    pub fn io<P: AsRef<Path>>(path: P, source: io::Error) -> Self {
        WordCountError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Attaches a path to `io::Result`s
pub(crate) trait IoContext<T> {
    fn with_path<P: AsRef<Path>>(self, path: P) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn with_path<P: AsRef<Path>>(self, path: P) -> Result<T> {
        self.map_err(|e| WordCountError::io(path, e))
    }
}

#[cfg(test)]
mod test_error {
    use super::*;

    #[test]
    fn test_io_message_names_path() {
        let err = WordCountError::io("/tmp/missing", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(format!("{}", err), "I/O error on /tmp/missing: gone");
    }

    #[test]
    fn test_with_path() {
        let res: io::Result<()> = Err(io::Error::new(io::ErrorKind::Other, "boom"));
        match res.with_path("a/b") {
            Err(WordCountError::Io { path, .. }) => assert_eq!(path, PathBuf::from("a/b")),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
