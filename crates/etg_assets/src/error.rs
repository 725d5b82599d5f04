//! Error types for asset overlay operations.
//!
//! All fallible functions in this crate return [`Result<T>`], which uses [`Error`]
//! as the error type. External error types (`std::io::Error`, `zip` errors,
//! `serde_json::Error`, ...) are converted via `From` impls.
//!
//! A lookup that misses the overlay is *not* an error: resolution functions
//! return `Option` and the caller falls back to the host loader.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while crawling, reading or loading overlay assets.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem I/O failed (opening a mapped file, reading a stream, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A mod archive could not be opened or one of its entries could not be read.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failed to parse JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to parse a TOML configuration file.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Directory traversal failed while crawling a resources tree.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// The crawl root is missing or is not a directory.
    #[error("Invalid resources directory: {0}")]
    InvalidRoot(Utf8PathBuf),

    /// The host failed to decode an overlay payload (structured data or image).
    #[error("Failed to decode '{path}': {message}")]
    Decode { path: String, message: String },

    /// Catch-all for errors reported by host collaborators.
    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
