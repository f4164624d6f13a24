//! Error types for cf-whitelist.
//!
//! Every failure surfaces through [`WhitelistError`]; nothing is recovered
//! locally. The binary maps each error to a process exit code.

use std::path::PathBuf;
use thiserror::Error;

/// Exit code for a missing or unusable credential.
pub const EXIT_CONFIG: i32 = 1;

/// Exit code for every other failure (`EX_UNAVAILABLE`).
pub const EXIT_FAILURE: i32 = 69;

/// Errors that can occur while whitelisting addresses.
#[derive(Error, Debug)]
pub enum WhitelistError {
    /// A required environment variable is not set.
    #[error("{key} environment variable required.")]
    MissingEnv {
        /// Name of the missing variable.
        key: String,
    },

    /// A credential could not be turned into an HTTP header value.
    #[error("invalid value for header '{name}'")]
    InvalidHeader {
        /// Header name.
        name: &'static str,
    },

    /// Failed to open or read the input file.
    #[error("failed to read input file '{path}': {source}")]
    InputFileRead {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize a request body.
    #[error("failed to serialize JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// HTTP request failed at the transport level.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// The response body was not JSON.
    #[error("failed to parse {action} response (HTTP {status}): {source}")]
    ResponseParse {
        /// Action that produced the response.
        action: &'static str,
        /// HTTP status code of the response.
        status: u16,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The response was JSON but not in the expected shape.
    #[error("unexpected {action} response: {message}")]
    UnexpectedResponse {
        /// Action that produced the response.
        action: &'static str,
        /// Description of what was wrong.
        message: String,
    },

    /// The API returned errors instead of a result.
    #[error("{action} failed: {errors}")]
    Api {
        /// Action that produced the response.
        action: &'static str,
        /// Error messages reported by the API.
        errors: String,
    },

    /// The account has no active zones to choose from.
    #[error("no active zones found for this account")]
    NoZones,

    /// Reading from or writing to the terminal failed.
    #[error("prompt failed: {0}")]
    Prompt(#[source] std::io::Error),
}

impl WhitelistError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingEnv { .. } | Self::InvalidHeader { .. } => EXIT_CONFIG,
            _ => EXIT_FAILURE,
        }
    }
}

/// Result type alias for cf-whitelist operations.
pub type Result<T> = std::result::Result<T, WhitelistError>;
