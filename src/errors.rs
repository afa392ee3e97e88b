use reqwest::StatusCode;

use crate::inventory::GroupName;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    // Metadata service
    #[error("Metadata request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Metadata service {url} responded with {status}")]
    HttpStatus { url: String, status: StatusCode },
    #[error("Malformed metadata response: {0}")]
    MalformedResponse(String),
    #[error("Malformed value for group {group}: {reason}")]
    MalformedGroupEncoding { group: GroupName, reason: String },

    // Output
    #[error("JSON error {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    // Misc
    #[error("Failed to set up logging: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),
}

impl Error {
    /// Process exit code for this error. Usage errors (2) are reported by clap
    /// before any of these can happen.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Network(_) | Error::HttpStatus { .. } => 3,
            Error::MalformedResponse(_) => 4,
            Error::MalformedGroupEncoding { .. } => 5,
            Error::Json(_) | Error::Output(_) | Error::Logging(_) => 1,
        }
    }
}
