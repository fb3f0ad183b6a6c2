use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("request to '{url}' failed with status {status}")]
    Fetch { url: String, status: u16 },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("no '{variable}' assignment found in document")]
    NotFound { variable: String },

    #[error("no matching closing brace for the '{variable}' object")]
    Unterminated { variable: String },

    #[error("'{variable}' span is not valid JSON ({source}): {excerpt}")]
    MalformedJson {
        variable: String,
        excerpt: String,
        source: serde_json::Error,
    },

    #[error("channel identifier not found in page data")]
    IdentifierNotFound,

    #[error("invalid filter: {0}")]
    InvalidFilter(String),
}
