use thiserror::Error;

#[derive(Error, Debug)]
pub enum TarpullError {
    // Config errors
    #[error("Failed to load registry configuration: {reason}")]
    ConfigLoad { reason: String },

    // Registry errors
    #[error("Registry query failed for {target}: {reason}")]
    Query { target: String, reason: String },

    #[error("Malformed registry reply for {target}")]
    MalformedReply { target: String },

    // Download errors
    #[error("Download failed for {url}: {reason}")]
    Download { url: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // JSON/parsing errors
    #[error("Failed to parse registry reply: {0}")]
    JsonParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TarpullError>;
