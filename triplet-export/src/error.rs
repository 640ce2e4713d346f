use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid endpoint url `{url}`: {reason}")]
    Endpoint { url: String, reason: String },

    #[error("http client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("remote export needs a running tokio runtime")]
    NoRuntime,

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
