use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SoundingError {
    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("No <H2> station header found in report")]
    MissingHeader,

    #[error("Expected two <PRE> blocks in report, found {found}")]
    MissingBlocks { found: usize },

    #[error("Failed to compress payload")]
    Encode(#[source] std::io::Error),

    #[error("Failed to serialise aggregate to JSON")]
    Json(#[from] serde_json::Error),

    #[error("Upload of '{key}' failed")]
    Store {
        key: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Upload of '{key}' rejected with status {status}")]
    StoreStatus {
        key: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to write '{path}'")]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lag of {hours} hours reaches outside the representable calendar")]
    LagOutOfRange { hours: u32 },
}

/// The pipeline step a per-station failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Window,
    Fetch,
    Parse,
    Publish,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Window => "window",
            Stage::Fetch => "fetch",
            Stage::Parse => "parse",
            Stage::Publish => "publish",
        };
        f.write_str(name)
    }
}

impl SoundingError {
    pub fn stage(&self) -> Stage {
        match self {
            SoundingError::LagOutOfRange { .. } => Stage::Window,
            SoundingError::HttpClient(_)
            | SoundingError::NetworkRequest(..)
            | SoundingError::HttpStatus { .. } => Stage::Fetch,
            SoundingError::MissingHeader | SoundingError::MissingBlocks { .. } => Stage::Parse,
            _ => Stage::Publish,
        }
    }
}

pub type Result<T, E = SoundingError> = std::result::Result<T, E>;
