use thiserror::Error as ThisError;

/// Process configuration that cannot be used. Fatal at startup.
#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("API_BASE_URL is not set; the uniques API base address is required")]
    MissingApiBase,

    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Failure of a single uniques fetch. No partial results accompany it.
#[derive(Debug, ThisError)]
pub enum FetchError {
    #[error("Failed to fetch uniques: {code} {text}")]
    Status { code: u16, text: String },

    #[error("Failed to reach uniques API: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Failed to parse uniques response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    /// HTTP status of the remote response, when the failure was a bad status.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            Self::Transport(_) | Self::Parse(_) => None,
        }
    }
}
