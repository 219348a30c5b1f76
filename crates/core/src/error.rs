use thiserror::Error;

#[derive(Error, Debug)]
pub enum TubemarkError {
    #[error("{endpoint} request failed with status {status}: {body}")]
    ApiStatus {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("Invalid ISO-8601 duration: {value:?}")]
    InvalidDuration { value: String },

    #[error("Video details response has no entry for {video_id}")]
    MissingDetails { video_id: String },

    #[error("Markers not found: expected {start} followed by {end}")]
    MarkersNotFound { start: String, end: String },

    #[error("Missing configuration: {env_var} environment variable is not set")]
    MissingConfig { env_var: &'static str },

    #[error("Invalid marker pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, TubemarkError>;
