use thiserror::Error;

pub type Result<T> = std::result::Result<T, UpsError>;

// Failures below the carrier envelope: nothing usable came back.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("HTTP error: {status_code} - {body}")]
    Status { status_code: u16, body: String },
}

// Errors surfaced by the client.
// A carrier-reported rejection is not represented here. Parsers report it
// through `is_success()` and `error_description()`.
#[derive(Error, Debug)]
pub enum UpsError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl UpsError {
    pub fn is_transport(&self) -> bool {
        matches!(self, UpsError::Transport(_))
    }

    pub fn is_malformed_response(&self) -> bool {
        matches!(self, UpsError::MalformedResponse(_))
    }
}
