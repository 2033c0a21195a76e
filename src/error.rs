use thiserror::Error;

/// Errors raised while handling one metrics invocation. Everything here is
/// caught and logged at the invocation boundary; the host never sees a failure.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("error {status} sending to MoogSoft: {reason}")]
    Forwarding { status: u16, reason: String },

    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
