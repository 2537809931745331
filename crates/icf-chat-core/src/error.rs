use thiserror::Error;

/// Why a round trip to the chat endpoint failed.
///
/// Users only ever see [`crate::state::ERROR_TEXT`]; the variants are kept
/// apart for the log.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("could not reach chat endpoint: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("chat endpoint returned status {0}")]
    Status(u16),

    #[error("chat endpoint returned an unreadable body: {0}")]
    Decode(String),

    #[error("chat request task did not finish: {0}")]
    Task(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ChatError::Decode(err.to_string())
        } else {
            ChatError::Transport(err)
        }
    }
}
