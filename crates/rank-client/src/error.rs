//! Errors raised while talking to the ranking oracle.
//!
//! None of these reach the engine's caller: `OracleRanker` turns every one
//! of them into a genre-scorer fallback.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankingError {
    /// Connection refused, DNS failure, timeout, or client construction
    #[error("Transport error talking to ranking oracle: {0}")]
    Transport(#[from] reqwest::Error),

    /// The oracle answered with a non-success status
    #[error("Ranking oracle returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The body could not be decoded into a chat completion
    #[error("Invalid response from ranking oracle: {0}")]
    InvalidResponse(String),
}

impl RankingError {
    /// True for failures caused by the request deadline
    pub fn is_timeout(&self) -> bool {
        matches!(self, RankingError::Transport(e) if e.is_timeout())
    }
}
