use std::error::Error as _;

use thiserror::Error;

/// Failure classes for one remote stats call.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Timeout-class transport failure, retryable by the per-call wrapper.
    #[error("request timed out")]
    Timeout,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    /// Response arrived but did not have the expected resultSets shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("player {0} not found")]
    PlayerNotFound(String),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout)
    }
}

impl From<ureq::Error> for FetchError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(code, _) => FetchError::Status(code),
            ureq::Error::Transport(t) => {
                if is_timeout_transport(&t) {
                    FetchError::Timeout
                } else {
                    FetchError::Transport(t.to_string())
                }
            }
        }
    }
}

/// Read timeouts surface as io transport errors, but so do resets and
/// premature closes; only a timed-out underlying socket read counts as the
/// retryable class.
fn is_timeout_transport(t: &ureq::Transport) -> bool {
    if !matches!(t.kind(), ureq::ErrorKind::Io) {
        return false;
    }
    t.source()
        .and_then(|s| s.downcast_ref::<std::io::Error>())
        .map(|io| {
            matches!(
                io.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            )
        })
        .unwrap_or(false)
}

/// Failure classes for the derived efficiency computations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MetricsError {
    #[error("cannot compute efficiency with zero minutes played")]
    ZeroMinutes,

    #[error("league average efficiency is zero")]
    ZeroLeagueAverage,

    #[error("league record set has no usable rows")]
    NoLeagueData,
}
