use std::thread;
use std::time::Duration;

use crate::nba::error::FetchError;
use crate::nba::recordset::RecordSet;

/// Bounded retry for timeout-class failures on a single stats call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, not additional retries.
    pub retries: u32,
    pub cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            retries: 3,
            cooldown: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
impl RetryPolicy {
    /// Zero-cooldown policy for tests.
    pub fn immediate(retries: u32) -> Self {
        RetryPolicy {
            retries,
            cooldown: Duration::ZERO,
        }
    }
}

/// Runs one logical fetch with bounded retry on timeouts.
///
/// A completed call returns its record set immediately, even when the set is
/// legitimately empty. Timeouts retry up to `policy.retries` total attempts
/// with a cooldown between them; exhaustion returns the empty sentinel, never
/// an error. Every other failure class propagates unchanged so the caller's
/// own skip logic can see it.
pub fn fetch_with_retry<F>(
    policy: &RetryPolicy,
    what: &str,
    mut op: F,
) -> Result<RecordSet, FetchError>
where
    F: FnMut() -> Result<RecordSet, FetchError>,
{
    for attempt in 1..=policy.retries {
        match op() {
            Ok(record_set) => return Ok(record_set),
            Err(e) if e.is_timeout() => {
                log::warn!(
                    "read timeout fetching {}, retrying {}/{}...",
                    what,
                    attempt,
                    policy.retries
                );
                if attempt < policy.retries {
                    thread::sleep(policy.cooldown);
                }
            }
            Err(e) => return Err(e),
        }
    }
    log::warn!(
        "failed to fetch {} after {} retries",
        what,
        policy.retries
    );
    Ok(RecordSet::empty())
}
