//! State fetcher trait and retry policy

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::document::RawState;
use crate::error::StateResult;

/// Maximum attempts for one storage fetch, including the first
pub const MAX_FETCH_ATTEMPTS: u32 = 3;

/// Delay before the first retry; doubles on each subsequent one
const INITIAL_BACKOFF: Duration = Duration::from_millis(200);

/// Trait for retrieving raw state bytes from a backend
///
/// Implementations perform network or file I/O only; state is never
/// mutated.
#[async_trait]
pub trait StateFetcher: Send + Sync {
    /// Retrieve the raw state document
    async fn fetch(&self) -> StateResult<RawState>;
}

/// Run a storage fetch with bounded exponential backoff
///
/// Only errors classified as retryable (network, I/O) are retried;
/// authorization and not-found responses fail on the first attempt.
pub(crate) async fn fetch_with_retry<F, Fut>(origin: &str, operation: F) -> StateResult<RawState>
where
    F: Fn() -> Fut,
    Fut: Future<Output = StateResult<RawState>>,
{
    let mut delay = INITIAL_BACKOFF;
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(raw) => return Ok(raw),
            Err(error) if error.is_retryable() && attempt < MAX_FETCH_ATTEMPTS => {
                tracing::debug!(origin, attempt, error = %error, "transient fetch failure, retrying");
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}
