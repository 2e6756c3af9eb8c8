//! Call bounds.

use std::future::Future;
use std::time::Duration;

/// Awaits `call` for at most `limit`; on expiry builds the error with `on_timeout`.
pub(crate) async fn bounded<T, E, F>(
    limit: Duration,
    call: F,
    on_timeout: impl FnOnce(String) -> E,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout(format!(
            "no response within {} ms",
            limit.as_millis()
        ))),
    }
}
