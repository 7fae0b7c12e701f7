//! Timeout enforcement.
//!
//! Uses Tokio's timeout facilities. A timeout is reported as its own error
//! variant so logs can tell a slow upstream from an unreachable one.

use std::future::Future;
use std::time::Duration;

use crate::error::ProxyError;

/// Await `fut`, giving up after `deadline`.
///
/// Dropping the inner future on expiry aborts the in-flight upstream call.
pub async fn with_deadline<F, T>(deadline: Duration, fut: F) -> Result<T, ProxyError>
where
    F: Future<Output = Result<T, ProxyError>>,
{
    tokio::time::timeout(deadline, fut)
        .await
        .map_err(|_| ProxyError::Timeout(deadline))?
}
