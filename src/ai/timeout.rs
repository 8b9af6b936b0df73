//! Timeout Helpers
//!
//! Wraps async operations in `tokio::time::timeout` and maps expiry onto
//! [`GatewayError::Timeout`] so callers handle it like any other failure.
//!
//! ## Usage
//!
//! ```ignore
//! use crate::ai::timeout::with_timeout;
//!
//! let text = with_timeout(
//!     Duration::from_secs(60),
//!     backend.generate(prompt),
//!     "gemini generation",
//! ).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use crate::types::{GatewayError, Result};

/// Execute an async operation with a timeout
///
/// Returns a timeout error if the operation doesn't complete within the specified duration.
/// The future is dropped on expiry, cancelling any in-flight request it owns.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::timeout(operation_name, timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_success() {
        let result = with_timeout(
            Duration::from_secs(1),
            async { Ok::<_, GatewayError>(42) },
            "test operation",
        )
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result = with_timeout(
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, GatewayError>(42)
            },
            "slow operation",
        )
        .await;
        match result.unwrap_err() {
            GatewayError::Timeout { operation, .. } => assert_eq!(operation, "slow operation"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
