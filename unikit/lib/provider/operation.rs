use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::{UnikitError, UnikitResult};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The default number of polls before an operation is considered stuck.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 60;

/// The default delay between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The observed state of a long-running provider-side operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    /// The operation is still running.
    Pending,

    /// The operation completed successfully.
    Done,

    /// The operation failed with the given provider-reported reason.
    Failed(String),
}

/// A long-running provider-side operation that can be polled for completion,
/// such as an image import or an instance creation.
#[async_trait]
pub trait CloudOperation {
    /// The provider-assigned name of the operation.
    fn name(&self) -> &str;

    /// Fetches the current status of the operation.
    async fn poll(&mut self) -> UnikitResult<OperationStatus>;
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Polls an operation until it completes, with a bounded number of attempts.
///
/// There are exactly three outcomes: `Ok(())` when the operation reports
/// done, [`UnikitError::OperationFailed`] when the provider reports failure
/// (or a poll itself errors, which propagates), and
/// [`UnikitError::OperationTimedOut`] when `max_attempts` polls pass without
/// completion. The wait is therefore bounded by
/// `max_attempts * interval` plus provider latency.
pub async fn poll_operation<O>(
    operation: &mut O,
    max_attempts: u32,
    interval: Duration,
) -> UnikitResult<()>
where
    O: CloudOperation + Send + ?Sized,
{
    let mut attempts = 0;
    loop {
        attempts += 1;

        match operation.poll().await? {
            OperationStatus::Done => {
                info!("operation {} completed successfully", operation.name());
                return Ok(());
            }
            OperationStatus::Failed(reason) => {
                return Err(UnikitError::OperationFailed {
                    name: operation.name().to_string(),
                    reason,
                });
            }
            OperationStatus::Pending => {}
        }

        if attempts >= max_attempts {
            return Err(UnikitError::OperationTimedOut {
                name: operation.name().to_string(),
                attempts,
            });
        }

        tokio::time::sleep(interval).await;
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
