//! Timeout and exponential-backoff wrapper around service calls.

use tracing::warn;

use crate::config::RetryPolicy;
use crate::error::BriefError;
use crate::ports::llm::{CompletionRequest, CompletionResponse, LlmClient};

/// Sends `request`, retrying failures and timeouts per `policy`.
///
/// # Errors
///
/// Returns [`BriefError::Llm`] once every attempt has failed.
pub async fn complete_with_retry(
    llm: &dyn LlmClient,
    request: &CompletionRequest,
    policy: &RetryPolicy,
) -> Result<CompletionResponse, BriefError> {
    let attempts = policy.max_attempts.max(1);
    let mut delay = policy.initial_backoff;
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match tokio::time::timeout(policy.timeout, llm.complete(request)).await {
            Ok(Ok(response)) => return Ok(response),
            Ok(Err(e)) => last_error = e.to_string(),
            Err(_) => last_error = format!("timed out after {:?}", policy.timeout),
        }
        if attempt < attempts {
            warn!(attempt, attempts, error = %last_error, retry_in = ?delay, "service call failed");
            tokio::time::sleep(delay).await;
            delay = delay.saturating_mul(2);
        }
    }

    Err(BriefError::Llm { attempts, message: last_error })
}
