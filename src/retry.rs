//! Opt-in retry with exponential backoff for retryable failures.
//!
//! [`PromptRunner`](crate::client::PromptRunner) itself fails fast;
//! callers that want hardening wrap it here.

use std::time::Duration;
use log::{debug, info};
use crate::client::CompletionBackend;
use crate::error::Error;
use crate::request::CompletionOptions;

/// Retry policy for failed requests
#[derive(Debug, Clone)]
pub struct RetryPolicy
{   pub max_retries: usize
  , pub backoff_multiplier: f32
  , pub initial_backoff: Duration
  , /// Upper bound on any single delay, including one asked for
    /// by a Retry-After header
    pub max_backoff: Duration
}

pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(60);

impl RetryPolicy
{   /// Create a new retry policy
    pub fn new(
      max_retries: usize
    , backoff_multiplier: f32
    , initial_backoff_ms: u64
    ) -> Self
    {   RetryPolicy
        {   max_retries
          , backoff_multiplier
          , initial_backoff: Duration::from_millis(
              initial_backoff_ms
            )
          , max_backoff: DEFAULT_MAX_BACKOFF
        }
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self
    {   self.max_backoff = max_backoff;
        self
    }

    /// A single attempt, no retries
    pub fn none() -> Self
    {   RetryPolicy::new(0, 1.0, 0)
    }

    /// Calculate backoff duration for attempt number
    pub fn backoff_for_attempt(
      &self
    , attempt: usize
    ) -> Duration
    {   let multiplier
          = self.backoff_multiplier.powi(attempt as i32);
        Duration::from_millis(
          (self.initial_backoff.as_millis() as f32
            * multiplier) as u64
        )
    }

    /// Delay before retrying after `err`; the server's Retry-After
    /// wins when it is longer than our own backoff. Never exceeds
    /// `max_backoff`.
    fn delay_after(&self, attempt: usize, err: &Error) -> Duration
    {   let backoff = self.backoff_for_attempt(attempt);
        let delay = match err
        {   Error::RateLimited { retry_after_secs: Some(secs) } => {
              backoff.max(Duration::from_secs(*secs))
            }
          , _ => backoff
        };
        delay.min(self.max_backoff)
    }
}

impl Default for RetryPolicy
{   fn default() -> Self
    {   RetryPolicy::new(3, 2.0, 100)
    }
}

/// Complete `prompt`, retrying rate-limit and transport failures up to
/// `policy.max_retries` times. Other errors are returned immediately.
pub async fn retry_completion<B>(
  backend: &B
, prompt: &str
, options: &CompletionOptions
, policy: &RetryPolicy
) -> Result<String, Error>
where B: CompletionBackend + ?Sized
{   let mut attempt = 0;
    loop
    {   match backend.complete(prompt, options).await
        {   Ok(text) => return Ok(text)
          , Err(err) if err.is_retryable()
                && attempt < policy.max_retries => {
              let delay = policy.delay_after(attempt, &err);
              info!(
                "Attempt {} failed ({}); retrying in {:?}",
                attempt + 1, err, delay
              );
              tokio::time::sleep(delay).await;
              attempt += 1;
            }
          , Err(err) => {
              debug!("Giving up after {} attempt(s)", attempt + 1);
              return Err(err);
            }
        }
    }
}
