use std::time::Duration;
use async_trait::async_trait;
use log::{debug, error, trace};
use reqwest::header::RETRY_AFTER;
use crate::config::RunnerConfig;
use crate::error::Error;
use crate::providers;
use crate::request::{Completion, CompletionOptions};

/// Anything that can turn a prompt into completion text.
///
/// [`PromptRunner`] is the HTTP implementation; the chain, thought
/// tree, ART flow and demo catalog are written against this trait.
#[async_trait]
pub trait CompletionBackend: Send + Sync
{   /// Issue one completion and return the first choice, trimmed.
    async fn complete(
      &self
    , prompt: &str
    , options: &CompletionOptions
    ) -> Result<String, Error>;
}

/// Issues completion requests against one configured vendor endpoint.
///
/// Each call makes exactly one HTTP request and never retries; see
/// [`crate::retry`] for opt-in backoff.
pub struct PromptRunner<'a>
{   config: &'a RunnerConfig
  , http_client: reqwest::Client
}

impl<'a> PromptRunner<'a>
{   pub fn new(config: &'a RunnerConfig) -> Result<Self, Error>
    {   debug!(
          "Creating PromptRunner for {:?} ({:?})",
          config.vendor, config.api_shape
        );
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs
        {   builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().map_err(|e| {
          error!("Failed to build HTTP client: {}", e);
          Error::InvalidConfiguration(e.to_string())
        })?;

        Ok(PromptRunner
        {   config
          , http_client
        })
    }

    /// Like [`CompletionBackend::complete`] but keeps the finish
    /// reason and token usage.
    pub async fn complete_detailed(
      &self
    , prompt: &str
    , options: &CompletionOptions
    ) -> Result<Completion, Error>
    {   options.validate(prompt)?;
        let route = providers::route(self.config)?;
        let body = providers::encode(self.config, prompt, options)?;

        debug!(
          "Sending completion to {} (max_tokens={})",
          route.url, options.max_output_tokens
        );
        trace!("Request body: {}", body);

        let mut request = self.http_client
          .post(&route.url)
          .header(route.auth_header, &route.auth_value)
          .json(&body);
        if let Some(version) = &route.api_version
        {   request = request.query(&[("api-version", version.as_str())]);
        }

        let response = request
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            Error::Transport(e.to_string())
          })?;

        let status = response.status();
        trace!("Response status: {}", status);

        if !status.is_success()
        {   let retry_after = response.headers()
              .get(RETRY_AFTER)
              .and_then(|v| v.to_str().ok())
              .and_then(|v| v.trim().parse::<u64>().ok());
            let error_text = response.text().await
              .unwrap_or_default();
            let err = classify_failure(
              status.as_u16(),
              status.canonical_reason().unwrap_or("unknown status"),
              retry_after,
              &error_text
            );
            error!("Completion failed: {}", err);
            return Err(err);
        }

        let text = response.text().await.map_err(|e| {
          error!("Failed to read response body: {}", e);
          Error::Transport(e.to_string())
        })?;
        trace!("Response body: {}", text);

        providers::decode(self.config.api_shape, &text)
    }
}

#[async_trait]
impl<'a> CompletionBackend for PromptRunner<'a>
{   async fn complete(
      &self
    , prompt: &str
    , options: &CompletionOptions
    ) -> Result<String, Error>
    {   self.complete_detailed(prompt, options)
          .await
          .map(|c| c.text)
    }
}

/// Map a non-2xx status onto the error taxonomy
pub fn classify_failure(
  status: u16
, reason: &str
, retry_after_secs: Option<u64>
, body: &str
) -> Error
{   let message = providers::error_message(body, reason);
    match status
    {   401 | 403 => Error::Auth(message)
      , 429 => Error::RateLimited { retry_after_secs }
      , _ => Error::Provider { status, message }
    }
}
