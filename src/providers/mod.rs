//! Wire adapters, one per payload shape, plus vendor routing

pub mod chat;
pub mod completions;

use serde::Deserialize;
use crate::config::{ApiShape, RunnerConfig};
use crate::error::Error;
use crate::request::{Completion, CompletionOptions};
use crate::Vendor;

/// Token accounting block shared by both response shapes
#[derive(Debug, Clone, Deserialize)]
pub struct Usage
{   #[serde(default)]
    pub total_tokens: Option<u32>
}

/// `{"error": {"message": ...}}` envelope returned on failures
#[derive(Debug, Clone, Deserialize)]
struct ErrorEnvelope
{   error: ErrorBody
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorBody
{   message: String
}

/// Where a request goes and how it authenticates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route
{   pub url: String
  , /// Azure `api-version` query parameter
    pub api_version: Option<String>
  , pub auth_header: &'static str
  , pub auth_value: String
}

/// Resolve URL and auth for the configured vendor and shape.
/// Credentials are checked first so a missing key never reaches
/// the network.
pub fn route(config: &RunnerConfig) -> Result<Route, Error>
{   let api_key = config.api_key.as_deref()
      .filter(|k| !k.trim().is_empty())
      .ok_or_else(|| Error::Auth(format!(
        "no API key configured for {:?}",
        config.vendor
      )))?;

    let endpoint = config.endpoint.as_deref()
      .ok_or_else(|| Error::InvalidConfiguration(format!(
        "no endpoint configured for {:?}",
        config.vendor
      )))?
      .trim_end_matches('/');

    let path = match config.api_shape
    {   ApiShape::Chat => "chat/completions"
      , ApiShape::Completions => "completions"
    };

    match config.vendor
    {   Vendor::OpenAI => Ok(Route
        {   url: format!("{}/{}", endpoint, path)
          , api_version: None
          , auth_header: "Authorization"
          , auth_value: format!("Bearer {}", api_key)
        })
      , Vendor::AzureOpenAI => {
          let api_version = config.api_version.clone()
            .ok_or_else(|| Error::InvalidConfiguration(
              "no api-version configured for Azure".to_string()
            ))?;
          Ok(Route
          {   url: format!(
                "{}/openai/deployments/{}/{}",
                endpoint, config.model, path
              )
            , api_version: Some(api_version)
            , auth_header: "api-key"
            , auth_value: api_key.to_string()
          })
        }
    }
}

/// Build the JSON body for the configured shape
pub fn encode(
  config: &RunnerConfig
, prompt: &str
, options: &CompletionOptions
) -> Result<serde_json::Value, Error>
{   let body = match config.api_shape
    {   ApiShape::Chat => {
          let system = options.system_message.as_deref()
            .unwrap_or(&config.system_message);
          serde_json::to_value(chat::build_request(
            &config.model, system, prompt, options
          ))
        }
      , ApiShape::Completions => serde_json::to_value(
          completions::build_request(&config.model, prompt, options)
        )
    };
    body.map_err(|e| Error::InvalidRequest(e.to_string()))
}

/// Normalise a 2xx body for the configured shape
pub fn decode(shape: ApiShape, body: &str)
  -> Result<Completion, Error>
{   match shape
    {   ApiShape::Chat => chat::parse_response(body)
      , ApiShape::Completions => completions::parse_response(body)
    }
}

/// Best-effort message from an error body; falls back to the raw
/// text, or the status reason when the body is empty
pub fn error_message(body: &str, fallback: &str) -> String
{   if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body)
    {   return envelope.error.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty()
    {   fallback.to_string()
    } else
    {   trimmed.to_string()
    }
}
