//! Runner configuration, built once from the environment and
//! borrowed by the [`PromptRunner`](crate::client::PromptRunner)

use std::fmt;
use serde::{Deserialize, Serialize};
use log::debug;
use crate::error::Error;
use crate::Vendor;

pub const OPENAI_API_BASE: &str
  = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_AZURE_API_VERSION: &str = "2024-02-01";
pub const DEFAULT_AZURE_DEPLOYMENT: &str
  = "gpt-35-turbo-instruct";
pub const DEFAULT_SYSTEM_MESSAGE: &str
  = "You are a helpful assistant.";

/// Payload shape used on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiShape
{   /// `messages` array in, `choices[].message.content` out
    Chat
  , /// Legacy single `prompt` string in, `choices[].text` out
    Completions
}

impl ApiShape
{   pub fn parse(value: &str) -> Result<Self, Error>
    {   match value.trim().to_ascii_lowercase().as_str()
        {   "chat" => Ok(ApiShape::Chat)
          , "completions" | "completion" | "legacy"
              => Ok(ApiShape::Completions)
          , other => Err(Error::InvalidConfiguration(
              format!("unknown api shape: {}", other)
            ))
        }
    }
}

/// Everything a runner needs to talk to one vendor endpoint
#[derive(Clone, Serialize, Deserialize)]
pub struct RunnerConfig
{   /// Which vendor's URL layout and auth header to use
    pub vendor: Vendor
  , /// Secret key; never serialized. Absence surfaces as
    /// `Error::Auth` on the first completion.
    #[serde(skip)]
    pub api_key: Option<String>
  , /// OpenAI base URL or Azure resource endpoint
    pub endpoint: Option<String>
  , /// Azure `api-version` query parameter
    pub api_version: Option<String>
  , /// OpenAI model name or Azure deployment name
    pub model: String
  , /// Request/response payload shape
    pub api_shape: ApiShape
  , /// System message sent with chat-shaped requests
    pub system_message: String
  , /// Request timeout in seconds; `None` keeps the client default
    pub timeout_secs: Option<u64>
}

impl fmt::Debug for RunnerConfig
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.debug_struct("RunnerConfig")
          .field("vendor", &self.vendor)
          .field(
            "api_key",
            &self.api_key.as_ref().map(|_| "<redacted>")
          )
          .field("endpoint", &self.endpoint)
          .field("api_version", &self.api_version)
          .field("model", &self.model)
          .field("api_shape", &self.api_shape)
          .field("system_message", &self.system_message)
          .field("timeout_secs", &self.timeout_secs)
          .finish()
    }
}

impl RunnerConfig
{   /// Defaults for a vendor with no credentials set
    pub fn new(vendor: Vendor) -> Self
    {   match vendor
        {   Vendor::OpenAI => RunnerConfig
            {   vendor
              , api_key: None
              , endpoint: Some(OPENAI_API_BASE.to_string())
              , api_version: None
              , model: DEFAULT_OPENAI_MODEL.to_string()
              , api_shape: ApiShape::Chat
              , system_message: DEFAULT_SYSTEM_MESSAGE.to_string()
              , timeout_secs: None
            }
          , Vendor::AzureOpenAI => RunnerConfig
            {   vendor
              , api_key: None
              , endpoint: None
              , api_version: Some(
                  DEFAULT_AZURE_API_VERSION.to_string()
                )
              , model: DEFAULT_AZURE_DEPLOYMENT.to_string()
              , api_shape: ApiShape::Completions
              , system_message: DEFAULT_SYSTEM_MESSAGE.to_string()
              , timeout_secs: None
            }
        }
    }

    /// Read the process environment for `vendor`
    pub fn from_env(vendor: Vendor) -> Result<Self, Error>
    {   Self::from_lookup(vendor, |name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; empty values count
    /// as unset
    pub fn from_lookup<F>(vendor: Vendor, lookup: F)
      -> Result<Self, Error>
    where F: Fn(&str) -> Option<String>
    {   let get = |name: &str| {
          lookup(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        };

        let mut config = RunnerConfig::new(vendor);
        match vendor
        {   Vendor::OpenAI => {
              config.api_key = get("OPENAI_API_KEY");
              if let Some(base) = get("OPENAI_BASE_URL")
              {   config.endpoint = Some(base);
              }
              if let Some(model) = get("OPENAI_MODEL")
              {   config.model = model;
              }
            }
          , Vendor::AzureOpenAI => {
              config.api_key = get("AZURE_OPENAI_API_KEY");
              config.endpoint = get("AZURE_OPENAI_ENDPOINT");
              if let Some(version) = get("AZURE_OPENAI_API_VERSION")
              {   config.api_version = Some(version);
              }
              if let Some(deployment) = get("AZURE_OPENAI_DEPLOYMENT")
              {   config.model = deployment;
              }
            }
        }

        if let Some(shape) = get("PROMPTLAB_API_SHAPE")
        {   config.api_shape = ApiShape::parse(&shape)?;
        }
        if let Some(message) = get("PROMPTLAB_SYSTEM_MESSAGE")
        {   config.system_message = message;
        }
        if let Some(secs) = get("PROMPTLAB_TIMEOUT_SECS")
        {   let parsed = secs.parse::<u64>().map_err(|_| {
              Error::InvalidConfiguration(
                format!("PROMPTLAB_TIMEOUT_SECS is not a number: {}", secs)
              )
            })?;
            config.timeout_secs = Some(parsed);
        }

        debug!("Loaded runner config: {:?}", config);
        Ok(config)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self
    {   self.api_key = Some(key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self
    {   self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_api_shape(mut self, shape: ApiShape) -> Self
    {   self.api_shape = shape;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self
    {   self.timeout_secs = Some(secs);
        self
    }
}
