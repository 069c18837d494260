//! Unified request and response types

use serde::{Deserialize, Serialize};
use crate::error::Error;
use crate::Vendor;

/// Generation parameters for one completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions
{   /// Max tokens to generate; must be positive
    pub max_output_tokens: u32
  , /// Sampling temperature, `0.0..=2.0` when set
    pub temperature: Option<f32>
  , /// Sequences at which generation stops; empty sends none
    pub stop_sequences: Vec<String>
  , /// Number of choices requested; only the first is returned
    pub sample_count: u32
  , /// Overrides the configured system message (chat shape only)
    pub system_message: Option<String>
}

impl Default for CompletionOptions
{   fn default() -> Self
    {   CompletionOptions
        {   max_output_tokens: 500
          , temperature: Some(0.3)
          , stop_sequences: vec![]
          , sample_count: 1
          , system_message: None
        }
    }
}

impl CompletionOptions
{   /// Default options with a different output budget
    pub fn with_max_output_tokens(max_output_tokens: u32) -> Self
    {   CompletionOptions
        {   max_output_tokens
          , ..CompletionOptions::default()
        }
    }

    /// Options as the vendor's demo scripts send them: OpenAI at
    /// temperature 0.3, Azure with no temperature at all
    pub fn for_vendor(vendor: Vendor, max_output_tokens: u32) -> Self
    {   let temperature = match vendor
        {   Vendor::OpenAI => Some(0.3)
          , Vendor::AzureOpenAI => None
        };
        CompletionOptions
        {   max_output_tokens
          , temperature
          , ..CompletionOptions::default()
        }
    }

    /// Reject prompts and options no provider would accept
    pub fn validate(&self, prompt: &str) -> Result<(), Error>
    {   if prompt.trim().is_empty()
        {   return Err(Error::InvalidRequest(
              "prompt must not be empty".to_string()
            ));
        }
        if self.max_output_tokens == 0
        {   return Err(Error::InvalidRequest(
              "max_output_tokens must be greater than zero".to_string()
            ));
        }
        if self.sample_count == 0
        {   return Err(Error::InvalidRequest(
              "sample_count must be at least 1".to_string()
            ));
        }
        if let Some(t) = self.temperature
        {   if !(0.0..=2.0).contains(&t)
            {   return Err(Error::InvalidRequest(
                  format!("temperature {} outside 0.0..=2.0", t)
                ));
            }
        }
        Ok(())
    }
}

/// Normalised result of one completion, whatever the payload shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion
{   /// First choice, whitespace-trimmed
    pub text: String
  , /// Why generation stopped, if the provider said
    pub finish_reason: Option<String>
  , /// Total tokens billed, if reported
    pub tokens_used: Option<u32>
}

impl Completion
{   pub fn new(raw_text: &str) -> Self
    {   Completion
        {   text: raw_text.trim().to_string()
          , finish_reason: None
          , tokens_used: None
        }
    }
}
