//! Legacy completion payload shape: one `prompt` string in,
//! `choices[].text` out. No system message.

use serde::{Deserialize, Serialize};
use log::trace;
use crate::error::Error;
use crate::request::{Completion, CompletionOptions};
use super::Usage;

#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest
{   pub model: String
  , pub prompt: String
  , pub max_tokens: u32
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>
  , pub n: u32
  , #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse
{   pub choices: Vec<TextChoice>
  , #[serde(default)]
    pub usage: Option<Usage>
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextChoice
{   #[serde(default)]
    pub text: String
  , #[serde(default)]
    pub finish_reason: Option<String>
}

pub fn build_request(
  model: &str
, prompt: &str
, options: &CompletionOptions
) -> CompletionRequest
{   CompletionRequest
    {   model: model.to_string()
      , prompt: prompt.to_string()
      , max_tokens: options.max_output_tokens
      , temperature: options.temperature
      , n: options.sample_count
      , stop: options.stop_sequences.clone()
    }
}

pub fn parse_response(body: &str) -> Result<Completion, Error>
{   let response: CompletionResponse = serde_json::from_str(body)
      .map_err(|e| Error::Parse(e.to_string()))?;
    trace!(
      "Completion response carried {} choices",
      response.choices.len()
    );

    let first = response.choices.into_iter().next()
      .ok_or(Error::NoChoicesInResponse)?;

    let mut completion = Completion::new(&first.text);
    completion.finish_reason = first.finish_reason;
    completion.tokens_used = response.usage
      .and_then(|u| u.total_tokens);
    Ok(completion)
}
