//! Chat payload shape: `messages` in, `choices[].message.content` out

use serde::{Deserialize, Serialize};
use log::trace;
use crate::error::Error;
use crate::request::{Completion, CompletionOptions};
use super::Usage;

// ===== Message Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest
{   pub model: String
  , pub messages: Vec<ChatMessage>
  , pub max_tokens: u32
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>
  , pub n: u32
  , #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse
{   pub choices: Vec<Choice>
  , #[serde(default)]
    pub usage: Option<Usage>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice
{   pub message: ResponseMessage
  , #[serde(default)]
    pub finish_reason: Option<String>
}

/// Content is nullable when a filter suppresses the answer
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage
{   #[serde(default)]
    pub content: Option<String>
}

pub fn build_request(
  model: &str
, system_message: &str
, prompt: &str
, options: &CompletionOptions
) -> ChatRequest
{   ChatRequest
    {   model: model.to_string()
      , messages: vec![
          ChatMessage
          {   role: "system".to_string()
            , content: system_message.to_string()
          }
        , ChatMessage
          {   role: "user".to_string()
            , content: prompt.to_string()
          }
        ]
      , max_tokens: options.max_output_tokens
      , temperature: options.temperature
      , n: options.sample_count
      , stop: options.stop_sequences.clone()
    }
}

pub fn parse_response(body: &str) -> Result<Completion, Error>
{   let response: ChatResponse = serde_json::from_str(body)
      .map_err(|e| Error::Parse(e.to_string()))?;
    trace!("Chat response carried {} choices", response.choices.len());

    let first = response.choices.into_iter().next()
      .ok_or(Error::NoChoicesInResponse)?;

    let mut completion = Completion::new(
      first.message.content.as_deref().unwrap_or_default()
    );
    completion.finish_reason = first.finish_reason;
    completion.tokens_used = response.usage
      .and_then(|u| u.total_tokens);
    Ok(completion)
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn first_choice_is_trimmed()
    {   let body = r#"{
          "choices": [
            {"index": 0, "message": {"role": "assistant", "content": "\n Bonjour \n"}, "finish_reason": "stop"},
            {"index": 1, "message": {"role": "assistant", "content": "Salut"}}
          ],
          "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
        }"#;
        let completion = parse_response(body).unwrap();
        assert_eq!(completion.text, "Bonjour");
        assert_eq!(completion.finish_reason.as_deref(), Some("stop"));
        assert_eq!(completion.tokens_used, Some(12));
    }

    #[test]
    fn null_content_becomes_empty_text()
    {   let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert_eq!(parse_response(body).unwrap().text, "");
    }

    #[test]
    fn empty_choices_and_garbage_are_distinguished()
    {   assert_eq!(
          parse_response(r#"{"choices":[]}"#),
          Err(Error::NoChoicesInResponse)
        );
        assert!(matches!(
          parse_response("<html>oops</html>"),
          Err(Error::Parse(_))
        ));
    }
}
