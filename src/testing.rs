//! Scripted backend shared by unit tests

use std::collections::VecDeque;
use std::sync::Mutex;
use async_trait::async_trait;
use crate::client::CompletionBackend;
use crate::error::Error;
use crate::request::CompletionOptions;

/// Replays canned replies in order and records every prompt it saw
pub struct ScriptedBackend
{   replies: Mutex<VecDeque<Result<String, Error>>>
  , prompts: Mutex<Vec<(String, CompletionOptions)>>
}

impl ScriptedBackend
{   pub fn new(replies: &[&str]) -> Self
    {   Self::with_results(
          replies.iter().map(|r| Ok(r.to_string())).collect()
        )
    }

    pub fn with_results(replies: Vec<Result<String, Error>>) -> Self
    {   ScriptedBackend
        {   replies: Mutex::new(replies.into())
          , prompts: Mutex::new(vec![])
        }
    }

    pub fn prompts(&self) -> Vec<String>
    {   self.prompts.lock().unwrap()
          .iter()
          .map(|(p, _)| p.clone())
          .collect()
    }

    pub fn options(&self) -> Vec<CompletionOptions>
    {   self.prompts.lock().unwrap()
          .iter()
          .map(|(_, o)| o.clone())
          .collect()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend
{   async fn complete(
      &self
    , prompt: &str
    , options: &CompletionOptions
    ) -> Result<String, Error>
    {   self.prompts.lock().unwrap()
          .push((prompt.to_string(), options.clone()));
        self.replies.lock().unwrap()
          .pop_front()
          .unwrap_or_else(|| Err(Error::Transport(
            "script exhausted".to_string()
          )))
    }
}
