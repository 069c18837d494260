//! Prompt chaining: each stage's output is interpolated into the next
//! stage's prompt

use serde::{Deserialize, Serialize};
use log::{debug, info};
use crate::client::CompletionBackend;
use crate::error::Error;
use crate::request::CompletionOptions;

/// Placeholder replaced by the previous stage's output
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// One templated step after the initial prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainStage
{   /// Printed name of the stage, e.g. "Introduction"
    pub label: String
  , /// Prompt template containing [`INPUT_PLACEHOLDER`]
    pub template: String
}

impl ChainStage
{   pub fn render(&self, input: &str) -> String
    {   self.template.replace(INPUT_PLACEHOLDER, input)
    }
}

/// What a stage sent and got back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOutput
{   pub label: String
  , pub prompt: String
  , pub output: String
}

/// Fixed-length sequential pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptChain
{   pub initial_label: String
  , pub initial_prompt: String
  , pub stages: Vec<ChainStage>
  , pub options: CompletionOptions
}

impl PromptChain
{   pub fn new(
      initial_label: impl Into<String>
    , initial_prompt: impl Into<String>
    ) -> Self
    {   PromptChain
        {   initial_label: initial_label.into()
          , initial_prompt: initial_prompt.into()
          , stages: vec![]
          , options: CompletionOptions::with_max_output_tokens(1000)
        }
    }

    /// Append a stage fed by the previous output
    pub fn then(
      mut self
    , label: impl Into<String>
    , template: impl Into<String>
    ) -> Self
    {   self.stages.push(ChainStage
        {   label: label.into()
          , template: template.into()
        });
        self
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self
    {   self.options = options;
        self
    }

    /// Outline, then introduction, then first section of a blog post
    pub fn blog_post() -> Self
    {   PromptChain::new(
          "Outline",
          "Write an outline for a blog post about the benefits of AI in healthcare."
        )
        .then(
          "Introduction",
          "Using the following outline, write an introduction for the blog post:\n\n{input}\n\nIntroduction:"
        )
        .then(
          "First Section",
          "Using the following introduction, write the first section of the blog post:\n\n{input}\n\nFirst Section:"
        )
    }

    fn check_templates(&self) -> Result<(), Error>
    {   for stage in &self.stages
        {   if !stage.template.contains(INPUT_PLACEHOLDER)
            {   return Err(Error::InvalidConfiguration(format!(
                  "chain stage '{}' has no {} placeholder",
                  stage.label, INPUT_PLACEHOLDER
                )));
            }
        }
        Ok(())
    }

    /// Run every stage in order; the first failure aborts the chain
    pub async fn run<B>(&self, backend: &B)
      -> Result<Vec<StageOutput>, Error>
    where B: CompletionBackend + ?Sized
    {   self.check_templates()?;
        debug!(
          "Running chain '{}' with {} follow-up stages",
          self.initial_label, self.stages.len()
        );

        let mut outputs = Vec::with_capacity(self.stages.len() + 1);
        let mut previous = backend
          .complete(&self.initial_prompt, &self.options)
          .await?;
        info!("Chain stage '{}' complete", self.initial_label);
        outputs.push(StageOutput
        {   label: self.initial_label.clone()
          , prompt: self.initial_prompt.clone()
          , output: previous.clone()
        });

        for stage in &self.stages
        {   let prompt = stage.render(&previous);
            previous = backend.complete(&prompt, &self.options).await?;
            info!("Chain stage '{}' complete", stage.label);
            outputs.push(StageOutput
            {   label: stage.label.clone()
              , prompt
              , output: previous.clone()
            });
        }
        Ok(outputs)
    }
}
