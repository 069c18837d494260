//! Catalog of one-shot prompt-engineering demos.
//!
//! Each demo is a fixed prompt plus the generation parameters it was
//! written for; running one is a single completion.

use log::info;
use crate::client::CompletionBackend;
use crate::error::Error;
use crate::request::CompletionOptions;

const GENERATIVE_AI_BLURB: &str =
  "Generative AI is a type of artificial intelligence that can create new content, \
   such as text, images, and music. It uses machine learning models to generate data \
   that is similar to the data it was trained on. This technology has a wide range of \
   applications, including content creation, data augmentation, and more.";

#[derive(Debug, Clone, PartialEq)]
pub struct Demo
{   /// Short machine name, e.g. `few-shot`
    pub name: &'static str
  , /// Heading printed before the answer
    pub title: &'static str
  , pub prompt: String
  , pub options: CompletionOptions
}

fn options(max_output_tokens: u32) -> CompletionOptions
{   CompletionOptions::with_max_output_tokens(max_output_tokens)
}

pub fn question_answer_prompt(context: &str, question: &str) -> String
{   format!("Context: {}\nQuestion: {}\nAnswer:", context, question)
}

pub fn translation_prompt(language: &str, text: &str) -> String
{   format!("Translate the following text to {}:\n\n{}", language, text)
}

/// Every demo, in the order the `techniques` binary runs them
pub fn catalog() -> Vec<Demo>
{   vec![
      Demo
      {   name: "summarization"
        , title: "Summarization"
        , prompt: GENERATIVE_AI_BLURB.to_string()
        , options: options(500)
      }
    , Demo
      {   name: "qna"
        , title: "Question and Answering"
        , prompt: question_answer_prompt(
            GENERATIVE_AI_BLURB,
            "What is Generative AI?"
          )
        , options: CompletionOptions
          {   system_message: Some(
                "You will answer the question from the given context only"
                  .to_string()
              )
            , ..options(500)
          }
      }
    , Demo
      {   name: "translation"
        , title: "Translation"
        , prompt: translation_prompt(
            "Hindi",
            "Generative AI can create new content such as text, images, and music."
          )
        , options: options(500)
      }
    , Demo
      {   name: "text-generation"
        , title: "Text Generation"
        , prompt: "Once upon a time, in a land far, far away,".to_string()
        , options: options(500)
      }
    , Demo
      {   name: "zero-shot"
        , title: "Zero-shot learning"
        , prompt: "Translate the following English text to French: 'Hello, how are you?'"
            .to_string()
        , options: options(100)
      }
    , Demo
      {   name: "few-shot"
        , title: "Few-shot learning"
        , prompt: "\nTranslate the following English text to French:\n\
                   English: 'Good morning'\nFrench: 'Bonjour'\n\n\
                   English: 'Good night'\nFrench: 'Bonne nuit'\n\n\
                   English: 'How are you?'\nFrench:\n"
            .to_string()
        , options: options(100)
      }
    , Demo
      {   name: "instruction"
        , title: "Instruction-based prompt"
        , prompt: "You are a helpful assistant. Explain the concept of machine learning in simple terms."
            .to_string()
        , options: options(100)
      }
    , Demo
      {   name: "contextual"
        , title: "Contextual prompt"
        , prompt: "\nYou are a travel guide. Provide a brief itinerary for a 3-day trip to Paris.\nDay 1:\n"
            .to_string()
        , options: options(100)
      }
    , Demo
      {   name: "role-playing"
        , title: "Role-playing prompt"
        , prompt: "You are a customer support agent. Help the customer troubleshoot their internet connection issue."
            .to_string()
        , options: options(100)
      }
    , Demo
      {   name: "chain-of-thought"
        , title: "Chain of thought prompting"
        , prompt: "\nSolve the following math problem step by step:\n\
                   If a train travels at a speed of 60 miles per hour and it takes 2 hours \
                   to reach its destination, how far did the train travel?\n"
            .to_string()
        , options: options(100)
      }
    , Demo
      {   name: "meta-prompting"
        , title: "Meta prompting"
        , prompt: "\nWrite a Python function that takes a number as input and returns its factorial.\n"
            .to_string()
        , options: options(100)
      }
    ]
}

pub fn find(name: &str) -> Option<Demo>
{   catalog().into_iter().find(|d| d.name == name)
}

pub async fn run_demo<B>(backend: &B, demo: &Demo)
  -> Result<String, Error>
where B: CompletionBackend + ?Sized
{   info!("Running demo '{}'", demo.name);
    backend.complete(&demo.prompt, &demo.options).await
}
