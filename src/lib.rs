//! promptlab: prompt-engineering demos over hosted completion APIs
//!
//! One core operation, [`CompletionBackend::complete`], issues a single
//! completion request and returns the trimmed text of the first choice.
//! Everything else composes it:
//!
//! ```text
//! promptlab/
//! ├── src/
//! │   ├── lib.rs          # Re-exports, Vendor
//! │   ├── error.rs        # Error taxonomy
//! │   ├── config.rs       # RunnerConfig (env-loaded, passed by reference)
//! │   ├── request.rs      # CompletionOptions / Completion
//! │   ├── client.rs       # PromptRunner (HTTP) + CompletionBackend seam
//! │   ├── providers/      # Wire adapters, one per payload shape
//! │   ├── retry.rs        # Opt-in backoff for retryable failures
//! │   ├── chain.rs        # Prompt chaining pipeline
//! │   ├── thought_tree.rs # Fixed-shape thought tree
//! │   ├── tools.rs        # Tool dispatcher, calculator, ART flow
//! │   ├── demos.rs        # One-shot prompt technique catalog
//! │   └── bin/            # Argument-free demo executables
//! └── tests/
//! ```

pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod retry;
pub mod client;
pub mod chain;
pub mod thought_tree;
pub mod tools;
pub mod demos;

#[cfg(test)]
mod testing;

use serde::{Deserialize, Serialize};

pub use client::{CompletionBackend, PromptRunner};
pub use config::{ApiShape, RunnerConfig};
pub use error::Error;
pub use request::{Completion, CompletionOptions};

/// Hosted vendors sharing the OpenAI completion API shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Vendor
{   /// api.openai.com (or any compatible base URL)
    OpenAI
  , /// Azure OpenAI resource with named deployments
    AzureOpenAI
}

impl Vendor
{   /// Parse a vendor name as accepted in `PROMPTLAB_VENDOR`
    pub fn parse(value: &str) -> Result<Self, Error>
    {   match value.trim().to_ascii_lowercase().as_str()
        {   "openai" => Ok(Vendor::OpenAI)
          , "azure" | "azure_openai" | "azureopenai"
              => Ok(Vendor::AzureOpenAI)
          , other => Err(Error::InvalidConfiguration(
              format!("unknown vendor: {}", other)
            ))
        }
    }

    /// Vendor selected by `PROMPTLAB_VENDOR`, OpenAI when unset
    pub fn from_env() -> Result<Self, Error>
    {   match std::env::var("PROMPTLAB_VENDOR")
        {   Ok(value) if !value.trim().is_empty()
              => Vendor::parse(&value)
          , _ => Ok(Vendor::OpenAI)
        }
    }
}
