//! Outline -> introduction -> first section, each fed by the last.

use promptlab::chain::PromptChain;
use promptlab::{CompletionOptions, Error, PromptRunner, RunnerConfig, Vendor};

#[tokio::main]
async fn main() -> Result<(), Error>
{   env_logger::init();
    let vendor = Vendor::from_env()?;
    let config = RunnerConfig::from_env(vendor)?;
    let runner = PromptRunner::new(&config)?;

    let budget = match vendor
    {   Vendor::OpenAI => 1000
      , Vendor::AzureOpenAI => 200
    };
    let chain = PromptChain::blog_post()
      .with_options(CompletionOptions::for_vendor(vendor, budget));
    for stage in chain.run(&runner).await?
    {   println!("{}: {}", stage.label, stage.output);
    }
    Ok(())
}
