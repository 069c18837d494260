//! Grow a root thought, two children and one grandchild under each.

use promptlab::thought_tree::ThoughtTree;
use promptlab::{CompletionOptions, Error, PromptRunner, RunnerConfig, Vendor};

#[tokio::main]
async fn main() -> Result<(), Error>
{   env_logger::init();
    let vendor = Vendor::from_env()?;
    let config = RunnerConfig::from_env(vendor)?;
    let runner = PromptRunner::new(&config)?;
    let budget = match vendor
    {   Vendor::OpenAI => 300
      , Vendor::AzureOpenAI => 500
    };

    let tree = ThoughtTree::fixed_shape(
      &runner,
      "Generate ideas for a new AI project.",
      &CompletionOptions::for_vendor(vendor, budget)
    ).await?;

    for (id, node) in tree.iter()
    {   let label = match tree.depth(id)
        {   0 => "Root Thought"
          , 1 => "Child Thought"
          , _ => "Grandchild Thought"
        };
        println!("{}: {}", label, node.thought);
    }
    Ok(())
}
