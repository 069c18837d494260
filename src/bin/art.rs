//! Automatic reasoning and tool use: reason, call the calculator, answer.

use promptlab::tools::run_art;
use promptlab::{CompletionOptions, Error, PromptRunner, RunnerConfig, Vendor};

#[tokio::main]
async fn main() -> Result<(), Error>
{   env_logger::init();
    let vendor = Vendor::from_env()?;
    let config = RunnerConfig::from_env(vendor)?;
    let runner = PromptRunner::new(&config)?;

    let run = run_art(
      &runner,
      "Calculate the sum of the first 10 prime numbers.",
      "calculator",
      "2 + 3 + 5 + 7 + 11 + 13 + 17 + 19 + 23 + 29",
      &CompletionOptions::for_vendor(vendor, 500)
    ).await?;

    println!("Reasoning Step: {}", run.reasoning);
    println!("Tool Result: {}", run.tool_result);
    println!("Final Response: {}", run.final_answer);
    Ok(())
}
