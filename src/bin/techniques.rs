//! Run every one-shot prompt technique demo in turn.

use promptlab::demos::{catalog, run_demo};
use promptlab::{Error, PromptRunner, RunnerConfig, Vendor};

#[tokio::main]
async fn main() -> Result<(), Error>
{   env_logger::init();
    let config = RunnerConfig::from_env(Vendor::from_env()?)?;
    let runner = PromptRunner::new(&config)?;

    for demo in catalog()
    {   let answer = run_demo(&runner, &demo).await?;
        println!("{} response: {}\n", demo.title, answer);
    }
    Ok(())
}
