use std::error::Error;

use clap::Parser;
use graphrag_assistant::{Cli, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Pick up OPENAI_API_KEY and friends from a local .env during development.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    run(cli).await
}
