use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "graphrag-assistant",
    version,
    about = "Knowledge-base assistant orchestration client"
)]
pub struct Cli {
    #[arg(long)]
    pub config: Option<String>,
    #[arg(long)]
    pub kb_url: Option<String>,
    #[arg(long)]
    pub assistant_url: Option<String>,
    #[arg(long)]
    pub assistant_id: Option<String>,
    #[arg(long)]
    pub timeout_secs: Option<u64>,
    #[arg(long, value_enum, default_value_t = RunMode::Cli)]
    pub mode: RunMode,
    #[arg()]
    pub prompt: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RunMode {
    Cli,
    Stdio,
}
