pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::{orchestrator, stdio, tooling};
pub use cli::{Cli, RunMode};
pub use config::AppConfig;
pub use domain::types;
pub use infrastructure::assistant;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

use application::orchestrator::Conversation;
use application::tooling::{HttpKnowledgeBackend, ToolDispatcher};
use infrastructure::assistant::HttpAssistantClient;

pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let quiet_mode = matches!(cli.mode, RunMode::Stdio);
    init_tracing(quiet_mode);
    info!("Starting graphrag-assistant client");
    debug!(mode = ?cli.mode, config = ?cli.config, "CLI arguments parsed");

    let config_path = cli
        .config
        .as_deref()
        .map(|raw| PathBuf::from(shellexpand::tilde(raw).into_owned()));
    let mut config = AppConfig::load(config_path.as_deref())?;
    if let Some(path) = &config_path {
        info!(path = %path.display(), "Loaded configuration from file");
    } else {
        info!("Loaded configuration from default path or defaults");
    }
    apply_cli_overrides(&cli, &mut config);

    let assistant_id = cli
        .assistant_id
        .clone()
        .or_else(|| config.assistant.assistant_id.clone())
        .ok_or(
            "assistant_id is not configured; set [assistant] assistant_id in client.toml \
             or pass --assistant-id",
        )?;

    let api = Arc::new(HttpAssistantClient::from_config(
        &config.assistant,
        assistant_id,
    ));
    let backend = Arc::new(HttpKnowledgeBackend::new(
        config.knowledge_base.endpoint.clone(),
    ));
    let dispatcher = ToolDispatcher::new(backend)
        .with_search_max_results(config.knowledge_base.search_max_results);
    let conversation = Arc::new(Conversation::new(
        api,
        dispatcher,
        config.polling.orchestrator_options(),
    ));

    info!(mode = ?cli.mode, "Running client in selected mode");
    match cli.mode {
        RunMode::Cli => {
            let prompt = cli.prompt.join(" ").trim().to_string();
            if prompt.is_empty() {
                return Err("prompt required in cli mode".into());
            }
            info!("Dispatching single prompt via CLI mode");
            let session = conversation.start_session().await?;
            let outcome = conversation.ask(&session, &prompt).await?;

            let output = json!({
                "thread_id": outcome.thread_id,
                "content": outcome.reply,
                "tool_steps": outcome.steps,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        RunMode::Stdio => {
            info!("Entering STDIO mode; awaiting JSON line input");
            stdio::run(conversation.clone()).await?;
        }
    }
    info!("Client execution finished");
    Ok(())
}

fn apply_cli_overrides(cli: &Cli, config: &mut AppConfig) {
    if let Some(url) = &cli.kb_url {
        if config.knowledge_base.endpoint != *url {
            info!(url = %url, "Overriding knowledge-base endpoint based on CLI flag");
        }
        config.knowledge_base.endpoint = url.clone();
    }
    if let Some(url) = &cli.assistant_url {
        config.assistant.endpoint = url.clone();
    }
    if let Some(timeout) = cli.timeout_secs {
        config.polling.timeout_secs = timeout;
    }
}

fn init_tracing(quiet: bool) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = if quiet {
            EnvFilter::new("off")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .init();
    });
}
