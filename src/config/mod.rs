use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::application::orchestrator::OrchestratorOptions;

const DEFAULT_CONFIG_PATH: &str = "config/client.toml";
const DEFAULT_ASSISTANT_ENDPOINT: &str = "https://api.openai.com";
const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
const DEFAULT_KNOWLEDGE_ENDPOINT: &str = "http://127.0.0.1:8000";
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;
const DEFAULT_SEARCH_MAX_RESULTS: u64 = 5;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub assistant: AssistantConfig,
    pub knowledge_base: KnowledgeBaseConfig,
    pub polling: PollingConfig,
}

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub endpoint: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: Option<String>,
    pub assistant_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct KnowledgeBaseConfig {
    pub endpoint: String,
    pub search_max_results: u64,
}

#[derive(Debug, Clone)]
pub struct PollingConfig {
    pub interval_ms: u64,
    pub timeout_secs: u64,
    pub max_tool_rounds: usize,
}

impl PollingConfig {
    pub fn orchestrator_options(&self) -> OrchestratorOptions {
        OrchestratorOptions {
            poll_interval: Duration::from_millis(self.interval_ms),
            poll_timeout: Duration::from_secs(self.timeout_secs),
            max_tool_rounds: self.max_tool_rounds,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    assistant: RawAssistant,
    #[serde(default)]
    knowledge_base: RawKnowledgeBase,
    #[serde(default)]
    polling: RawPolling,
}

#[derive(Debug, Deserialize, Default)]
struct RawAssistant {
    endpoint: Option<String>,
    api_key_env: Option<String>,
    assistant_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawKnowledgeBase {
    endpoint: Option<String>,
    search_max_results: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct RawPolling {
    interval_ms: Option<u64>,
    timeout_secs: Option<u64>,
    max_tool_rounds: Option<usize>,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return read_config(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        match read_config(default_path) {
            Ok(config) => Ok(config),
            Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                info!("Configuration file not found; using defaults");
                Ok(Self::default())
            }
            Err(other) => Err(other),
        }
    }

    pub fn default() -> Self {
        RawConfig::default().into_config()
    }
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading client configuration file");
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: RawConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parsed.into_config())
}

impl RawConfig {
    fn into_config(self) -> AppConfig {
        AppConfig {
            assistant: AssistantConfig {
                endpoint: self
                    .assistant
                    .endpoint
                    .unwrap_or_else(|| DEFAULT_ASSISTANT_ENDPOINT.to_string()),
                api_key_env: Some(
                    self.assistant
                        .api_key_env
                        .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string()),
                ),
                assistant_id: self.assistant.assistant_id,
            },
            knowledge_base: KnowledgeBaseConfig {
                endpoint: self
                    .knowledge_base
                    .endpoint
                    .unwrap_or_else(|| DEFAULT_KNOWLEDGE_ENDPOINT.to_string()),
                search_max_results: self
                    .knowledge_base
                    .search_max_results
                    .unwrap_or(DEFAULT_SEARCH_MAX_RESULTS),
            },
            polling: PollingConfig {
                interval_ms: self.polling.interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS),
                timeout_secs: self.polling.timeout_secs.unwrap_or(DEFAULT_POLL_TIMEOUT_SECS),
                max_tool_rounds: self
                    .polling
                    .max_tool_rounds
                    .unwrap_or(DEFAULT_MAX_TOOL_ROUNDS),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::sync::Mutex;

    static WORKDIR_GUARD: Mutex<()> = Mutex::new(());

    #[test]
    fn returns_defaults_when_missing() {
        let _lock = WORKDIR_GUARD.lock().expect("lock guard");
        let original_dir = env::current_dir().expect("current dir");
        let temp = tempfile::tempdir().expect("tempdir");
        env::set_current_dir(temp.path()).expect("switch to temp dir");

        let config = AppConfig::load(None).expect("load succeeds");
        assert_eq!(config.assistant.endpoint, DEFAULT_ASSISTANT_ENDPOINT);
        assert_eq!(config.assistant.api_key_env.as_deref(), Some(DEFAULT_API_KEY_ENV));
        assert!(config.assistant.assistant_id.is_none());
        assert_eq!(config.knowledge_base.endpoint, DEFAULT_KNOWLEDGE_ENDPOINT);
        assert_eq!(config.polling.interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(config.polling.timeout_secs, DEFAULT_POLL_TIMEOUT_SECS);

        env::set_current_dir(original_dir).expect("restore current dir");
    }

    #[test]
    fn reads_assistant_and_knowledge_sections() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("client.toml");
        fs::write(
            &path,
            r#"
[assistant]
endpoint = "https://assistant.internal"
api_key_env = "INTERNAL_ASSISTANT_KEY"
assistant_id = "asst_abc123"

[knowledge_base]
endpoint = "http://kb.internal:9000"
search_max_results = 10
"#,
        )
        .expect("write config");

        let config = AppConfig::load(Some(&path)).expect("load config");
        assert_eq!(config.assistant.endpoint, "https://assistant.internal");
        assert_eq!(
            config.assistant.api_key_env.as_deref(),
            Some("INTERNAL_ASSISTANT_KEY")
        );
        assert_eq!(config.assistant.assistant_id.as_deref(), Some("asst_abc123"));
        assert_eq!(config.knowledge_base.endpoint, "http://kb.internal:9000");
        assert_eq!(config.knowledge_base.search_max_results, 10);
        // Unspecified sections fall back.
        assert_eq!(config.polling.timeout_secs, DEFAULT_POLL_TIMEOUT_SECS);
    }

    #[test]
    fn reads_polling_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("client.toml");
        fs::write(
            &path,
            r#"
[polling]
interval_ms = 250
timeout_secs = 15
max_tool_rounds = 3
"#,
        )
        .expect("write config");

        let config = AppConfig::load(Some(&path)).expect("load config");
        let options = config.polling.orchestrator_options();
        assert_eq!(options.poll_interval, Duration::from_millis(250));
        assert_eq!(options.poll_timeout, Duration::from_secs(15));
        assert_eq!(options.max_tool_rounds, 3);
    }

    #[test]
    fn rejects_malformed_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("client.toml");
        fs::write(&path, "[assistant\nendpoint = nope").expect("write config");

        let result = AppConfig::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
