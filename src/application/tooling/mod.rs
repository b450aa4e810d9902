mod error;
mod http;
mod interface;

pub use error::BackendError;
pub use http::HttpKnowledgeBackend;
pub use interface::KnowledgeBackend;

use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

pub const DEFAULT_SEARCH_MAX_RESULTS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HttpMethod {
    Get,
    Post,
}

/// Static binding of a tool name to its knowledge-service endpoint.
struct DispatchTarget {
    name: &'static str,
    method: HttpMethod,
    path: &'static str,
    required: &'static [&'static str],
}

const TARGETS: [DispatchTarget; 4] = [
    DispatchTarget {
        name: "search_knowledge_base",
        method: HttpMethod::Post,
        path: "/search",
        required: &["question"],
    },
    DispatchTarget {
        name: "add_document",
        method: HttpMethod::Post,
        path: "/documents",
        required: &["content"],
    },
    DispatchTarget {
        name: "get_statistics",
        method: HttpMethod::Get,
        path: "/stats",
        required: &[],
    },
    DispatchTarget {
        name: "check_health",
        method: HttpMethod::Get,
        path: "/health",
        required: &[],
    },
];

/// Result of dispatching one tool call. Always produced; a failing call
/// carries its error in `output` so sibling calls in the batch proceed.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub tool: String,
    pub success: bool,
    pub output: Value,
}

impl DispatchOutcome {
    fn succeeded(tool: &str, output: Value) -> Self {
        Self {
            tool: tool.to_string(),
            success: true,
            output,
        }
    }

    fn failed(tool: &str, message: impl Into<String>) -> Self {
        Self {
            tool: tool.to_string(),
            success: false,
            output: json!({ "error": message.into() }),
        }
    }
}

/// Maps tool invocations from the assistant onto knowledge-service HTTP
/// calls. Stateless between invocations apart from the shared transport.
pub struct ToolDispatcher {
    backend: Arc<dyn KnowledgeBackend>,
    search_max_results: u64,
}

impl ToolDispatcher {
    pub fn new(backend: Arc<dyn KnowledgeBackend>) -> Self {
        Self {
            backend,
            search_max_results: DEFAULT_SEARCH_MAX_RESULTS,
        }
    }

    pub fn with_search_max_results(mut self, max_results: u64) -> Self {
        self.search_max_results = max_results;
        self
    }

    pub async fn dispatch(&self, name: &str, arguments: &Map<String, Value>) -> DispatchOutcome {
        let key = name.to_lowercase();
        let Some(target) = TARGETS.iter().find(|target| target.name == key) else {
            warn!(requested_tool = %name, "Unknown function requested by assistant");
            return DispatchOutcome::failed(name, format!("unknown function: {name}"));
        };

        for argument in target.required {
            if !arguments.contains_key(*argument) {
                warn!(tool = target.name, argument, "Required tool argument missing");
                return DispatchOutcome::failed(
                    target.name,
                    format!("missing required argument '{argument}'"),
                );
            }
        }

        debug!(tool = target.name, path = target.path, "Dispatching tool call");
        let result = match target.method {
            HttpMethod::Get => self.backend.get(target.path).await,
            HttpMethod::Post => {
                let body = self.build_body(target.name, arguments);
                self.backend.post(target.path, &body).await
            }
        };

        match result {
            Ok(output) => {
                info!(tool = target.name, success = true, "Tool call dispatched");
                DispatchOutcome::succeeded(target.name, output)
            }
            Err(source) => {
                warn!(tool = target.name, %source, "Tool call failed");
                DispatchOutcome::failed(target.name, source.to_string())
            }
        }
    }

    fn build_body(&self, tool: &str, arguments: &Map<String, Value>) -> Value {
        match tool {
            "search_knowledge_base" => json!({
                "question": arguments.get("question").cloned().unwrap_or(Value::Null),
                "max_results": arguments
                    .get("max_results")
                    .and_then(Value::as_u64)
                    .unwrap_or(self.search_max_results),
                "use_llm": arguments
                    .get("use_llm")
                    .and_then(Value::as_bool)
                    .unwrap_or(true),
            }),
            "add_document" => json!({
                "content": arguments.get("content").cloned().unwrap_or(Value::Null),
                "source": arguments
                    .get("source")
                    .cloned()
                    .unwrap_or_else(|| Value::String("assistant-conversation".to_string())),
                "metadata": arguments
                    .get("metadata")
                    .cloned()
                    .unwrap_or_else(|| Value::Object(Map::new())),
            }),
            _ => Value::Object(arguments.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingBackend {
        response: Result<Value, fn() -> BackendError>,
        requests: Mutex<Vec<(String, Option<Value>)>>,
    }

    impl RecordingBackend {
        fn returning(response: Value) -> Self {
            Self {
                response: Ok(response),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(make_error: fn() -> BackendError) -> Self {
            Self {
                response: Err(make_error),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<(String, Option<Value>)> {
            self.requests.lock().expect("request log lock").clone()
        }

        fn respond(&self) -> Result<Value, BackendError> {
            match &self.response {
                Ok(value) => Ok(value.clone()),
                Err(make_error) => Err(make_error()),
            }
        }
    }

    #[async_trait]
    impl KnowledgeBackend for RecordingBackend {
        async fn get(&self, path: &str) -> Result<Value, BackendError> {
            self.requests
                .lock()
                .expect("request log lock")
                .push((path.to_string(), None));
            self.respond()
        }

        async fn post(&self, path: &str, body: &Value) -> Result<Value, BackendError> {
            self.requests
                .lock()
                .expect("request log lock")
                .push((path.to_string(), Some(body.clone())));
            self.respond()
        }
    }

    fn arguments(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[tokio::test]
    async fn unknown_function_yields_error_outcome() {
        let backend = Arc::new(RecordingBackend::returning(json!({})));
        let dispatcher = ToolDispatcher::new(backend.clone());

        let outcome = dispatcher.dispatch("summon_demon", &Map::new()).await;

        assert!(!outcome.success);
        let message = outcome.output["error"].as_str().expect("error string");
        assert!(message.contains("unknown function"));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn search_applies_defaults_and_copies_question() {
        let backend = Arc::new(RecordingBackend::returning(json!({"answer": "42"})));
        let dispatcher = ToolDispatcher::new(backend.clone());

        let outcome = dispatcher
            .dispatch(
                "search_knowledge_base",
                &arguments(&[("question", json!("what is neo4j?"))]),
            )
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.output, json!({"answer": "42"}));

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        let (path, body) = &requests[0];
        assert_eq!(path, "/search");
        let body = body.as_ref().expect("search posts a body");
        assert_eq!(body["question"], json!("what is neo4j?"));
        assert_eq!(body["max_results"], json!(DEFAULT_SEARCH_MAX_RESULTS));
        assert_eq!(body["use_llm"], json!(true));
    }

    #[tokio::test]
    async fn search_without_question_fails_locally() {
        let backend = Arc::new(RecordingBackend::returning(json!({})));
        let dispatcher = ToolDispatcher::new(backend.clone());

        let outcome = dispatcher.dispatch("search_knowledge_base", &Map::new()).await;

        assert!(!outcome.success);
        let message = outcome.output["error"].as_str().expect("error string");
        assert!(message.contains("question"));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn backend_status_error_is_reported_with_code() {
        let backend = Arc::new(RecordingBackend::failing(|| BackendError::Status {
            status: 500,
            body: "internal error".to_string(),
        }));
        let dispatcher = ToolDispatcher::new(backend);

        let outcome = dispatcher.dispatch("check_health", &Map::new()).await;

        assert!(!outcome.success);
        let message = outcome.output["error"].as_str().expect("error string");
        assert!(message.contains("500"));
    }

    #[tokio::test]
    async fn statistics_and_health_are_gets() {
        let backend = Arc::new(RecordingBackend::returning(json!({"status": "ok"})));
        let dispatcher = ToolDispatcher::new(backend.clone());

        dispatcher.dispatch("get_statistics", &Map::new()).await;
        dispatcher.dispatch("check_health", &Map::new()).await;

        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], ("/stats".to_string(), None));
        assert_eq!(requests[1], ("/health".to_string(), None));
    }

    #[tokio::test]
    async fn add_document_defaults_source_and_metadata() {
        let backend = Arc::new(RecordingBackend::returning(json!({"status": "added"})));
        let dispatcher = ToolDispatcher::new(backend.clone());

        let outcome = dispatcher
            .dispatch(
                "add_document",
                &arguments(&[("content", json!("GraphRAG combines graphs with retrieval."))]),
            )
            .await;

        assert!(outcome.success);
        let requests = backend.requests();
        let body = requests[0].1.as_ref().expect("documents posts a body");
        assert_eq!(body["source"], json!("assistant-conversation"));
        assert_eq!(body["metadata"], json!({}));
    }
}
