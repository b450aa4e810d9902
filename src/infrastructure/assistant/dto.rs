//! Wire representations for the assistant service (Assistants v2 shapes)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::types::AssistantError;
use crate::domain::types::{Run, RunState, ToolCall, ToolOutput};

#[derive(Debug, Deserialize)]
pub(crate) struct ThreadDto {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageAckDto {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateMessageRequest<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateRunRequest<'a> {
    pub assistant_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitToolOutputsRequest<'a> {
    pub tool_outputs: &'a [ToolOutput],
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunDto {
    pub id: String,
    pub thread_id: String,
    pub status: String,
    pub required_action: Option<RequiredActionDto>,
    pub last_error: Option<LastErrorDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RequiredActionDto {
    pub submit_tool_outputs: SubmitToolOutputsDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitToolOutputsDto {
    pub tool_calls: Vec<ToolCallDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ToolCallDto {
    pub id: String,
    pub function: FunctionCallDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FunctionCallDto {
    pub name: String,
    /// JSON-encoded argument object, as the service ships it.
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LastErrorDto {
    pub code: Option<String>,
    pub message: String,
}

impl RunDto {
    pub(crate) fn into_domain(self) -> Result<Run, AssistantError> {
        let state = match self.status.as_str() {
            "queued" => RunState::Queued,
            // "cancelling" is still in flight from the orchestrator's view.
            "in_progress" | "cancelling" => RunState::InProgress,
            "requires_action" => {
                let calls = self
                    .required_action
                    .map(|action| action.submit_tool_outputs.tool_calls)
                    .unwrap_or_default();
                if calls.is_empty() {
                    return Err(AssistantError::invalid_response(
                        "run requires action but carries no tool calls",
                    ));
                }
                RunState::RequiresAction {
                    tool_calls: calls.into_iter().map(ToolCallDto::into_domain).collect(),
                }
            }
            "completed" => RunState::Completed,
            "failed" => RunState::Failed {
                error: self.last_error.map(LastErrorDto::into_detail),
            },
            "cancelled" => RunState::Cancelled,
            "expired" => RunState::Expired,
            other => {
                return Err(AssistantError::invalid_response(format!(
                    "unknown run status '{other}'"
                )));
            }
        };
        Ok(Run {
            id: self.id,
            thread_id: self.thread_id,
            state,
        })
    }
}

impl ToolCallDto {
    fn into_domain(self) -> ToolCall {
        let arguments = match serde_json::from_str::<Map<String, Value>>(&self.function.arguments) {
            Ok(map) => map,
            Err(source) => {
                warn!(
                    tool = %self.function.name,
                    %source,
                    "Tool call arguments are not a JSON object; treating as empty"
                );
                Map::new()
            }
        };
        ToolCall {
            id: self.id,
            name: self.function.name,
            arguments,
        }
    }
}

impl LastErrorDto {
    fn into_detail(self) -> String {
        match self.code {
            Some(code) => format!("{code}: {message}", message = self.message),
            None => self.message,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageListDto {
    pub data: Vec<MessageDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageDto {
    pub role: String,
    pub content: Vec<MessageContentDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageContentDto {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<MessageTextDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageTextDto {
    pub value: String,
}

impl MessageListDto {
    /// Messages are requested newest-first; the first assistant entry is the
    /// latest reply. Non-text content parts are skipped.
    pub(crate) fn latest_assistant_text(&self) -> Option<String> {
        let message = self.data.iter().find(|message| message.role == "assistant")?;
        let text = message
            .content
            .iter()
            .filter(|part| part.kind == "text")
            .filter_map(|part| part.text.as_ref())
            .map(|text| text.value.trim())
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if text.is_empty() { None } else { Some(text) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run_dto(payload: Value) -> RunDto {
        serde_json::from_value(payload).expect("run payload deserializes")
    }

    #[test]
    fn maps_plain_statuses() {
        let run = run_dto(json!({
            "id": "run_1",
            "thread_id": "thread_1",
            "status": "in_progress",
            "required_action": null,
            "last_error": null,
        }))
        .into_domain()
        .expect("conversion succeeds");

        assert_eq!(run.id, "run_1");
        assert_eq!(run.state, RunState::InProgress);
    }

    #[test]
    fn requires_action_carries_parsed_tool_calls() {
        let run = run_dto(json!({
            "id": "run_2",
            "thread_id": "thread_1",
            "status": "requires_action",
            "required_action": {
                "submit_tool_outputs": {
                    "tool_calls": [
                        {
                            "id": "call_a",
                            "function": {
                                "name": "search_knowledge_base",
                                "arguments": "{\"question\":\"what is neo4j\"}"
                            }
                        }
                    ]
                }
            },
            "last_error": null,
        }))
        .into_domain()
        .expect("conversion succeeds");

        let RunState::RequiresAction { tool_calls } = run.state else {
            panic!("expected requires_action state");
        };
        assert_eq!(tool_calls.len(), 1);
        assert_eq!(tool_calls[0].id, "call_a");
        assert_eq!(
            tool_calls[0].arguments.get("question").and_then(Value::as_str),
            Some("what is neo4j")
        );
    }

    #[test]
    fn requires_action_without_batch_is_invalid() {
        let result = run_dto(json!({
            "id": "run_3",
            "thread_id": "thread_1",
            "status": "requires_action",
            "required_action": null,
            "last_error": null,
        }))
        .into_domain();

        assert!(matches!(
            result,
            Err(AssistantError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn unparseable_arguments_degrade_to_empty_map() {
        let run = run_dto(json!({
            "id": "run_4",
            "thread_id": "thread_1",
            "status": "requires_action",
            "required_action": {
                "submit_tool_outputs": {
                    "tool_calls": [
                        {
                            "id": "call_b",
                            "function": { "name": "check_health", "arguments": "not json" }
                        }
                    ]
                }
            },
            "last_error": null,
        }))
        .into_domain()
        .expect("conversion succeeds");

        let RunState::RequiresAction { tool_calls } = run.state else {
            panic!("expected requires_action state");
        };
        assert!(tool_calls[0].arguments.is_empty());
    }

    #[test]
    fn failed_run_keeps_service_detail() {
        let run = run_dto(json!({
            "id": "run_5",
            "thread_id": "thread_1",
            "status": "failed",
            "required_action": null,
            "last_error": { "code": "rate_limit_exceeded", "message": "too many requests" },
        }))
        .into_domain()
        .expect("conversion succeeds");

        assert_eq!(
            run.state,
            RunState::Failed {
                error: Some("rate_limit_exceeded: too many requests".to_string())
            }
        );
    }

    #[test]
    fn latest_assistant_text_joins_text_parts() {
        let list: MessageListDto = serde_json::from_value(json!({
            "data": [
                {
                    "role": "assistant",
                    "content": [
                        { "type": "text", "text": { "value": "All systems healthy." } },
                        { "type": "image_file", "text": null },
                        { "type": "text", "text": { "value": "Neo4j connected." } }
                    ]
                },
                {
                    "role": "user",
                    "content": [ { "type": "text", "text": { "value": "health?" } } ]
                }
            ]
        }))
        .expect("message list deserializes");

        assert_eq!(
            list.latest_assistant_text().as_deref(),
            Some("All systems healthy.\nNeo4j connected.")
        );
    }

    #[test]
    fn latest_assistant_text_is_none_without_assistant_reply() {
        let list: MessageListDto = serde_json::from_value(json!({
            "data": [
                { "role": "user", "content": [ { "type": "text", "text": { "value": "hi" } } ] }
            ]
        }))
        .expect("message list deserializes");

        assert!(list.latest_assistant_text().is_none());
    }
}
