use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::application::orchestrator::{Conversation, ToolStep};
use crate::domain::types::Session;

#[derive(Debug, Error)]
pub enum StdioError {
    #[error("stdin/stdout I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize stdio response: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct StdioAskRequest {
    prompt: String,
    thread_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct StdioAskResponse {
    thread_id: Option<String>,
    content: Option<String>,
    error: Option<String>,
    tool_steps: Vec<ToolStep>,
}

impl StdioAskResponse {
    fn success(thread_id: String, content: String, tool_steps: Vec<ToolStep>) -> Self {
        Self {
            thread_id: Some(thread_id),
            content: Some(content),
            error: None,
            tool_steps,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            thread_id: None,
            content: None,
            error: Some(message.into()),
            tool_steps: Vec::new(),
        }
    }
}

/// Newline-delimited JSON loop for driving conversations from scripts.
pub async fn run(conversation: Arc<Conversation>) -> Result<(), StdioError> {
    let stdin = BufReader::new(io::stdin());
    let mut lines = stdin.lines();
    let mut stdout = io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        debug!("Received STDIO line");

        let request = match serde_json::from_str::<StdioAskRequest>(&line) {
            Ok(request) => request,
            Err(parse_error) => {
                error!(%parse_error, "Failed to parse STDIO input line");
                write_response(
                    &mut stdout,
                    StdioAskResponse::error(format!("invalid JSON input: {parse_error}")),
                )
                .await?;
                continue;
            }
        };

        if request.prompt.trim().is_empty() {
            write_response(&mut stdout, StdioAskResponse::error("prompt cannot be empty"))
                .await?;
            continue;
        }

        let session = match request.thread_id {
            Some(thread_id) => Session::new(thread_id),
            None => match conversation.start_session().await {
                Ok(session) => session,
                Err(start_error) => {
                    error!(%start_error, "Failed to start a conversation session");
                    write_response(
                        &mut stdout,
                        StdioAskResponse::error(start_error.user_message()),
                    )
                    .await?;
                    continue;
                }
            },
        };

        info!(thread = %session.thread_id, "Processing STDIO ask request");
        match conversation.ask(&session, &request.prompt).await {
            Ok(outcome) => {
                write_response(
                    &mut stdout,
                    StdioAskResponse::success(outcome.thread_id, outcome.reply, outcome.steps),
                )
                .await?;
            }
            Err(ask_error) => {
                error!(%ask_error, "Ask request failed via STDIO");
                write_response(
                    &mut stdout,
                    StdioAskResponse::error(ask_error.user_message()),
                )
                .await?;
            }
        }
    }

    stdout.flush().await?;
    Ok(())
}

async fn write_response(
    stdout: &mut io::Stdout,
    response: StdioAskResponse,
) -> Result<(), StdioError> {
    let mut payload = serde_json::to_vec(&response)?;
    payload.push(b'\n');
    stdout.write_all(&payload).await?;
    stdout.flush().await?;
    Ok(())
}
