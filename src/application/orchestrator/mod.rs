mod conversation;
mod errors;
mod models;
mod poller;
mod resolver;


pub use conversation::Conversation;
pub use errors::OrchestrationError;
pub use models::{AskOutcome, OrchestratorOptions, ToolStep};
pub use poller::{PollOutcome, RunPoller};
pub use resolver::{ResolvedBatch, ToolCallResolver};
