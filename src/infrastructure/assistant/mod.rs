mod dto;
mod http;
mod traits;
mod types;

pub use http::HttpAssistantClient;
pub use traits::AssistantApi;
pub use types::AssistantError;
