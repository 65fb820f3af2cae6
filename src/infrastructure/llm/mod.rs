mod chat_completion_client;
mod mock_llm_client;

pub use chat_completion_client::{ChatCompletionClient, create_chat_completion_client};
pub use mock_llm_client::MockLlmClient;
