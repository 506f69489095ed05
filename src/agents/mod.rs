pub mod quick_answer;

use crate::types::Result;
use async_trait::async_trait;

pub use quick_answer::QuickAnswerAgent;

/// Base trait for all agents
#[async_trait]
pub trait Agent: Send + Sync {
    /// Execute the agent with given input
    async fn execute(&self, input: &str) -> Result<String>;

    /// Get the agent's system prompt
    fn system_prompt(&self) -> String;

    /// Short identifier used in logs
    fn name(&self) -> &'static str;
}
