//! Single-turn short answer agent
//!
//! The lightweight counterpart to the research pipeline: one prompt, one
//! reply, no tools.

use crate::{agents::Agent, llm::LLMClient, types::{AppError, Result}};
use async_trait::async_trait;
use std::sync::Arc;

pub const QUICK_ANSWER_PROMPT: &str = "Answer in a short way.";

pub struct QuickAnswerAgent {
    llm: Arc<dyn LLMClient>,
}

impl QuickAnswerAgent {
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Agent for QuickAnswerAgent {
    async fn execute(&self, input: &str) -> Result<String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AppError::InvalidInput("question must not be empty".to_string()));
        }

        self.llm
            .generate_with_system(&self.system_prompt(), input)
            .await
    }

    fn system_prompt(&self) -> String {
        QUICK_ANSWER_PROMPT.to_string()
    }

    fn name(&self) -> &'static str {
        "quick-answer"
    }
}
