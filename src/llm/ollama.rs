use crate::llm::client::{http_client, LLMClient, OutputSchema};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use ollama_rs::{
    generation::{
        chat::{request::ChatMessageRequest, ChatMessage},
        parameters::{FormatType, JsonStructure},
    },
    models::ModelOptions,
    Ollama,
};
use reqwest::Url;
use std::time::Duration;

/// Client for the Ollama `/api/chat` endpoint
pub struct OllamaClient {
    client: Ollama,
    model: String,
    temperature: f32,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String, temperature: f32, timeout: Duration) -> Result<Self> {
        let url = parse_base_url(&base_url)?;
        let port = url.port_or_known_default().unwrap_or(11434);
        let client = Ollama::new_with_client(url, port, http_client(timeout)?);

        Ok(Self {
            client,
            model,
            temperature,
        })
    }

    fn request(
        &self,
        system: Option<&str>,
        prompt: &str,
        schema: Option<&OutputSchema>,
    ) -> Result<ChatMessageRequest> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage::system(system.to_string()));
        }
        messages.push(ChatMessage::user(prompt.to_string()));

        let mut request = ChatMessageRequest::new(self.model.clone(), messages)
            .options(ModelOptions::default().temperature(self.temperature));

        if let Some(schema) = schema {
            let structure = serde_json::from_value(schema.schema.clone()).map_err(|e| {
                AppError::LLM(format!("Invalid output schema '{}': {}", schema.name, e))
            })?;
            request = request.format(FormatType::StructuredJson(Box::new(
                JsonStructure::new_for_schema(structure),
            )));
        }

        Ok(request)
    }

    async fn chat(&self, request: ChatMessageRequest) -> Result<String> {
        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| AppError::LLM(format!("Ollama error: {}", e)))?;

        Ok(response.message.content)
    }
}

/// Parse the configured base URL into the form ollama-rs joins paths onto:
/// an http(s) URL with a host and a trailing slash.
fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| AppError::Config(format!("Invalid Ollama base_url '{}': {}", base_url, e)))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(AppError::Config(format!(
            "Invalid Ollama base_url '{}': expected an http(s) URL with a host",
            base_url
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.chat(self.request(None, prompt, None)?).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.chat(self.request(Some(system), prompt, None)?)
            .await
    }

    async fn generate_structured(
        &self,
        system: &str,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<String> {
        self.chat(self.request(Some(system), prompt, Some(schema))?)
            .await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
