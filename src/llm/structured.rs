//! Schema-constrained generation
//!
//! [`StructuredGenerator`] is the generation boundary of the pipeline: it turns
//! a natural-language prompt into a validated instance of a Rust type. The JSON
//! schema of the target type is derived with `schemars` and handed to the
//! provider; the reply is parsed with `serde_json` and then checked by the
//! type's own [`StructuredOutput::validate_output`]. Each failure mode maps to
//! its own [`GenerationError`] variant.

use crate::llm::client::{LLMClient, OutputSchema};
use crate::types::{GenerationError, ResearchPlan, ResearchReport};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// A type the generation service can be asked to produce.
pub trait StructuredOutput: JsonSchema + DeserializeOwned + Send + 'static {
    /// Semantic checks the JSON schema cannot express.
    fn validate_output(&self) -> Result<(), String> {
        Ok(())
    }
}

impl StructuredOutput for ResearchPlan {
    fn validate_output(&self) -> Result<(), String> {
        self.validate()
    }
}

impl StructuredOutput for ResearchReport {
    fn validate_output(&self) -> Result<(), String> {
        self.validate()
    }
}

/// Derive the provider-facing schema for `T`.
///
/// Subschemas are inlined: Ollama's `format` does not resolve `$ref`.
pub fn output_schema<T: JsonSchema>() -> OutputSchema {
    let mut settings = schemars::generate::SchemaSettings::draft07();
    settings.inline_subschemas = true;
    let schema = settings.into_generator().into_root_schema_for::<T>();
    OutputSchema {
        name: T::schema_name().to_string(),
        schema: schema.to_value(),
    }
}

/// Generation service over any [`LLMClient`].
#[derive(Clone)]
pub struct StructuredGenerator {
    llm: Arc<dyn LLMClient>,
}

impl StructuredGenerator {
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self { llm }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Ask the model for a `T`, then parse and validate the reply.
    pub async fn generate<T: StructuredOutput>(
        &self,
        instructions: &str,
        prompt: &str,
    ) -> Result<T, GenerationError> {
        let schema = output_schema::<T>();

        let raw = self
            .llm
            .generate_structured(instructions, prompt, &schema)
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        debug!(
            schema = %schema.name,
            model = %self.llm.model_name(),
            reply_len = raw.len(),
            "received structured reply"
        );

        parse_structured(&raw, &schema.name)
    }
}

/// Parse a model reply into `T`, tolerating Markdown code fences and prose
/// around the JSON object.
pub fn parse_structured<T: StructuredOutput>(
    raw: &str,
    schema_name: &str,
) -> Result<T, GenerationError> {
    let json = extract_json(raw);

    let value: T = serde_json::from_str(json).map_err(|e| GenerationError::InvalidJson {
        schema: schema_name.to_string(),
        message: e.to_string(),
    })?;

    value
        .validate_output()
        .map_err(|message| GenerationError::Validation {
            schema: schema_name.to_string(),
            message,
        })?;

    Ok(value)
}

fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();

    let unfenced = match trimmed.strip_prefix("```") {
        Some(rest) => {
            // drop the language tag line, e.g. ```json
            let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
            body.trim_end().strip_suffix("```").unwrap_or(body).trim()
        }
        None => trimmed,
    };

    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => &unfenced[start..=end],
        _ => unfenced,
    }
}
