//! Planner stage: resolves the query into an entity and a set of research angles.

use crate::llm::StructuredGenerator;
use crate::tools::search::format_hits;
use crate::types::{AppError, GenerationError, ResearchPlan, Result, SearchHit};
use crate::utils::toml_config::{AnglePolicy, ResearchConfig};
use std::sync::Arc;
use tracing::{info, warn};

pub const PLANNER_INSTRUCTIONS: &str = r#"You are a Research Planner. Your goal is to understand the user's request.
1. Determine if the input is a Stock Ticker (like 'NVDA') or a General Query.
2. If it's a Ticker, identify the Company Name and Industry Context.
3. Generate 3-4 distinct research angles (keywords) to investigate.

If it is a general query, treat the input as the context.

Examples of angles for stocks: 'Financial Performance', 'Competitive Landscape', 'Growth Drivers', 'Risks'.
Examples for general: 'History', 'Key Technology', 'Market Size', 'Future Outlook'."#;

/// Build the planner prompt from the raw query and optional seed hits.
pub fn build_planner_prompt(query: &str, seed: Option<&[SearchHit]>) -> String {
    let mut prompt = format!("User Query: {}", query);

    if let Some(hits) = seed.filter(|hits| !hits.is_empty()) {
        prompt.push_str("\nInitial Search Context:\n");
        prompt.push_str(&format_hits(hits));
    }

    prompt
}

pub struct Planner {
    generator: Arc<StructuredGenerator>,
    policy: AnglePolicy,
    min_angles: usize,
    max_angles: usize,
}

impl Planner {
    pub fn new(generator: Arc<StructuredGenerator>, config: &ResearchConfig) -> Self {
        Self {
            generator,
            policy: config.angle_policy,
            min_angles: config.min_angles,
            max_angles: config.max_angles,
        }
    }

    /// Produce the plan for `query`. Any generation failure is fatal.
    pub async fn plan(&self, query: &str, seed: Option<&[SearchHit]>) -> Result<ResearchPlan> {
        let prompt = build_planner_prompt(query, seed);

        let plan: ResearchPlan = self
            .generator
            .generate(PLANNER_INSTRUCTIONS, &prompt)
            .await
            .map_err(AppError::Planning)?;

        let plan = self.apply_angle_policy(plan)?;

        info!(
            entity = %plan.entity_name,
            context = %plan.context,
            is_ticker = plan.is_ticker,
            angles = ?plan.angle_keywords(),
            "plan created"
        );

        Ok(plan)
    }

    fn apply_angle_policy(&self, mut plan: ResearchPlan) -> Result<ResearchPlan> {
        let count = plan.angles.len();
        if (self.min_angles..=self.max_angles).contains(&count) {
            return Ok(plan);
        }

        let message = format!(
            "planner proposed {} angles, expected {}-{}",
            count, self.min_angles, self.max_angles
        );

        match self.policy {
            AnglePolicy::Warn => {
                warn!(count, min = self.min_angles, max = self.max_angles, "{}", message);
            }
            AnglePolicy::Clamp => {
                if count > self.max_angles {
                    plan.angles.truncate(self.max_angles);
                    warn!(count, kept = self.max_angles, "dropped surplus research angles");
                } else {
                    warn!(count, min = self.min_angles, "{}", message);
                }
            }
            AnglePolicy::Strict => {
                return Err(AppError::Planning(GenerationError::Validation {
                    schema: "ResearchPlan".to_string(),
                    message,
                }));
            }
        }

        Ok(plan)
    }
}
