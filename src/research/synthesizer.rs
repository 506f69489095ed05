//! Synthesis stage: aggregates all angle notes into one bounded context and
//! asks the generation service for a structured report.

use crate::llm::StructuredGenerator;
use crate::types::{AngleNotes, AppError, ResearchPlan, ResearchReport, Result};
use crate::utils::text::truncate_chars;
use std::sync::Arc;
use tracing::{debug, info};

pub const WRITER_INSTRUCTIONS: &str = r#"You are a Senior Equity Research Analyst and Technical Writer.
Your goal is to write a comprehensive 'Deep Research Report' based on the provided research notes.

You will be given a set of notes from different research angles.
Structure the report clearly.

IMPORTANT:
- Use the provided search results to back up your claims.
- Cite your sources by title and URL in the 'key_facts' sections.
- Be objective and thorough.
- Highlight risks and future watch items."#;

/// Line emitted under an angle that produced no sources.
pub const NO_SOURCES_LINE: &str = "No sources were found for this angle.";

/// Build the writer context. Each source excerpt is cut to `excerpt_limit`
/// characters.
pub fn build_research_context(
    plan: &ResearchPlan,
    notes: &[AngleNotes],
    excerpt_limit: usize,
) -> String {
    let mut context = format!(
        "Subject: {}\nContext: {}\n\n",
        plan.entity_name, plan.context
    );

    for angle in notes {
        context.push_str(&format!(
            "## Research Angle: {}\nReason: {}\n",
            angle.angle, angle.reason
        ));

        if angle.notes.is_empty() {
            context.push_str(&format!("{}\n\n", NO_SOURCES_LINE));
            continue;
        }

        for note in &angle.notes {
            context.push_str(&format!(
                "Source: {} ({})\nSnippet: {}\nContent (truncated): {}\n\n",
                note.title,
                note.url,
                note.snippet,
                truncate_chars(&note.full_content, excerpt_limit)
            ));
        }
    }

    context
}

pub struct Synthesizer {
    generator: Arc<StructuredGenerator>,
    excerpt_limit: usize,
}

impl Synthesizer {
    pub fn new(generator: Arc<StructuredGenerator>, excerpt_limit: usize) -> Self {
        Self {
            generator,
            excerpt_limit,
        }
    }

    /// Produce the structured report. Any generation failure is fatal.
    pub async fn synthesize(
        &self,
        plan: &ResearchPlan,
        notes: &[AngleNotes],
    ) -> Result<ResearchReport> {
        let context = build_research_context(plan, notes, self.excerpt_limit);
        debug!(context_chars = context.chars().count(), "research context built");

        let report: ResearchReport = self
            .generator
            .generate(WRITER_INSTRUCTIONS, &context)
            .await
            .map_err(AppError::Synthesis)?;

        info!(
            sections = report.sections.len(),
            facts = report.facts().count(),
            "report synthesized"
        );

        Ok(report)
    }
}
