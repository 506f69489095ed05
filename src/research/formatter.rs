//! Markdown rendering of a finished report.

use crate::types::{ResearchPlan, ResearchReport};

/// Render `report` as the final markdown document.
///
/// Pure and total: the same inputs always produce the same document, and
/// nothing is reordered, deduplicated or filtered.
pub fn format_report(plan: &ResearchPlan, report: &ResearchReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Deep Research Report: {}\n\n", plan.entity_name));
    out.push_str(&format!("**Context**: {}\n\n", plan.context));

    out.push_str("## Executive Summary\n");
    out.push_str(&format!("{}\n\n", report.executive_summary));

    for section in &report.sections {
        out.push_str(&format!("## {}\n", section.title));
        out.push_str(&format!("{}\n\n", section.findings));
        out.push_str("**Key Evidence:**\n");
        for fact in &section.key_facts {
            out.push_str(&format!(
                "- {} ([{}]({}))\n",
                fact.content, fact.source_title, fact.source_url
            ));
        }
        out.push('\n');
    }

    out.push_str("## Risks & Uncertainties\n");
    out.push_str(&format!("{}\n\n", report.risks_uncertainties));

    out.push_str("## What to Watch Next\n");
    for item in &report.what_to_watch {
        out.push_str(&format!("- {}\n", item));
    }

    out
}
