//! Citation grounding: checks that every cited URL was actually gathered.

use crate::types::{AngleNotes, AppError, GenerationError, ResearchReport, Result};
use crate::utils::toml_config::CitationPolicy;
use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

/// A fact whose source URL does not appear in any gathered note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitationFinding {
    pub section: String,
    pub source_title: String,
    pub source_url: String,
}

fn normalize_url(url: &str) -> &str {
    url.trim().trim_end_matches('/')
}

/// Every fact in `report` whose URL is not among the note URLs.
pub fn audit_citations(report: &ResearchReport, notes: &[AngleNotes]) -> Vec<CitationFinding> {
    let gathered: HashSet<&str> = notes
        .iter()
        .flat_map(|angle| angle.notes.iter())
        .map(|note| normalize_url(&note.url))
        .collect();

    report
        .sections
        .iter()
        .flat_map(|section| section.key_facts.iter().map(move |fact| (section, fact)))
        .filter(|(_, fact)| !gathered.contains(normalize_url(&fact.source_url)))
        .map(|(section, fact)| CitationFinding {
            section: section.title.clone(),
            source_title: fact.source_title.clone(),
            source_url: fact.source_url.clone(),
        })
        .collect()
}

/// Audit according to `policy`. Returns the findings that were recorded; under
/// `Strict` any finding is a synthesis failure.
pub fn enforce_citations(
    policy: CitationPolicy,
    report: &ResearchReport,
    notes: &[AngleNotes],
) -> Result<Vec<CitationFinding>> {
    if policy == CitationPolicy::Off {
        return Ok(Vec::new());
    }

    let findings = audit_citations(report, notes);
    for finding in &findings {
        warn!(
            section = %finding.section,
            url = %finding.source_url,
            "cited source was not among the gathered notes"
        );
    }

    if policy == CitationPolicy::Strict && !findings.is_empty() {
        let urls: Vec<&str> = findings.iter().map(|f| f.source_url.as_str()).collect();
        return Err(AppError::Synthesis(GenerationError::Validation {
            schema: "ResearchReport".to_string(),
            message: format!("ungrounded citations: {}", urls.join(", ")),
        }));
    }

    Ok(findings)
}
