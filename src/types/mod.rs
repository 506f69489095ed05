use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============= Planning Types =============

/// A single investigative keyword/reason pair guiding one branch of research.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResearchAngle {
    /// Search keyword/phrase for deep research.
    pub keyword: String,
    /// Why this angle is important.
    pub reason: String,
}

/// Structured output of the planner: fixes entity identity, context and angles
/// for the whole invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResearchPlan {
    /// Whether the query is a stock ticker.
    pub is_ticker: bool,
    /// Resolved full name of the ticker or entity.
    pub entity_name: String,
    /// Context or industry of the discovered entity.
    pub context: String,
    /// 3-4 distinct research angles.
    pub angles: Vec<ResearchAngle>,
}

impl ResearchPlan {
    /// Checks the fields the rest of the pipeline relies on.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.entity_name.trim().is_empty() {
            return Err("entity_name must not be empty".to_string());
        }

        if let Some(idx) = self
            .angles
            .iter()
            .position(|angle| angle.keyword.trim().is_empty())
        {
            return Err(format!("angle #{} has an empty keyword", idx + 1));
        }

        Ok(())
    }

    /// Keywords of all planned angles, in plan order.
    pub fn angle_keywords(&self) -> Vec<&str> {
        self.angles.iter().map(|a| a.keyword.as_str()).collect()
    }
}

// ============= Evidence Types =============

/// One result returned by a search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub href: String,
    pub body: String,
}

/// Evidence gathered from one fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceNote {
    pub title: String,
    pub url: String,
    pub snippet: String,
    /// Cleaned page text, bounded by the configured content limit.
    pub full_content: String,
}

/// All notes collected for a single planned angle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AngleNotes {
    pub angle: String,
    pub reason: String,
    pub notes: Vec<SourceNote>,
}

impl AngleNotes {
    /// A record for an angle that produced no evidence.
    pub fn empty(angle: &ResearchAngle) -> Self {
        Self {
            angle: angle.keyword.clone(),
            reason: angle.reason.clone(),
            notes: Vec::new(),
        }
    }
}

/// Result of a leaf provider call that never fails outright.
///
/// `Degraded` carries the fallback value the caller should use along with the
/// reason the real value could not be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafOutcome<T> {
    Data(T),
    Degraded { fallback: T, reason: String },
}

impl<T> LeafOutcome<T> {
    pub fn degraded(fallback: T, reason: impl Into<String>) -> Self {
        LeafOutcome::Degraded {
            fallback,
            reason: reason.into(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, LeafOutcome::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            LeafOutcome::Data(_) => None,
            LeafOutcome::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            LeafOutcome::Data(value) => value,
            LeafOutcome::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            LeafOutcome::Data(value) => value,
            LeafOutcome::Degraded { fallback, .. } => fallback,
        }
    }
}

/// Per-angle record of how much the leaf providers degraded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AngleDiagnostics {
    pub angle: String,
    /// Set when the search call failed and an empty result set was used.
    pub search_degraded: Option<String>,
    /// Number of pages that were replaced by the fetch placeholder.
    pub fetch_failures: usize,
    /// Number of notes recorded for the angle.
    pub notes: usize,
    /// Set when the angle task itself died before producing notes.
    pub task_failed: Option<String>,
}

impl AngleDiagnostics {
    pub fn is_degraded(&self) -> bool {
        self.search_degraded.is_some() || self.fetch_failures > 0 || self.task_failed.is_some()
    }
}

// ============= Report Types =============

/// A key fact or number found, always tied to its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Fact {
    /// A key fact or number found.
    pub content: String,
    /// URL of the source.
    pub source_url: String,
    /// Title of the source.
    pub source_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Section {
    /// Title of the research section (based on angle).
    pub title: String,
    /// Detailed synthesis of findings for this section (markdown).
    pub findings: String,
    /// List of key facts supporting the findings.
    pub key_facts: Vec<Fact>,
}

/// The structured, cited output of synthesis, prior to markdown rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResearchReport {
    /// High-level summary of the entire research.
    pub executive_summary: String,
    /// Detailed sections.
    pub sections: Vec<Section>,
    /// Identified risks, uncertainties, or conflicting info.
    pub risks_uncertainties: String,
    /// List of future events or metrics to watch.
    pub what_to_watch: Vec<String>,
}

impl ResearchReport {
    /// Every fact must be traceable to a titled source.
    pub fn validate(&self) -> std::result::Result<(), String> {
        for section in &self.sections {
            for (idx, fact) in section.key_facts.iter().enumerate() {
                if fact.source_url.trim().is_empty() || fact.source_title.trim().is_empty() {
                    return Err(format!(
                        "fact #{} in section '{}' is missing its source",
                        idx + 1,
                        section.title
                    ));
                }
            }
        }
        Ok(())
    }

    /// All facts in section order.
    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.sections.iter().flat_map(|s| s.key_facts.iter())
    }
}

// ============= Error Types =============

/// Failure at the generation boundary.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Request(String),

    #[error("model returned invalid JSON for {schema}: {message}")]
    InvalidJson { schema: String, message: String },

    #[error("model output failed validation for {schema}: {message}")]
    Validation { schema: String, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Planning failed: {0}")]
    Planning(#[source] GenerationError),

    #[error("Synthesis failed: {0}")]
    Synthesis(#[source] GenerationError),

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_with(entity: &str, keywords: &[&str]) -> ResearchPlan {
        ResearchPlan {
            is_ticker: false,
            entity_name: entity.to_string(),
            context: "ctx".to_string(),
            angles: keywords
                .iter()
                .map(|k| ResearchAngle {
                    keyword: k.to_string(),
                    reason: "r".to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_plan_validation() {
        assert!(plan_with("Tesla, Inc.", &["Growth", "Risks", "History"])
            .validate()
            .is_ok());
        assert!(plan_with("  ", &["Growth"]).validate().is_err());

        let err = plan_with("Tesla", &["Growth", ""]).validate().unwrap_err();
        assert!(err.contains("#2"));
    }

    #[test]
    fn test_plan_deserializes_from_model_json() {
        let json = r#"{
            "is_ticker": true,
            "entity_name": "NVIDIA Corporation",
            "context": "Semiconductors",
            "angles": [{"keyword": "Financial Performance", "reason": "earnings"}]
        }"#;
        let plan: ResearchPlan = serde_json::from_str(json).unwrap();
        assert!(plan.is_ticker);
        assert_eq!(plan.angle_keywords(), vec!["Financial Performance"]);
    }

    #[test]
    fn test_report_validation_requires_sources() {
        let mut report = ResearchReport {
            executive_summary: "s".to_string(),
            sections: vec![Section {
                title: "Growth".to_string(),
                findings: "f".to_string(),
                key_facts: vec![Fact {
                    content: "c".to_string(),
                    source_url: "https://a.example".to_string(),
                    source_title: "A".to_string(),
                }],
            }],
            risks_uncertainties: "r".to_string(),
            what_to_watch: vec![],
        };
        assert!(report.validate().is_ok());

        report.sections[0].key_facts[0].source_title = String::new();
        let err = report.validate().unwrap_err();
        assert!(err.contains("Growth"));
    }

    #[test]
    fn test_leaf_outcome_accessors() {
        let ok: LeafOutcome<Vec<u8>> = LeafOutcome::Data(vec![1]);
        assert!(!ok.is_degraded());
        assert_eq!(ok.reason(), None);
        assert_eq!(ok.into_value(), vec![1]);

        let bad: LeafOutcome<Vec<u8>> = LeafOutcome::degraded(vec![], "timeout");
        assert!(bad.is_degraded());
        assert_eq!(bad.reason(), Some("timeout"));
        assert!(bad.value().is_empty());
    }

    #[test]
    fn test_schema_carries_field_descriptions() {
        let schema = schemars::schema_for!(ResearchPlan);
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("entity_name"));
        assert!(json.contains("Resolved full name of the ticker or entity."));
    }

    #[test]
    fn test_error_display() {
        let err = AppError::Planning(GenerationError::Request("timeout".to_string()));
        assert_eq!(
            err.to_string(),
            "Planning failed: generation request failed: timeout"
        );
    }
}
