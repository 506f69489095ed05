//! Stub providers shared by the research stage unit tests.

use crate::llm::LLMClient;
use crate::tools::{EvidenceFetcher, SearchProvider};
use crate::types::{AppError, LeafOutcome, Result, SearchHit};
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// LLM client that replays canned replies and records (system, prompt) pairs.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<std::result::Result<String, String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMClient for ScriptedClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply left".to_string()))
            .map_err(AppError::LLM)
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

pub fn plan_json(entity: &str, angles: &[&str]) -> String {
    json!({
        "is_ticker": false,
        "entity_name": entity,
        "context": "Test context",
        "angles": angles
            .iter()
            .map(|a| json!({ "keyword": a, "reason": format!("why {}", a) }))
            .collect::<Vec<_>>(),
    })
    .to_string()
}

pub fn report_json(source_url: &str) -> String {
    json!({
        "executive_summary": "Summary",
        "sections": [{
            "title": "Section",
            "findings": "Findings",
            "key_facts": [{ "content": "c", "source_url": source_url, "source_title": "T" }]
        }],
        "risks_uncertainties": "Risks",
        "what_to_watch": ["Next"]
    })
    .to_string()
}

/// Search stub returning `hits` results per query, with optional per-keyword
/// delay, failure or panic.
#[derive(Default)]
pub struct StubSearch {
    pub hits: usize,
    pub degraded: bool,
    pub slow_keyword: Option<(String, Duration)>,
    pub panic_keyword: Option<String>,
    pub calls: AtomicUsize,
}

impl StubSearch {
    pub fn with_hits(hits: usize) -> Self {
        Self {
            hits,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for StubSearch {
    async fn search(&self, query: &str, max_results: usize) -> LeafOutcome<Vec<SearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(keyword) = &self.panic_keyword {
            if query.contains(keyword.as_str()) {
                panic!("search provider blew up for {}", query);
            }
        }
        if let Some((keyword, delay)) = &self.slow_keyword {
            if query.contains(keyword.as_str()) {
                tokio::time::sleep(*delay).await;
            }
        }
        if self.degraded {
            return LeafOutcome::degraded(Vec::new(), "search unavailable");
        }

        let slug = query.replace(' ', "-").to_lowercase();
        LeafOutcome::Data(
            (0..self.hits.min(max_results))
                .map(|i| SearchHit {
                    title: format!("{} #{}", query, i),
                    href: format!("https://{}.example/{}", slug, i),
                    body: format!("snippet {}", i),
                })
                .collect(),
        )
    }
}

/// Fetcher stub returning fixed content, or the placeholder for every URL.
#[derive(Default)]
pub struct StubFetcher {
    pub content: String,
    pub degraded: bool,
    pub calls: AtomicUsize,
}

impl StubFetcher {
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EvidenceFetcher for StubFetcher {
    async fn fetch(&self, _url: &str, _timeout: Duration) -> LeafOutcome<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.degraded {
            LeafOutcome::degraded(crate::tools::FETCH_PLACEHOLDER.to_string(), "HTTP 503")
        } else {
            LeafOutcome::Data(self.content.clone())
        }
    }
}
