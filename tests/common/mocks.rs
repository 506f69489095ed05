//! Mock implementations for testing.
//!
//! Scripted LLM client and stub search/fetch providers shared by the
//! integration tests. The stubs count their calls so tests can assert that a
//! stage was (or was not) reached.

use async_trait::async_trait;
use deep_research::llm::LLMClient;
use deep_research::tools::{EvidenceFetcher, SearchProvider, FETCH_PLACEHOLDER};
use deep_research::types::{AppError, LeafOutcome, Result, SearchHit};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock LLM client that replays replies in order.
///
/// ```ignore
/// let client = MockLLMClient::scripted(vec![plan_reply(..), report_reply(..)]);
/// let client = MockLLMClient::failing();
/// ```
pub struct MockLLMClient {
    replies: Mutex<VecDeque<String>>,
    should_fail: bool,
    prompts: Mutex<Vec<String>>,
}

impl MockLLMClient {
    /// Create a client that returns `replies` one per call.
    pub fn scripted(replies: Vec<String>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            should_fail: false,
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::new()),
            should_fail: true,
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// User prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, _system: &str, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::LLM("Mock LLM has no replies left".to_string()))
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Planner reply for `entity` with the given angle keywords.
pub fn plan_reply(entity: &str, context: &str, angles: &[&str]) -> String {
    json!({
        "is_ticker": true,
        "entity_name": entity,
        "context": context,
        "angles": angles
            .iter()
            .map(|a| json!({ "keyword": a, "reason": format!("Why {} matters", a) }))
            .collect::<Vec<_>>()
    })
    .to_string()
}

/// Writer reply with a single section holding one fact.
pub fn report_reply(section: &str, content: &str, title: &str, url: &str) -> String {
    json!({
        "executive_summary": "Summary.",
        "sections": [{
            "title": section,
            "findings": "Findings.",
            "key_facts": [{ "content": content, "source_title": title, "source_url": url }]
        }],
        "risks_uncertainties": "Risks.",
        "what_to_watch": ["Next earnings call"]
    })
    .to_string()
}

type Responder = Box<dyn Fn(&str) -> Vec<SearchHit> + Send + Sync>;

/// Search stub driven by a closure over the query.
pub struct StubSearch {
    responder: Responder,
    fail: bool,
    delays: Vec<(String, Duration)>,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl StubSearch {
    pub fn new(responder: impl Fn(&str) -> Vec<SearchHit> + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            fail: false,
            delays: Vec::new(),
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// A provider that returns `count` generic hits for every query.
    pub fn with_hits(count: usize) -> Self {
        Self::new(move |query| {
            (0..count)
                .map(|i| hit(&format!("{} result {}", query, i), &url_for(query, i)))
                .collect()
        })
    }

    /// A provider whose every call degrades to an empty result set.
    pub fn failing() -> Self {
        let mut search = Self::new(|_| Vec::new());
        search.fail = true;
        search
    }

    /// Delay queries containing `needle`.
    pub fn delay(mut self, needle: &str, delay: Duration) -> Self {
        self.delays.push((needle.to_string(), delay));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for StubSearch {
    async fn search(&self, query: &str, max_results: usize) -> LeafOutcome<Vec<SearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());

        for (needle, delay) in &self.delays {
            if query.contains(needle.as_str()) {
                tokio::time::sleep(*delay).await;
            }
        }

        if self.fail {
            return LeafOutcome::degraded(Vec::new(), "search backend unreachable");
        }

        let mut hits = (self.responder)(query);
        hits.truncate(max_results);
        LeafOutcome::Data(hits)
    }
}

/// Fetcher stub returning `content` for every URL, or failing for all.
pub struct StubFetcher {
    content: String,
    fail: bool,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            content: String::new(),
            fail: true,
            calls: AtomicUsize::new(0),
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
        if self.fail {
            LeafOutcome::degraded(FETCH_PLACEHOLDER.to_string(), "connection reset")
        } else {
            LeafOutcome::Data(self.content.clone())
        }
    }
}

pub fn hit(title: &str, href: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        href: href.to_string(),
        body: format!("About {}", title),
    }
}

pub fn url_for(query: &str, i: usize) -> String {
    format!(
        "https://{}.example/{}",
        query.to_lowercase().replace(' ', "-"),
        i
    )
}
