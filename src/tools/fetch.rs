//! Evidence fetcher: downloads a page and reduces it to bounded text.
//!
//! Pages are fetched and converted to markdown by daedra, which picks the
//! main content area (`main`, `article` and similar) before falling back to
//! `<body>`. Tables keep their cells apart.

use crate::types::LeafOutcome;
use crate::utils::text::truncate_chars;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Content substituted for a page that could not be fetched.
pub const FETCH_PLACEHOLDER: &str = "Could not fetch content.";

/// Turns a URL into cleaned, bounded text.
///
/// Implementations never fail: any fault collapses to
/// [`LeafOutcome::Degraded`] carrying [`FETCH_PLACEHOLDER`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EvidenceFetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> LeafOutcome<String>;
}

/// Page fetcher powered by daedra
pub struct PageFetcher {
    content_limit: usize,
}

impl PageFetcher {
    pub fn new(content_limit: usize) -> Self {
        Self { content_limit }
    }

    fn degraded(url: &str, reason: String) -> LeafOutcome<String> {
        warn!(url = %url, reason = %reason, "fetch failed, using placeholder");
        LeafOutcome::degraded(FETCH_PLACEHOLDER.to_string(), reason)
    }
}

#[async_trait]
impl EvidenceFetcher for PageFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> LeafOutcome<String> {
        let fetch_args = daedra::VisitPageArgs {
            url: url.to_string(),
            include_images: false,
            selector: None,
        };

        // daedra retries transport errors and 429s internally; the timeout
        // bounds the whole attempt.
        let outcome =
            tokio::time::timeout(timeout, daedra::tools::fetch::fetch_page(&fetch_args)).await;

        match outcome {
            Ok(Ok(page)) => {
                let bounded = truncate_chars(&page.content, self.content_limit).to_string();
                debug!(
                    url = %url,
                    words = page.word_count,
                    kept_chars = bounded.chars().count(),
                    "fetched page"
                );
                LeafOutcome::Data(bounded)
            }
            Ok(Err(e)) => Self::degraded(url, e.to_string()),
            Err(_) => Self::degraded(url, format!("timed out after {}s", timeout.as_secs())),
        }
    }
}
