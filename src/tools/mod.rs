//! Leaf providers for the research pipeline
//!
//! Both providers share one contract: they never return an error. Any fault
//! collapses into [`LeafOutcome::Degraded`](crate::types::LeafOutcome) so the
//! research stage can keep going and still count what went wrong.
//!
//! - [`search`](crate::tools::search) - Web search via DuckDuckGo (daedra)
//! - [`fetch`](crate::tools::fetch) - Page download and HTML-to-markdown conversion (daedra)
//!
//! ```ignore
//! let hits = DuckDuckGoSearch::default().search("NVIDIA Risks", 3).await;
//! for hit in hits.value() {
//!     println!("{}: {}", hit.title, hit.href);
//! }
//! ```

/// Evidence fetcher using daedra.
pub mod fetch;
/// Web search provider using DuckDuckGo.
pub mod search;

pub use fetch::{EvidenceFetcher, PageFetcher, FETCH_PLACEHOLDER};
pub use search::{DuckDuckGoSearch, SearchProvider};
