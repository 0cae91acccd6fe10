//! Neighborhood opportunity analysis for a business concept and a location.
//!
//! Combines a business-search API with a free-text AI assistant: raw
//! competitor listings are aggregated into summary metrics and geographic
//! hotspots, and the assistant's unstructured replies are sanitized and
//! coerced into strict records the UI layer can rely on. The pipeline
//! degrades gracefully — AI-derived fields fall back to empty values, and
//! only a failed competitor search fails a request outright.

pub mod analysis;
pub mod assistant;
pub mod cache;
pub mod coerce;
pub mod config;
pub mod errors;
pub mod hotspots;
pub mod prompts;
pub mod records;
pub mod sanitize;
pub mod search;
pub mod telemetry;

use once_cell::sync::OnceCell;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use analysis::{AnalysisEngine, AnalysisResult, CustomerReviewInsights};
pub use assistant::{AssistantService, FreeTextAsk};
pub use cache::{cache_key, ResultCache};
pub use coerce::{
    to_detailed_area, to_ranked_areas, DetailedArea, RankedArea, Saturation, TrafficTier,
};
pub use config::{AppConfig, PublicAppConfig};
pub use errors::{AppError, AppResult};
pub use hotspots::{cluster_by_neighborhood, summarize, ClusterLimits, Hotspot, SummaryMetrics};
pub use records::CompetitorRecord;
pub use sanitize::extract_payload;
pub use search::{CompetitorSearch, SearchService};
pub use telemetry::TelemetryClient;

pub fn init_tracing() {
    static INIT: OnceCell<()> = OnceCell::new();
    let _ = INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,market_scout=debug"));
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    });
}
