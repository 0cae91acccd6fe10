use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::assistant::AssistantService;
use crate::cache::{cache_key, ResultCache};
use crate::coerce::{to_detailed_area, to_ranked_areas, DetailedArea, RankedArea};
use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::hotspots::{summarize, ClusterLimits, SummaryMetrics};
use crate::prompts;
use crate::records::CompetitorRecord;
use crate::search::SearchService;
use crate::telemetry::TelemetryClient;

/// Full output of one opportunity analysis: summary metrics, AI-ranked
/// areas (possibly empty when enrichment was unavailable), and the raw
/// competitor set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub metrics: SummaryMetrics,
    pub top_areas: Vec<RankedArea>,
    pub competitors: Vec<CompetitorRecord>,
}

/// Review-theme summary for a specific customer question about one area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerReviewInsights {
    pub query: String,
    pub business: String,
    pub area: String,
    pub location: String,
    pub insights: String,
}

/// Sequences the two collaborators and the normalization pipeline into one
/// analysis per `(business, location)` query, memoizing results for the
/// lifetime of the engine.
///
/// Failure semantics: the competitor search is required input and its
/// errors propagate; every assistant-backed step is best-effort and
/// degrades to an empty or fallback value. Collaborator calls are never
/// retried.
pub struct AnalysisEngine {
    search: SearchService,
    assistant: AssistantService,
    limits: ClusterLimits,
    competitor_limit: u8,
    analysis_cache: ResultCache<AnalysisResult>,
    detailed_cache: ResultCache<DetailedArea>,
    telemetry: Option<TelemetryClient>,
}

impl AnalysisEngine {
    pub fn new(config: &AppConfig, data_dir: &Path) -> AppResult<Self> {
        Ok(Self {
            search: SearchService::new(config)?,
            assistant: AssistantService::new(config)?,
            limits: ClusterLimits {
                min_cluster_size: config.min_cluster_size,
                max_hotspots: config.max_hotspots,
            },
            competitor_limit: config.competitor_limit,
            analysis_cache: ResultCache::new(),
            detailed_cache: ResultCache::new(),
            telemetry: Some(TelemetryClient::new(data_dir, config)?),
        })
    }

    #[cfg(test)]
    pub fn with_services(
        search: SearchService,
        assistant: AssistantService,
        limits: ClusterLimits,
    ) -> Self {
        Self {
            search,
            assistant,
            limits,
            competitor_limit: 50,
            analysis_cache: ResultCache::new(),
            detailed_cache: ResultCache::new(),
            telemetry: None,
        }
    }

    /// Runs the main analysis for a business concept and location.
    ///
    /// Competitor-search failure is fatal for the request; the AI-ranked
    /// area list degrades to empty on any assistant or coercion failure.
    /// Results are cached after success only.
    pub async fn run_analysis(&self, business: &str, location: &str) -> AppResult<AnalysisResult> {
        let key = cache_key(&[business, location]);
        if let Some(cached) = self.analysis_cache.get(&key) {
            debug!(business, location, "serving analysis from cache");
            return Ok(cached);
        }

        let competitors = self
            .search
            .search(business, location, self.competitor_limit)
            .await?;
        let metrics = summarize(&competitors, self.limits);

        let top_areas = match self
            .assistant
            .ask(&prompts::ranked_areas_prompt(business, location))
            .await
        {
            Ok(text) => to_ranked_areas(&text),
            Err(err) => {
                warn!(?err, business, location, "ranked-area enrichment failed");
                Vec::new()
            }
        };

        let result = AnalysisResult {
            metrics,
            top_areas,
            competitors,
        };
        self.analysis_cache.put(key, result.clone());
        self.record_event(
            "analysis_complete",
            json!({
                "competitors": result.competitors.len(),
                "hotspots": result.metrics.hotspots,
                "ranked_areas": result.top_areas.len(),
            }),
        );
        Ok(result)
    }

    /// Runs the deep-dive breakdown for one neighborhood. Always returns a
    /// structurally usable record: collaborator failure degrades to the
    /// all-empty fallback named after the area, and that fallback is not
    /// cached so a recovered collaborator is consulted again. The
    /// service-offering enrichment is an independent second call whose
    /// failure leaves the primary fields untouched.
    pub async fn run_detailed_area_analysis(
        &self,
        business: &str,
        location: &str,
        area: &str,
    ) -> DetailedArea {
        let key = cache_key(&[business, location, area]);
        if let Some(cached) = self.detailed_cache.get(&key) {
            debug!(business, location, area, "serving detailed area from cache");
            return cached;
        }

        let (raw, primary_ok) = match self
            .assistant
            .ask(&prompts::detailed_area_prompt(business, location, area))
            .await
        {
            Ok(text) => (text, true),
            Err(err) => {
                warn!(?err, area, "detailed-area call failed; using fallback");
                (String::new(), false)
            }
        };
        let mut detailed = to_detailed_area(&raw, area);

        match self
            .assistant
            .ask(&prompts::service_offering_prompt(business, area, location))
            .await
        {
            Ok(text) if !text.trim().is_empty() => {
                detailed.service_insights = Some(text.trim().to_string());
            }
            Ok(_) => warn!(area, "service-offering call returned no content"),
            Err(err) => warn!(?err, area, "service-offering enrichment failed"),
        }

        // A fallback from an outage must stay retryable; only results the
        // collaborator actually produced are pinned for the session.
        if primary_ok {
            self.detailed_cache.put(key, detailed.clone());
        }
        self.record_event(
            "detailed_area_complete",
            json!({
                "competitors": detailed.competitors.len(),
                "gaps": detailed.gaps.len(),
                "has_service_insights": detailed.service_insights.is_some(),
            }),
        );
        detailed
    }

    /// Summarizes competitor review themes around a specific question. This
    /// operation has no useful degraded form, so assistant failures and
    /// empty replies surface as errors.
    pub async fn customer_review_insights(
        &self,
        query: &str,
        business: &str,
        area: &str,
        location: &str,
    ) -> AppResult<CustomerReviewInsights> {
        let reply = self
            .assistant
            .ask(&prompts::customer_review_prompt(
                query, business, area, location,
            ))
            .await?;
        let insights = reply.trim();
        if insights.is_empty() {
            return Err(AppError::EmptyAssistantReply);
        }

        self.record_event("review_insights_complete", json!({ "query": query }));
        Ok(CustomerReviewInsights {
            query: query.to_string(),
            business: business.to_string(),
            area: area.to_string(),
            location: location.to_string(),
            insights: insights.to_string(),
        })
    }

    fn record_event(&self, name: &str, payload: serde_json::Value) {
        if let Some(telemetry) = &self.telemetry {
            if let Err(err) = telemetry.record(name, payload) {
                warn!(?err, name, "failed to record telemetry event");
            }
        }
    }
}
