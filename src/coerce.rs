//! Coerces sanitized assistant output into strictly-typed records.
//!
//! The assistant is prompted with a strict schema but its compliance is
//! unverifiable at run time, so the contract here is: never fail, always
//! return a structurally usable value, prefer an honest empty result over a
//! crash.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::sanitize::extract_payload;

/// Every ranked area carries exactly this many market-gap strings.
pub const GAPS_PER_AREA: usize = 2;

const GENERIC_GAP: &str = "Limited differentiation among existing competitors";

/// Competitive saturation tier for a neighborhood. Unknown wire strings
/// fold to `Medium` rather than failing the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Saturation {
    Low,
    Medium,
    High,
}

impl Saturation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Saturation::Low => "Low",
            Saturation::Medium => "Medium",
            Saturation::High => "High",
        }
    }
}

impl From<String> for Saturation {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Saturation::Low,
            "high" => Saturation::High,
            _ => Saturation::Medium,
        }
    }
}

impl From<Saturation> for String {
    fn from(value: Saturation) -> Self {
        value.as_str().to_string()
    }
}

/// Foot-traffic tier. Same lenient folding as [`Saturation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrafficTier {
    VeryHigh,
    High,
    Medium,
    Low,
}

impl TrafficTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficTier::VeryHigh => "Very High",
            TrafficTier::High => "High",
            TrafficTier::Medium => "Medium",
            TrafficTier::Low => "Low",
        }
    }
}

impl From<String> for TrafficTier {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "very high" => TrafficTier::VeryHigh,
            "high" => TrafficTier::High,
            "low" => TrafficTier::Low,
            _ => TrafficTier::Medium,
        }
    }
}

impl From<TrafficTier> for String {
    fn from(value: TrafficTier) -> Self {
        value.as_str().to_string()
    }
}

/// One AI-derived neighborhood recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedArea {
    pub name: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default = "default_saturation")]
    pub saturation: Saturation,
    #[serde(default)]
    pub competitors: u32,
    #[serde(default)]
    pub gaps: Vec<String>,
    #[serde(default)]
    pub rent: String,
    #[serde(default = "default_traffic")]
    pub traffic: TrafficTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

fn default_saturation() -> Saturation {
    Saturation::Medium
}

fn default_traffic() -> TrafficTier {
    TrafficTier::Medium
}

impl RankedArea {
    /// Clamps the score into [0, 10] and pads/truncates `gaps` to exactly
    /// [`GAPS_PER_AREA`] entries.
    fn normalized(mut self) -> Self {
        self.score = self.score.clamp(0.0, 10.0);
        self.gaps.retain(|gap| !gap.trim().is_empty());
        self.gaps.truncate(GAPS_PER_AREA);
        while self.gaps.len() < GAPS_PER_AREA {
            self.gaps.push(GENERIC_GAP.to_string());
        }
        self
    }
}

#[derive(Debug, Deserialize)]
struct RankedAreasEnvelope {
    #[serde(rename = "topAreas")]
    top_areas: Vec<RankedArea>,
}

/// A named competitor inside a detailed area breakdown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AreaCompetitor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: u64,
    #[serde(default)]
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Demographic {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AreaGap {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrafficPattern {
    #[serde(default)]
    pub weekday: String,
    #[serde(default)]
    pub weekend: String,
    #[serde(default)]
    pub peak_hours: String,
}

/// Deep-dive breakdown for one neighborhood. List fields are always
/// present, never null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailedArea {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub competitors: Vec<AreaCompetitor>,
    #[serde(default)]
    pub demographics: Vec<Demographic>,
    #[serde(default)]
    pub gaps: Vec<AreaGap>,
    #[serde(default)]
    pub traffic: TrafficPattern,
    #[serde(default)]
    pub success_factors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_insights: Option<String>,
}

impl DetailedArea {
    pub fn fallback(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// Extracts a ranked-area list from raw assistant text. Any parse failure
/// degrades to an empty list; callers treat that as "AI enrichment
/// unavailable", not as a hard failure.
pub fn to_ranked_areas(raw: &str) -> Vec<RankedArea> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let payload = extract_payload(raw, false);
    match serde_json::from_str::<RankedAreasEnvelope>(&payload) {
        Ok(envelope) => envelope
            .top_areas
            .into_iter()
            .map(RankedArea::normalized)
            .collect(),
        Err(err) => {
            warn!(%err, "failed to coerce ranked areas; degrading to empty");
            Vec::new()
        }
    }
}

/// Extracts a detailed-area record from raw assistant text, falling back to
/// an all-empty record named `fallback_name` on any failure. A parsed
/// record with a blank name also takes the fallback name.
pub fn to_detailed_area(raw: &str, fallback_name: &str) -> DetailedArea {
    if raw.trim().is_empty() {
        return DetailedArea::fallback(fallback_name);
    }

    let payload = extract_payload(raw, true);
    match serde_json::from_str::<DetailedArea>(&payload) {
        Ok(mut area) => {
            if area.name.trim().is_empty() {
                area.name = fallback_name.to_string();
            }
            area
        }
        Err(err) => {
            warn!(%err, fallback_name, "failed to coerce detailed area; using fallback");
            DetailedArea::fallback(fallback_name)
        }
    }
}
