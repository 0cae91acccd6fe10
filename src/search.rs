use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::records::CompetitorRecord;

/// Business-search collaborator. Failures here are fatal for the analysis
/// request that triggered the call; the orchestrator propagates them.
#[async_trait]
pub trait CompetitorSearch: Send + Sync {
    async fn search(
        &self,
        term: &str,
        location: &str,
        limit: u8,
    ) -> AppResult<Vec<CompetitorRecord>>;
}

#[derive(Clone)]
pub struct SearchService {
    inner: Arc<dyn CompetitorSearch>,
}

impl SearchService {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let api_key = config
            .search_api_key
            .clone()
            .ok_or_else(|| AppError::Config("SEARCH_API_KEY is not configured".into()))?;
        Ok(Self {
            inner: Arc::new(HttpSearchClient::new(&config.search_api_base, api_key)),
        })
    }

    pub fn from_client(client: Arc<dyn CompetitorSearch>) -> Self {
        Self { inner: client }
    }

    pub async fn search(
        &self,
        term: &str,
        location: &str,
        limit: u8,
    ) -> AppResult<Vec<CompetitorRecord>> {
        self.inner.search(term, location, limit).await
    }
}

struct HttpSearchClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl HttpSearchClient {
    fn new(base_url: &str, api_key: SecretString) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("search http client");
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl CompetitorSearch for HttpSearchClient {
    async fn search(
        &self,
        term: &str,
        location: &str,
        limit: u8,
    ) -> AppResult<Vec<CompetitorRecord>> {
        #[derive(Deserialize)]
        struct Response {
            businesses: Option<Vec<CompetitorRecord>>,
        }

        let response = self
            .http
            .get(format!("{}/businesses/search", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .query(&[
                ("term", term),
                ("location", location),
                ("limit", &limit.to_string()),
                ("sort_by", "best_match"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let parsed: Response = response.json().await?;
        let businesses = parsed.businesses.unwrap_or_default();
        debug!(
            term,
            location,
            count = businesses.len(),
            "competitor search returned listings"
        );
        Ok(businesses)
    }
}
