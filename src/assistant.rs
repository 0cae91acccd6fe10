use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};

/// Free-text AI collaborator: one prompt in, prose out. May fail or return
/// an empty string; callers treat both as "no usable content".
#[async_trait]
pub trait FreeTextAsk: Send + Sync {
    async fn ask(&self, prompt: &str) -> AppResult<String>;
}

#[derive(Clone)]
pub struct AssistantService {
    inner: Arc<dyn FreeTextAsk>,
}

impl AssistantService {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let api_key = config
            .assistant_api_key
            .clone()
            .ok_or_else(|| AppError::Config("ASSISTANT_API_KEY is not configured".into()))?;
        Ok(Self {
            inner: Arc::new(HttpAssistantClient::new(
                &config.assistant_api_base,
                api_key,
            )),
        })
    }

    pub fn from_client(client: Arc<dyn FreeTextAsk>) -> Self {
        Self { inner: client }
    }

    pub async fn ask(&self, prompt: &str) -> AppResult<String> {
        self.inner.ask(prompt).await
    }
}

struct HttpAssistantClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl HttpAssistantClient {
    fn new(base_url: &str, api_key: SecretString) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("assistant http client");
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl FreeTextAsk for HttpAssistantClient {
    async fn ask(&self, prompt: &str) -> AppResult<String> {
        #[derive(Serialize)]
        struct RequestBody<'a> {
            request_context: RequestContext,
            query: &'a str,
        }

        #[derive(Serialize)]
        struct RequestContext {
            skip_text_generation: bool,
        }

        #[derive(Deserialize)]
        struct Response {
            response: Option<ResponseText>,
        }

        #[derive(Deserialize)]
        struct ResponseText {
            text: Option<String>,
        }

        let body = RequestBody {
            request_context: RequestContext {
                skip_text_generation: false,
            },
            query: prompt,
        };

        let response = self
            .http
            .post(format!("{}/ai/chat/v2", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: Response = response.json().await?;
        let text = parsed
            .response
            .and_then(|inner| inner.text)
            .unwrap_or_default();
        debug!(chars = text.len(), "assistant reply received");
        Ok(text)
    }
}
