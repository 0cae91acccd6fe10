use std::{env, io};

use secrecy::SecretString;
use serde::Serialize;
use tracing::debug;

const DEFAULT_SEARCH_API_BASE: &str = "https://api.yelp.com/v3";
const DEFAULT_ASSISTANT_API_BASE: &str = "https://api.yelp.com";
const DEFAULT_COMPETITOR_LIMIT: u8 = 50;
const DEFAULT_MIN_CLUSTER_SIZE: usize = 2;
const DEFAULT_MAX_HOTSPOTS: usize = 3;
const DEFAULT_TELEMETRY_BUFFER_MAX_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub search_api_base: String,
    pub search_api_key: Option<SecretString>,
    pub assistant_api_base: String,
    pub assistant_api_key: Option<SecretString>,
    pub competitor_limit: u8,
    pub min_cluster_size: usize,
    pub max_hotspots: usize,
    pub telemetry_enabled_by_default: bool,
    pub telemetry_batch_size: usize,
    pub telemetry_buffer_max_bytes: u64,
}

/// Config view safe to surface to UI layers; never carries key material.
#[derive(Clone, Debug, Serialize)]
pub struct PublicAppConfig {
    pub search_api_base: String,
    pub assistant_api_base: String,
    pub competitor_limit: u8,
    pub min_cluster_size: usize,
    pub max_hotspots: usize,
    pub telemetry_enabled_by_default: bool,
    pub telemetry_batch_size: usize,
    pub telemetry_buffer_max_bytes: u64,
    pub has_search_api_key: bool,
    pub has_assistant_api_key: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        load_dotenv_if_applicable();
        Self {
            search_api_base: env::var("SEARCH_API_BASE")
                .unwrap_or_else(|_| DEFAULT_SEARCH_API_BASE.to_string()),
            search_api_key: secret_from_env("SEARCH_API_KEY"),
            assistant_api_base: env::var("ASSISTANT_API_BASE")
                .unwrap_or_else(|_| DEFAULT_ASSISTANT_API_BASE.to_string()),
            assistant_api_key: secret_from_env("ASSISTANT_API_KEY"),
            competitor_limit: parse_u8("COMPETITOR_LIMIT", DEFAULT_COMPETITOR_LIMIT).max(1),
            min_cluster_size: parse_usize("MIN_CLUSTER_SIZE", DEFAULT_MIN_CLUSTER_SIZE).max(1),
            max_hotspots: parse_usize("MAX_HOTSPOTS", DEFAULT_MAX_HOTSPOTS).max(1),
            telemetry_enabled_by_default: parse_bool("TELEMETRY_ENABLED", true),
            telemetry_batch_size: parse_usize("TELEMETRY_BATCH_SIZE", 25).max(1),
            telemetry_buffer_max_bytes: parse_u64(
                "TELEMETRY_BUFFER_MAX_BYTES",
                DEFAULT_TELEMETRY_BUFFER_MAX_BYTES,
            ),
        }
    }

    pub fn public_profile(&self) -> PublicAppConfig {
        PublicAppConfig {
            search_api_base: self.search_api_base.clone(),
            assistant_api_base: self.assistant_api_base.clone(),
            competitor_limit: self.competitor_limit,
            min_cluster_size: self.min_cluster_size,
            max_hotspots: self.max_hotspots,
            telemetry_enabled_by_default: self.telemetry_enabled_by_default,
            telemetry_batch_size: self.telemetry_batch_size,
            telemetry_buffer_max_bytes: self.telemetry_buffer_max_bytes,
            has_search_api_key: self.search_api_key.is_some(),
            has_assistant_api_key: self.assistant_api_key.is_some(),
        }
    }
}

fn secret_from_env(key: &str) -> Option<SecretString> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

fn load_dotenv_if_applicable() {
    if !should_load_dotenv() {
        debug!("skipping .env load outside dev mode");
        return;
    }

    if let Err(err) = dotenvy::dotenv() {
        match &err {
            dotenvy::Error::Io(io_err) if io_err.kind() == io::ErrorKind::NotFound => {}
            _ => debug!(?err, "unable to load .env file"),
        }
    }
}

fn should_load_dotenv() -> bool {
    cfg!(debug_assertions) || parse_bool("ALLOW_DOTENV", false)
}

fn parse_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "True"))
        .unwrap_or(default)
}

fn parse_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_u8(key: &str, default: u8) -> u8 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u8>().ok())
        .unwrap_or(default)
}
