// Endpoint and pacing settings for the extraction client
use log::warn;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5800/api";
pub const PROCESSING_ENDPOINT: &str = "/process/OcrBytes";
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub endpoint_path: String,
    /// Pause between clicking Submit and sending the request.
    pub submit_delay: Duration,
    /// `None` keeps reqwest's default.
    pub request_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            endpoint_path: PROCESSING_ENDPOINT.to_string(),
            submit_delay: DEFAULT_SUBMIT_DELAY,
            request_timeout: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("CAPTURE_API_BASE_URL") {
            let url = url.trim();
            if !url.is_empty() {
                config.api_base_url = url.to_string();
            }
        }

        if let Some(delay) = seconds_from(&lookup, "CAPTURE_SUBMIT_DELAY_SECS") {
            config.submit_delay = delay;
        }
        config.request_timeout = seconds_from(&lookup, "CAPTURE_REQUEST_TIMEOUT_SECS");

        config
    }

    pub fn processing_url(&self) -> String {
        format!(
            "{}{}",
            self.api_base_url.trim_end_matches('/'),
            self.endpoint_path
        )
    }
}

fn seconds_from(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    let raw = lookup(key)?;
    let parsed = raw
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok());
    match parsed {
        Some(duration) => Some(duration),
        None => {
            warn!("Ignoring {}={:?}: expected a non-negative number of seconds", key, raw);
            None
        }
    }
}
