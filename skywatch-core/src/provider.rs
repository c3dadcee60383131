use crate::model::WeatherSnapshot;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};
use thiserror::Error;
use tracing::warn;

pub mod openweather;

/// Capability surface every weather provider variant implements. Shared
/// helpers (transport, locality lookup) are composed in, not inherited.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch by a free-form location selector, e.g. "q=London" or a
    /// provider-specific city id. `None` means the request produced no
    /// usable snapshot; partial results are never returned.
    async fn fetch_by_location(&self, selector: &str, metric: bool) -> Option<WeatherSnapshot>;

    /// Fetch by a coordinate pair.
    async fn fetch_by_coordinates(&self, lat: f64, lon: f64, metric: bool)
    -> Option<WeatherSnapshot>;

    /// Whether a failed call is worth retrying against this provider.
    fn should_retry(&self) -> bool;
}

/// Failures that abort a whole request. Per-day forecast defects are not
/// listed here: those are recovered inline with sentinel entries and never
/// escalate.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no API key available")]
    NoApiKey,

    #[error("transport returned no response")]
    Transport,

    #[error("malformed weather data (selector = {selector}, lang = {lang}): {reason}")]
    Malformed {
        selector: String,
        lang: &'static str,
        reason: String,
    },
}

/// Boundary to the network. Implementations own timeouts and status
/// handling; callers only see the raw body, or `None` when the request
/// failed for any reason.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn retrieve(&self, url: &str) -> Option<String>;
}

/// `reqwest`-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    const TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn retrieve(&self, url: &str) -> Option<String> {
        let res = match self.http.get(url).send().await {
            Ok(res) => res,
            Err(err) => {
                warn!(%err, "request failed to send");
                return None;
            }
        };

        let status = res.status();
        let body = match res.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!(%err, "failed to read response body");
                return None;
            }
        };

        if !status.is_success() {
            warn!(%status, body = %truncate_body(&body), "request rejected");
            return None;
        }

        Some(body)
    }
}

/// Resolves a selector to a human-readable place name. Reverse geocoding
/// lives outside this crate; the default leaves resolution to the caller and
/// the provider falls back to echoing the selector.
pub trait LocalityResolver: Send + Sync + Debug {
    fn locality_for(&self, selector: &str) -> Option<String>;
}

/// Default resolver: no lookup at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocality;

impl LocalityResolver for NoLocality {
    fn locality_for(&self, _selector: &str) -> Option<String> {
        None
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        // Byte 200 may land inside a multi-byte character; back up to the
        // nearest boundary so the slice cannot panic.
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_leaves_short_bodies_alone() {
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncate_caps_long_bodies() {
        let long = "x".repeat(500);
        let out = truncate_body(&long);

        assert_eq!(out.len(), 203);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn truncate_backs_up_to_a_char_boundary() {
        // 'é' occupies bytes 199..201, straddling the 200-byte cutoff.
        let body = format!("{}é and some trailing text", "x".repeat(199));
        let out = truncate_body(&body);

        assert_eq!(out, format!("{}...", "x".repeat(199)));
    }

    #[test]
    fn no_locality_resolves_nothing() {
        assert_eq!(NoLocality.locality_for("q=London"), None);
    }
}
