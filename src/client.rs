//! The rate client: builds query URLs, performs GET requests and decodes
//! the JSON responses into rate maps.

use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::error::Error;

/// Endpoint of the public exchangeratesapi.io service.
pub const DEFAULT_BASE_URL: &str = "https://api.exchangeratesapi.io";

/// Date format required by the service.
const DATE_FORMAT: &str = "%Y-%m-%d";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Currency code mapped to its exchange rate against a base currency.
pub type RateMap = HashMap<String, f64>;

/// ISO date ("YYYY-MM-DD") mapped to the rates published on that date.
pub type DatedRateMap = HashMap<String, RateMap>;

#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    rates: RateMap,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    rates: DatedRateMap,
}

/// Client for the exchangeratesapi.io REST API.
///
/// Holds the endpoint and a pooled HTTP client. Every operation is a fresh
/// round trip; no state is shared between calls, so a single client can be
/// used from multiple tasks concurrently.
pub struct Client {
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    /// Creates a client for `base_url` with a default request timeout.
    ///
    /// Use [`DEFAULT_BASE_URL`] for the real service; tests can point the
    /// client at a local mock server instead.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client with an explicit per-request timeout covering
    /// connect, send and the full body read.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("exchangerates/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Client {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Fetches the latest rate for a single currency against the service's
    /// default base. A currency the service does not know yields `0.0`.
    pub async fn latest_rate(&self, currency: &str) -> Result<f64, Error> {
        let rates = self.latest(&[currency]).await?;
        Ok(rates.get(currency).copied().unwrap_or_default())
    }

    /// Fetches the latest rate for a single currency against `base`.
    pub async fn latest_rate_with_base(&self, base: &str, currency: &str) -> Result<f64, Error> {
        let rates = self.latest_with_base(base, &[currency]).await?;
        Ok(rates.get(currency).copied().unwrap_or_default())
    }

    /// Fetches the latest rates, optionally limited to `symbols`. An empty
    /// slice returns every currency the service publishes.
    pub async fn latest(&self, symbols: &[&str]) -> Result<RateMap, Error> {
        let url = self.url("latest", &[], symbols);
        self.fetch_rates(&url).await
    }

    /// Fetches the latest rates expressed against `base` instead of the
    /// service default (EUR), optionally limited to `symbols`.
    pub async fn latest_with_base(&self, base: &str, symbols: &[&str]) -> Result<RateMap, Error> {
        let url = self.url("latest", &[("base", base)], symbols);
        self.fetch_rates(&url).await
    }

    /// Fetches the rates recorded for `date`, optionally limited to
    /// `symbols`.
    pub async fn on_date(&self, date: NaiveDate, symbols: &[&str]) -> Result<RateMap, Error> {
        let url = self.url(&date.format(DATE_FORMAT).to_string(), &[], symbols);
        self.fetch_rates(&url).await
    }

    /// Fetches the rates recorded for `date` expressed against `base`,
    /// optionally limited to `symbols`.
    pub async fn on_date_with_base(
        &self,
        date: NaiveDate,
        base: &str,
        symbols: &[&str],
    ) -> Result<RateMap, Error> {
        let url = self.url(
            &date.format(DATE_FORMAT).to_string(),
            &[("base", base)],
            symbols,
        );
        self.fetch_rates(&url).await
    }

    /// Fetches the rates recorded between `start` and `end` inclusive,
    /// optionally limited to `symbols`. The result holds one entry per date
    /// the service published on; dates without data (weekends, holidays)
    /// are simply absent.
    pub async fn history(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        symbols: &[&str],
    ) -> Result<DatedRateMap, Error> {
        let start = start.format(DATE_FORMAT).to_string();
        let end = end.format(DATE_FORMAT).to_string();
        let url = self.url("history", &[("start_at", &start), ("end_at", &end)], symbols);
        self.fetch_history(&url).await
    }

    /// Fetches the rates recorded between `start` and `end` inclusive,
    /// expressed against `base`, optionally limited to `symbols`.
    pub async fn history_with_base(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        base: &str,
        symbols: &[&str],
    ) -> Result<DatedRateMap, Error> {
        let start = start.format(DATE_FORMAT).to_string();
        let end = end.format(DATE_FORMAT).to_string();
        let url = self.url(
            "history",
            &[("start_at", &start), ("end_at", &end), ("base", base)],
            symbols,
        );
        self.fetch_history(&url).await
    }

    fn url(&self, path: &str, params: &[(&str, &str)], symbols: &[&str]) -> String {
        let mut query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        if !symbols.is_empty() {
            query.push(format!("symbols={}", symbols.join(",")));
        }
        let mut url = format!("{}/{path}", self.base_url);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }

    async fn fetch_rates(&self, url: &str) -> Result<RateMap, Error> {
        let body = self.get(url).await?;
        let data: RatesResponse = serde_json::from_str(&body)?;
        Ok(data.rates)
    }

    async fn fetch_history(&self, url: &str) -> Result<DatedRateMap, Error> {
        let body = self.get(url).await?;
        let data: HistoryResponse = serde_json::from_str(&body)?;
        Ok(data.rates)
    }

    // Transport failures surface before the status is inspected; anything
    // other than 200 fails with the raw body attached.
    async fn get(&self, url: &str) -> Result<String, Error> {
        debug!("Requesting rates from {url}");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(Error::RequestFailed { status, body });
        }
        Ok(body)
    }
}
