//! Alpha Vantage API client

use async_trait::async_trait;
use av_utils::LogContext;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{Instrument, debug, warn};
use url::Url;

use super::MarketDataFetcher;
use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::params::{Interval, SeriesRequest};
use crate::retry::RetryPolicy;
use crate::series::TimeSeries;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    retry_policy: RetryPolicy,
    rate_limiter: Option<SharedRateLimiter>,
    log: LogContext,
}

impl AlphaVantageClient {
    /// Create a client from a validated configuration
    pub fn new(config: &StockConfig, log: LogContext) -> Result<Self> {
        config.validate()?;

        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let endpoint = Url::parse(&base)
            .and_then(|url| url.join("query"))
            .map_err(|e| {
                StockError::ConfigError(format!("invalid base URL '{}': {}", config.base_url, e))
            })?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let rate_limiter = config
            .requests_per_minute
            .and_then(NonZeroU32::new)
            .map(|limit| Arc::new(RateLimiter::direct(Quota::per_minute(limit))));

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint,
            retry_policy: config.retry_policy(),
            rate_limiter,
            log,
        })
    }

    /// Query endpoint, `{base_url}/query`
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn fetch_once(&self, request: &SeriesRequest) -> Result<TimeSeries> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let mut query: Vec<(&str, &str)> = vec![
            ("function", request.interval.function()),
            ("symbol", request.symbol.as_str()),
        ];
        if request.interval.is_intraday() {
            query.push(("interval", request.interval.as_str()));
        }
        query.push(("outputsize", request.output_size.as_str()));
        query.push(("apikey", self.api_key.as_str()));

        debug!(
            "GET {} function={} symbol={}",
            self.endpoint,
            request.interval.function(),
            request.symbol
        );

        // The request URL carries the API key; keep it out of error messages
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&query)
            .send()
            .await
            .map_err(|e| StockError::NetworkError(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StockError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| StockError::NetworkError(e.without_url()))?;
        let body: Value = serde_json::from_str(&body)?;

        parse_series_response(body, request.interval, &request.symbol)
    }
}

#[async_trait]
impl MarketDataFetcher for AlphaVantageClient {
    async fn fetch_series(&self, request: &SeriesRequest) -> Result<TimeSeries> {
        let operation = format!("{} {}", request.interval.function(), request.symbol);
        self.retry_policy
            .execute(&operation, || self.fetch_once(request))
            .instrument(self.log.span())
            .await
    }
}

/// Extract the series for `interval` from an Alpha Vantage response body
///
/// `Error Message` fails the request. `Note` and `Information` (rate-limit
/// notices) are logged; the request then fails only if the series is absent.
pub fn parse_series_response(
    body: Value,
    interval: Interval,
    symbol: &str,
) -> Result<TimeSeries> {
    let key = interval.series_key();
    let Value::Object(mut body) = body else {
        return Err(StockError::DataShape { key });
    };

    if let Some(message) = body.get("Error Message") {
        let message = message
            .as_str()
            .map_or_else(|| message.to_string(), str::to_string);
        return Err(StockError::Upstream(message));
    }

    for notice in ["Note", "Information"] {
        if let Some(text) = body.get(notice) {
            warn!("Alpha Vantage notice for {}: {}", symbol, text);
        }
    }

    let series = body.remove(&key).ok_or(StockError::DataShape { key })?;
    let series: TimeSeries = serde_json::from_value(series)?;

    debug!("Received {} data points for {}", series.len(), symbol);
    Ok(series)
}
