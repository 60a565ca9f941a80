//! Request dispatch: fetch, then format or analyze

use av_utils::LogContext;
use std::sync::Arc;
use tracing::{Instrument, info};

use crate::alerts::AlertAnalyzer;
use crate::api::MarketDataFetcher;
use crate::error::{Result, StockError};
use crate::formatter::TimeSeriesFormatter;
use crate::params::{Interval, OutputSize, QueryParams, SeriesRequest};

/// Turns validated queries into report text
///
/// Shared by every tool and the resource template; holds no per-request
/// state.
#[derive(Clone)]
pub struct StockDispatcher {
    fetcher: Arc<dyn MarketDataFetcher>,
    formatter: TimeSeriesFormatter,
    log: LogContext,
}

impl StockDispatcher {
    pub fn new(fetcher: Arc<dyn MarketDataFetcher>, log: LogContext) -> Self {
        Self {
            fetcher,
            formatter: TimeSeriesFormatter::new(),
            log,
        }
    }

    /// Fetch the requested series and format it
    pub async fn stock_data(&self, params: &QueryParams) -> Result<String> {
        async {
            info!(
                "Fetching {} {} ({})",
                params.display_symbol(),
                params.interval,
                params.output_size
            );
            let series = self.fetcher.fetch_series(&params.series_request()).await?;
            self.formatter
                .format(&series, &params.symbol, params.interval)
        }
        .instrument(self.log.span())
        .await
    }

    /// Fetch recent daily data and report moves at or above the threshold
    pub async fn alerts(&self, params: &QueryParams) -> Result<String> {
        let analyzer = AlertAnalyzer::new(params.threshold()?)?;

        async {
            info!(
                "Analyzing {} for moves >= {}%",
                params.display_symbol(),
                analyzer.threshold()
            );
            let request = SeriesRequest {
                symbol: params.symbol.clone(),
                interval: Interval::Daily,
                output_size: OutputSize::Compact,
            };
            let series = self.fetcher.fetch_series(&request).await?;
            let report = analyzer.analyze(&series, &params.symbol)?;
            Ok::<_, StockError>(report.render())
        }
        .instrument(self.log.span())
        .await
    }
}
