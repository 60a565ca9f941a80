//! `stock://{symbol}/{interval}` resource template

use async_trait::async_trait;
use av_mcp::{ResourceContents, ResourceTemplate, TemplateVariables, UriTemplate, text_contents};

use crate::dispatcher::StockDispatcher;
use crate::params::{Interval, OutputSize, QueryParams};

pub const STOCK_URI_TEMPLATE: &str = "stock://{symbol}/{interval}";

/// Stock series addressed by URI; always reads the compact series
///
/// Unlike the tools, failures propagate to the transport as JSON-RPC errors.
pub struct StockResource {
    template: UriTemplate,
    dispatcher: StockDispatcher,
}

impl StockResource {
    pub fn new(dispatcher: StockDispatcher) -> av_mcp::Result<Self> {
        Ok(Self {
            template: UriTemplate::parse(STOCK_URI_TEMPLATE)?,
            dispatcher,
        })
    }
}

#[async_trait]
impl ResourceTemplate for StockResource {
    fn uri_template(&self) -> &UriTemplate {
        &self.template
    }

    fn name(&self) -> &str {
        "stock-data"
    }

    fn description(&self) -> &str {
        "Stock market data for a symbol at an interval (1min, 5min, 15min, 30min, 60min, daily)"
    }

    async fn read(
        &self,
        uri: &str,
        variables: TemplateVariables,
    ) -> av_mcp::Result<Vec<ResourceContents>> {
        let mut params = QueryParams::from_map(&variables, Interval::FiveMin)?;
        params.output_size = OutputSize::Compact;

        let text = self.dispatcher.stock_data(&params).await?;

        Ok(vec![text_contents(uri, self.mime_type(), text)])
    }
}
