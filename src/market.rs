//! Whales Market offers client.
//!
//! [`OrderSource`] is the seam between the monitor and the network; the
//! monitor only needs "give me the raw offers for this pair and side".

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::Result;
use crate::config::PairConfig;
use crate::models::Side;
use crate::models::offer::{OffersResponse, RawOrder};

/// Per-request timeout for the offers API.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of offers requested per page.
const PAGE_SIZE: u32 = 10;

/// Source of raw offers for one pair and side.
pub trait OrderSource {
    /// Fetches the open offers for `symbol` on `side`.
    fn fetch_orders(
        &self,
        symbol: &str,
        pair: &PairConfig,
        side: Side,
    ) -> impl Future<Output = Result<Vec<RawOrder>>> + Send;
}

/// HTTP client for the offers endpoint.
pub struct WhalesClient {
    http: reqwest::Client,
    api_url: String,
}

impl WhalesClient {
    /// Creates a client for the given offers endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`WhalewatchError::Http`](crate::WhalewatchError::Http) if the
    /// HTTP client cannot be built.
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_url: api_url.into(),
        })
    }

    /// Returns the endpoint this client queries.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

/// Query parameters for one offers request.
///
/// Buy offers are sorted by descending price, sell offers ascending.
pub fn query_params(symbol: &str, chain: &str, side: Side) -> Vec<(&'static str, String)> {
    let sort = match side {
        Side::Buy => "DESC",
        Side::Sell => "ASC",
    };
    vec![
        ("type", side.as_str().to_string()),
        ("category_token", "pre_market".to_string()),
        ("symbol", symbol.to_string()),
        ("status", "open".to_string()),
        ("take", PAGE_SIZE.to_string()),
        ("page", "1".to_string()),
        ("sort_price", sort.to_string()),
        ("chains", chain.to_string()),
        ("order_type", "normal".to_string()),
    ]
}

impl OrderSource for WhalesClient {
    async fn fetch_orders(
        &self,
        symbol: &str,
        pair: &PairConfig,
        side: Side,
    ) -> Result<Vec<RawOrder>> {
        let params = query_params(symbol, &pair.chain, side);
        let response = self
            .http
            .get(&self.api_url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?;

        let body: OffersResponse = response.json().await?;
        let orders = body.into_orders();
        debug!(symbol, side = side.as_str(), count = orders.len(), "fetched offers");
        Ok(orders)
    }
}
