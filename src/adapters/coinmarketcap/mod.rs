//! CoinMarketCap Adapter
//!
//! Ticker quotes for the generic inference path. Authenticates with a static
//! key header and decodes only the USD price of the requested symbol.

mod client;
mod types;

pub use client::{CoinMarketCapClient, CoinMarketCapConfig, CMC_API_KEY_HEADER, CMC_API_URL};
pub use types::{QuotesLatestResponse, CONVERT_CURRENCY};
