//! Domain Layer - Pure inference logic
//!
//! No I/O lives here. Covers:
//! - `quote`: token dispatch rule, response formatting, meme quote record
//! - `jitter`: bounded percentage perturbation of a price

pub mod quote;
pub mod jitter;

pub use quote::{
    format_fixed_price, format_free_price, MemeQuote, OracleToken, TokenRoute, MEME_TOKEN,
};
pub use jitter::{apply_jitter, clamp_pct, DEFAULT_JITTER_PCT};
