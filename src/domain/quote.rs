use std::fmt;

/// Path token that selects the oracle-resolved meme flow
pub const MEME_TOKEN: &str = "MEME";

/// Which flow a `/inference/{token}` request takes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenRoute {
    /// Oracle-resolved meme token with jitter
    Meme,
    /// Plain ticker symbol, passed to the quote provider verbatim
    Symbol(String),
}

impl TokenRoute {
    /// Dispatch on the literal path parameter. Only an exact, case-sensitive
    /// `MEME` selects the meme flow; nothing is trimmed or normalized.
    pub fn from_path(token: &str) -> Self {
        if token == MEME_TOKEN {
            TokenRoute::Meme
        } else {
            TokenRoute::Symbol(token.to_string())
        }
    }
}

impl fmt::Display for TokenRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenRoute::Meme => write!(f, "meme"),
            TokenRoute::Symbol(s) => write!(f, "symbol({})", s),
        }
    }
}

/// Token identity reported by the meme oracle at a given block height
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleToken {
    pub platform: String,
    pub address: String,
    pub token_symbol: String,
}

/// Everything resolved while answering one meme request
#[derive(Debug, Clone, PartialEq)]
pub struct MemeQuote {
    pub block_height: String,
    pub token: OracleToken,
    /// Price string exactly as the DEX API returned it
    pub raw_price: String,
    /// Price after jitter, the value sent to the client
    pub price: f64,
}

impl MemeQuote {
    pub fn body(&self) -> String {
        format_free_price(self.price)
    }
}

/// Fixed two-decimal rendering used by the ticker flow
pub fn format_fixed_price(price: f64) -> String {
    format!("{:.2}", price)
}

/// Shortest decimal that round-trips, no exponent
pub fn format_free_price(price: f64) -> String {
    format!("{}", price)
}
