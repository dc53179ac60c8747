//! Price Jitter
//!
//! Small random percentage perturbation applied to the meme price before it
//! is returned. Display only; this is not a pricing model.

/// Default jitter bound, in percent either side of the price
pub const DEFAULT_JITTER_PCT: f64 = 3.0;

/// Apply a percentage adjustment: `price + price * pct / 100`
pub fn apply_jitter(price: f64, pct: f64) -> f64 {
    price + price * (pct / 100.0)
}

/// Clamp a drawn percentage into `[-bound, +bound]`.
/// NaN draws collapse to zero.
pub fn clamp_pct(pct: f64, bound: f64) -> f64 {
    if pct.is_nan() {
        return 0.0;
    }
    let bound = bound.abs();
    pct.clamp(-bound, bound)
}
