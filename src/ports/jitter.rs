/// Random source for price jitter.
///
/// Implementations return a percentage in `[-bound, +bound]`. Callers clamp
/// the draw anyway, so an out-of-range source cannot push a price past the bound.
pub trait JitterSource: Send + Sync {
    fn draw_pct(&self, bound: f64) -> f64;
}
