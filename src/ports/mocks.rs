use std::sync::Mutex;

use super::JitterSource;

/// Jitter source that replays a fixed sequence of percentages, wrapping
/// around at the end. An empty sequence always draws zero.
#[derive(Debug, Default)]
pub struct SequenceJitter {
    draws: Vec<f64>,
    next: Mutex<usize>,
}

impl SequenceJitter {
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, next: Mutex::new(0) }
    }

    /// Always draw the same percentage
    pub fn constant(pct: f64) -> Self {
        Self::new(vec![pct])
    }

    /// Number of draws taken so far
    pub fn calls(&self) -> usize {
        *self.next.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl JitterSource for SequenceJitter {
    fn draw_pct(&self, _bound: f64) -> f64 {
        let mut next = self.next.lock().unwrap_or_else(|e| e.into_inner());
        let pct = if self.draws.is_empty() {
            0.0
        } else {
            self.draws[*next % self.draws.len()]
        };
        *next += 1;
        pct
    }
}
