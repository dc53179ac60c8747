//! Random Jitter Sources
//!
//! - `ThreadRngJitter`: unseeded, a different sequence every run
//! - `SeededJitter`: reproducible sequence from a fixed seed

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ports::JitterSource;

/// Uniform draw from the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn draw_pct(&self, bound: f64) -> f64 {
        draw(&mut rand::thread_rng(), bound)
    }
}

/// Uniform draw from a seeded RNG shared across requests
#[derive(Debug)]
pub struct SeededJitter {
    rng: Mutex<StdRng>,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl JitterSource for SeededJitter {
    fn draw_pct(&self, bound: f64) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        draw(&mut *rng, bound)
    }
}

fn draw<R: Rng + ?Sized>(rng: &mut R, bound: f64) -> f64 {
    let bound = bound.abs();
    if bound == 0.0 || !bound.is_finite() {
        return 0.0;
    }
    rng.gen_range(-bound..=bound)
}
