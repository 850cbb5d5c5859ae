//! Stand-ins for the remote back office: a fixed delay followed by a weighted coin flip.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Seedable source of success/failure outcomes shared by every simulated call.
#[derive(Debug)]
pub struct OutcomeSampler {
    rng: Mutex<ChaCha20Rng>,
}

impl OutcomeSampler {
    /// A fixed seed replays the same outcome sequence; `None` draws fresh entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_rng(&mut rand::rng()),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// `true` with the given probability. Values outside `[0, 1]` saturate.
    pub fn draw(&self, probability: f64) -> bool {
        if probability.is_nan() || probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_bool(probability)
    }
}

/// Suspend for the configured round-trip time. Zero latency returns immediately.
pub async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}
