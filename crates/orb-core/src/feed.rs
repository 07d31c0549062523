//! Simulated live updates: every tick, some feature burns a few more hours.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::store::StoreCommand;
use crate::types::Feature;

pub struct LiveFeed {
    rng: StdRng,
    max_increment_hours: f64,
}

impl LiveFeed {
    pub fn new(max_increment_hours: f64) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            max_increment_hours,
        }
    }

    pub fn seeded(seed: u64, max_increment_hours: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_increment_hours,
        }
    }

    /// Pick a random feature and an increment in `[0, max_increment_hours)`.
    /// `None` when there is nothing to update.
    pub fn next_command(&mut self, features: &[Feature]) -> Option<StoreCommand> {
        if features.is_empty() {
            return None;
        }
        let feature = &features[self.rng.gen_range(0..features.len())];
        let delta = self.rng.gen::<f64>() * self.max_increment_hours;
        Some(StoreCommand::AddBurnedHours {
            feature_id: feature.id,
            delta,
        })
    }
}
