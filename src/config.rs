use anyhow::{ensure, Result};
use std::time::Duration;

/// Cells per side of the square board.
pub const GRID_SIZE: i32 = 24;
/// Ticks per second at score 0.
pub const BASE_TPS: u32 = 9;
/// Every this many points the snake gets one tick per second faster.
pub const SPEEDUP_EVERY: u32 = 6;
/// Speed cap.
pub const MAX_TPS: u32 = 18;
pub const START_LEN: usize = 4;
/// Largest board a terminal cell grid can address.
pub const MAX_GRID_SIZE: i32 = 1000;
/// How many random cells food placement samples before giving up.
pub const FOOD_ATTEMPTS: u32 = 5000;

pub const SWIPE_MIN_DISTANCE: f64 = 24.0;
pub const SWIPE_MAX_DURATION: Duration = Duration::from_millis(1000);

/// Tunable game rules. `Default` gives the classic board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rules {
    pub grid_size: i32,
    pub base_tps: u32,
    pub speedup_every: u32,
    pub max_tps: u32,
    pub start_len: usize,
    pub food_attempts: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            grid_size: GRID_SIZE,
            base_tps: BASE_TPS,
            speedup_every: SPEEDUP_EVERY,
            max_tps: MAX_TPS,
            start_len: START_LEN,
            food_attempts: FOOD_ATTEMPTS,
        }
    }
}

impl Rules {
    pub fn with_grid_size(grid_size: i32) -> Self {
        Rules {
            grid_size,
            ..Default::default()
        }
    }

    /// Ticks per second for a given score: a capped step function. Never
    /// below `base_tps`, even for rules that fail [`Rules::validate`].
    pub fn ticks_per_second(&self, score: u32) -> u32 {
        let increments = score.checked_div(self.speedup_every).unwrap_or(0);
        self.base_tps
            .saturating_add(increments)
            .min(self.max_tps)
            .max(self.base_tps)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.start_len >= 1, "start length must be at least 1");
        ensure!(
            self.grid_size > 0 && self.start_len < self.grid_size as usize,
            "grid of {} cells per side cannot hold a snake of length {} plus food",
            self.grid_size,
            self.start_len
        );
        ensure!(
            self.grid_size <= MAX_GRID_SIZE,
            "grid of {} cells per side exceeds the maximum of {}",
            self.grid_size,
            MAX_GRID_SIZE
        );
        ensure!(self.base_tps > 0, "base speed must be positive");
        ensure!(
            self.max_tps >= self.base_tps,
            "max speed {} is below base speed {}",
            self.max_tps,
            self.base_tps
        );
        ensure!(self.speedup_every > 0, "speedup interval must be positive");
        ensure!(self.food_attempts > 0, "food attempt cap must be positive");
        Ok(())
    }
}

/// Thresholds a pointer gesture must meet to count as a swipe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeConfig {
    pub min_distance: f64,
    pub max_duration: Duration,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        SwipeConfig {
            min_distance: SWIPE_MIN_DISTANCE,
            max_duration: SWIPE_MAX_DURATION,
        }
    }
}
