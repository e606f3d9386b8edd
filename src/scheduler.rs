//! Fixed-timestep driver: turns a stream of render callbacks with arbitrary
//! spacing into the right number of simulation ticks.

use std::time::{Duration, Instant};

/// Anything that advances in discrete steps at a (possibly changing) rate.
pub trait Simulation {
    fn tick(&mut self);
    fn ticks_per_second(&self) -> u32;
}

/// Accumulates wall-clock time between frames and spends it on ticks.
#[derive(Debug, Default)]
pub struct FixedStep {
    accumulator: Duration,
    last_frame: Option<Instant>,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets accumulated time; the next frame counts as the first one.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
        self.last_frame = None;
    }

    /// Adds the time since the previous frame and runs every tick that has
    /// become due. The step length is re-read before each tick so a speed-up
    /// takes effect within the same frame. Returns the number of ticks run.
    pub fn advance<S: Simulation + ?Sized>(&mut self, now: Instant, sim: &mut S) -> u32 {
        let elapsed = match self.last_frame.replace(now) {
            Some(previous) => now.saturating_duration_since(previous),
            None => Duration::ZERO,
        };
        self.accumulator += elapsed;

        let mut ticks = 0;
        loop {
            let step = step_duration(sim.ticks_per_second());
            if self.accumulator < step {
                break;
            }
            sim.tick();
            self.accumulator -= step;
            ticks += 1;
        }
        ticks
    }

    /// One render callback: drain due ticks, then render exactly once.
    pub fn frame<S, F, T>(&mut self, now: Instant, sim: &mut S, render: F) -> T
    where
        S: Simulation + ?Sized,
        F: FnOnce(&S) -> T,
    {
        self.advance(now, sim);
        render(sim)
    }
}

pub fn step_duration(ticks_per_second: u32) -> Duration {
    Duration::from_secs(1) / ticks_per_second.max(1)
}
