//! The controller a host talks to: one engine, one score store, and the
//! intents that input adapters and overlay buttons produce.

use crate::config::Rules;
use crate::engine::{Direction, Engine, GameState, TickOutcome};
use crate::hud::Hud;
use crate::persist::ScoreStore;
use crate::scheduler::Simulation;
use anyhow::Result;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug)]
pub struct Game<S, R = StdRng> {
    engine: Engine<R>,
    store: S,
    saved_best: u32,
}

impl<S: ScoreStore> Game<S, StdRng> {
    pub fn new(rules: Rules, store: S) -> Result<Self> {
        Self::with_rng(rules, store, StdRng::from_entropy())
    }

    pub fn seeded(rules: Rules, store: S, seed: u64) -> Result<Self> {
        Self::with_rng(rules, store, StdRng::seed_from_u64(seed))
    }
}

impl<S: ScoreStore, R: Rng> Game<S, R> {
    pub fn with_rng(rules: Rules, mut store: S, rng: R) -> Result<Self> {
        let best = store.load_best();
        let engine = Engine::with_rng(rules, rng, best)?;
        info!("New game, best score {}", best);
        Ok(Game {
            engine,
            store,
            saved_best: best,
        })
    }

    /// Wraps an already-built engine; its best score is taken as saved.
    pub fn from_engine(engine: Engine<R>, store: S) -> Self {
        let saved_best = engine.best();
        Game {
            engine,
            store,
            saved_best,
        }
    }

    pub fn state(&self) -> &GameState {
        self.engine.state()
    }

    pub fn rules(&self) -> &Rules {
        self.engine.rules()
    }

    pub fn best(&self) -> u32 {
        self.engine.best()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn hud(&self) -> Hud {
        Hud::from_state(self.state(), self.best(), self.rules().base_tps)
    }

    pub fn reset(&mut self) {
        self.engine.reset();
        info!("New game, best score {}", self.best());
    }

    pub fn set_direction(&mut self, direction: Direction) -> bool {
        self.engine.set_direction(direction)
    }

    pub fn toggle_pause(&mut self) -> bool {
        let changed = self.engine.toggle_pause();
        if changed {
            info!(
                "{}",
                if self.state().is_paused() {
                    "Paused"
                } else {
                    "Resumed"
                }
            );
        }
        changed
    }

    pub fn resume(&mut self) -> bool {
        let changed = self.engine.resume();
        if changed {
            info!("Resumed");
        }
        changed
    }

    /// The overlay's main button: restart a finished game, otherwise resume.
    pub fn overlay_primary(&mut self) {
        if self.state().is_over() {
            self.reset();
        } else {
            self.resume();
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.engine.tick();
        self.persist_best();
        outcome
    }

    fn persist_best(&mut self) {
        let best = self.engine.best();
        if best > self.saved_best {
            info!("New best score {}", best);
            self.store.save_best(best);
            self.saved_best = best;
        }
    }
}

impl<S: ScoreStore, R: Rng> Simulation for Game<S, R> {
    fn tick(&mut self) {
        Game::tick(self);
    }

    fn ticks_per_second(&self) -> u32 {
        self.state().ticks_per_second()
    }
}
