//! What the HUD and overlay show, computed from the game without drawing it.

use crate::engine::{GameOverReason, GameState};

#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub score: u32,
    pub best: u32,
    pub ticks_per_second: u32,
    pub base_tps: u32,
    pub paused: bool,
    pub over: Option<GameOverReason>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Overlay {
    pub title: &'static str,
    pub text: String,
    pub primary: &'static str,
    pub secondary: &'static str,
}

impl Hud {
    pub fn from_state(state: &GameState, best: u32, base_tps: u32) -> Self {
        Hud {
            score: state.score(),
            best,
            ticks_per_second: state.ticks_per_second(),
            base_tps,
            paused: state.is_paused(),
            over: state.over_reason(),
        }
    }

    pub fn speed_multiplier(&self) -> f64 {
        f64::from(self.ticks_per_second) / f64::from(self.base_tps.max(1))
    }

    /// "1x", "1.11x", "2x": two decimals, whole numbers without them.
    pub fn speed_label(&self) -> String {
        let formatted = format!("{:.2}", self.speed_multiplier());
        let trimmed = formatted.strip_suffix(".00").unwrap_or(&formatted);
        format!("{}x", trimmed)
    }

    pub fn pause_label(&self) -> &'static str {
        if self.paused {
            "Resume"
        } else {
            "Pause"
        }
    }

    /// The modal shown over the board, if any.
    pub fn overlay(&self) -> Option<Overlay> {
        let (title, text) = match self.over {
            Some(GameOverReason::Wall) => (
                "Crashed!",
                format!("You hit the wall. Final score: {}.", self.score),
            ),
            Some(GameOverReason::SelfCollision) => (
                "Oops!",
                format!("You ran into your tail. Final score: {}.", self.score),
            ),
            Some(GameOverReason::Win) => (
                "You Win!",
                "No space left to spawn food. Press R to restart.".to_string(),
            ),
            None if self.paused => {
                return Some(Overlay {
                    title: "Paused",
                    text: "Press Space (or Resume) to continue.".to_string(),
                    primary: "Resume",
                    secondary: "Restart",
                })
            }
            None => return None,
        };
        Some(Overlay {
            title,
            text,
            primary: "Restart",
            secondary: "Close",
        })
    }

    pub fn share_text(&self) -> String {
        format!("I scored {} in Snake! 🐍 (Best: {})", self.score, self.best)
    }
}
