//! Grid snake: a fixed-timestep snake simulation with a terminal front end.
//!
//! The engine and scheduler are independent of any I/O; `tui`, `input` and
//! `persist` are the collaborators a host plugs around them.

pub mod config;
pub mod engine;
pub mod game;
pub mod hud;
pub mod input;
pub mod persist;
pub mod scheduler;
pub mod tui;

pub use config::{Rules, SwipeConfig};
pub use engine::{Cell, Direction, Engine, GameOverReason, GameState, Status, TickOutcome};
pub use game::Game;
pub use scheduler::{FixedStep, Simulation};
