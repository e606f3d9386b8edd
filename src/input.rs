use crate::config::SwipeConfig;
use crate::engine::Direction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

/// What the player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Turn(Direction),
    TogglePause,
    Restart,
    /// Overlay main button: restart when over, resume when paused.
    Confirm,
    Share,
    Quit,
}

pub fn intent_for_key(key: KeyEvent) -> Option<Intent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Intent::Quit);
    }

    let intent = match key.code {
        KeyCode::Up => Intent::Turn(Direction::North),
        KeyCode::Down => Intent::Turn(Direction::South),
        KeyCode::Left => Intent::Turn(Direction::West),
        KeyCode::Right => Intent::Turn(Direction::East),
        KeyCode::Char(' ') => Intent::TogglePause,
        KeyCode::Enter => Intent::Confirm,
        KeyCode::Esc => Intent::Quit,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Intent::Turn(Direction::North),
            's' => Intent::Turn(Direction::South),
            'a' => Intent::Turn(Direction::West),
            'd' => Intent::Turn(Direction::East),
            'r' => Intent::Restart,
            'c' => Intent::Share,
            'q' => Intent::Quit,
            _ => return None,
        },
        _ => return None,
    };
    Some(intent)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Swipe(Direction),
    Tap,
    /// Too slow, or no press to pair with.
    Ignored,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    x: f64,
    y: f64,
    at: Instant,
}

/// Turns a press/release pair into a swipe along its dominant axis.
#[derive(Debug)]
pub struct SwipeTracker {
    config: SwipeConfig,
    start: Option<Press>,
}

impl SwipeTracker {
    pub fn new(config: SwipeConfig) -> Self {
        SwipeTracker {
            config,
            start: None,
        }
    }

    pub fn press(&mut self, x: f64, y: f64, at: Instant) {
        self.start = Some(Press { x, y, at });
    }

    pub fn release(&mut self, x: f64, y: f64, at: Instant) -> Gesture {
        let Some(start) = self.start.take() else {
            return Gesture::Ignored;
        };

        if at.saturating_duration_since(start.at) > self.config.max_duration {
            return Gesture::Ignored;
        }

        let dx = x - start.x;
        let dy = y - start.y;
        if dx.hypot(dy) < self.config.min_distance {
            return Gesture::Tap;
        }

        let direction = if dx.abs() > dy.abs() {
            if dx > 0.0 {
                Direction::East
            } else {
                Direction::West
            }
        } else if dy > 0.0 {
            Direction::South
        } else {
            Direction::North
        };
        Gesture::Swipe(direction)
    }
}
