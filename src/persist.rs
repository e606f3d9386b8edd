use log::{debug, error, info, warn};
use std::fs;
use std::io;
use std::path::PathBuf;

pub const BEST_SCORE_FILE: &str = ".gridsnek_best.txt";

/// Where the best score lives between sessions. Implementations swallow
/// their own failures: a broken store must never stop the game.
pub trait ScoreStore {
    /// The stored best, or 0 when there is none.
    fn load_best(&mut self) -> u32;
    fn save_best(&mut self, best: u32);
}

/// Best score kept as a decimal number in a text file.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileScoreStore { path: path.into() }
    }
}

impl Default for FileScoreStore {
    fn default() -> Self {
        Self::new(BEST_SCORE_FILE)
    }
}

impl ScoreStore for FileScoreStore {
    fn load_best(&mut self) -> u32 {
        match fs::read_to_string(&self.path) {
            Ok(contents) => match contents.trim().parse() {
                Ok(best) => {
                    info!("Loaded best score {} from {}", best, self.path.display());
                    best
                }
                Err(e) => {
                    warn!("Ignoring corrupt best score file {}: {}", self.path.display(), e);
                    0
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No best score file at {}", self.path.display());
                0
            }
            Err(e) => {
                error!("Error loading best score: {}", e);
                0
            }
        }
    }

    fn save_best(&mut self, best: u32) {
        if let Err(e) = fs::write(&self.path, best.to_string()) {
            error!("Error saving best score: {}", e);
        }
    }
}

/// In-process store; remembers every save for inspection.
#[derive(Debug, Default, Clone)]
pub struct MemoryScoreStore {
    pub best: u32,
    pub saves: Vec<u32>,
}

impl MemoryScoreStore {
    pub fn with_best(best: u32) -> Self {
        MemoryScoreStore {
            best,
            saves: Vec::new(),
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load_best(&mut self) -> u32 {
        self.best
    }

    fn save_best(&mut self, best: u32) {
        self.best = best;
        self.saves.push(best);
    }
}
