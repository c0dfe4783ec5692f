//! Persistence of user preferences (last chosen difficulty) in ~/.config/quizmaster/.

use std::fs;
use std::io;

use crate::core::paths;
use crate::core::quiz::Difficulty;

/// Load the last used difficulty from disk, if the file exists and is valid.
pub fn load_last_difficulty() -> Option<Difficulty> {
    let path = paths::config_dir()?.join("last_difficulty");
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// Save the last used difficulty to disk. Creates the config directory if needed.
pub fn save_last_difficulty(difficulty: Difficulty) -> io::Result<()> {
    let dir = paths::config_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No config directory"))?;
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("last_difficulty"), difficulty.as_str())
}
