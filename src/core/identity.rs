//! Local sign-in: maps a display name to a stable user id and remembers the current session.
//!
//! Files in the config directory: `users.json` (name -> id) and `session.json` (current user).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::paths;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Display name cannot be empty")]
    EmptyName,
    #[error("No config directory available")]
    NoConfigDir,
    #[error("Identity storage error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct UsersFile {
    users: Vec<User>,
}

pub struct Identity {
    dir: PathBuf,
}

impl Identity {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn default_location() -> Result<Self, IdentityError> {
        paths::config_dir()
            .map(Self::open)
            .ok_or(IdentityError::NoConfigDir)
    }

    /// Sign in as `display_name`. The same name (case-insensitive) always gets the same id.
    pub fn sign_in(&self, display_name: &str) -> Result<User, IdentityError> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(IdentityError::EmptyName);
        }

        let users_path = self.dir.join("users.json");
        let mut users: UsersFile = read_json(&users_path)?.unwrap_or_default();
        let user = match users
            .users
            .iter()
            .find(|u| u.display_name.eq_ignore_ascii_case(name))
        {
            Some(existing) => existing.clone(),
            None => {
                let user = User {
                    id: Uuid::new_v4().to_string(),
                    display_name: name.to_string(),
                };
                users.users.push(user.clone());
                write_json(&users_path, &users)?;
                user
            }
        };

        write_json(&self.session_path(), &user)?;
        log::info!("Signed in as {} ({})", user.display_name, user.id);
        Ok(user)
    }

    pub fn sign_out(&self) -> Result<(), IdentityError> {
        match fs::remove_file(self.session_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// The signed-in user, if any. An unreadable session counts as signed out.
    pub fn current_user(&self) -> Option<User> {
        match read_json(&self.session_path()) {
            Ok(user) => user,
            Err(e) => {
                log::warn!("Ignoring unreadable session: {}", e);
                None
            }
        }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join("session.json")
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> io::Result<Option<T>> {
    let data = match fs::read_to_string(path) {
        Ok(d) => d,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    serde_json::from_str(&data)
        .map(Some)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)
}
