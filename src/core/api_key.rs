//! API key storage: load and persist the upstream API key in the config directory.
//!
//! The key is stored in a dedicated file with restrictive permissions (0o600 on Unix).

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::core::paths;

/// Errors when loading or storing the API key.
#[derive(Debug, thiserror::Error)]
pub enum ApiKeyError {
    #[error("No config directory available")]
    NoConfigDir,
    #[error("API key cannot be empty")]
    Empty,
    #[error("Failed to store API key: {0}")]
    Io(#[from] io::Error),
}

/// Path to the API key file in the config directory.
pub fn credentials_path() -> Option<PathBuf> {
    paths::config_dir().map(|d| d.join("api-key"))
}

/// Load the API key from the config directory.
/// Returns `None` if the file is absent, empty, or unreadable.
pub fn load_api_key() -> Option<String> {
    let path = credentials_path()?;
    let content = fs::read_to_string(&path).ok()?;
    let key = content.trim().to_string();
    if key.is_empty() { None } else { Some(key) }
}

/// Store the API key in the config directory.
/// Creates the config dir if needed. On Unix, sets file permissions to 0o600.
pub fn store_api_key(key: &str) -> Result<PathBuf, ApiKeyError> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(ApiKeyError::Empty);
    }
    let path = credentials_path().ok_or(ApiKeyError::NoConfigDir)?;
    let dir = path.parent().ok_or_else(|| {
        ApiKeyError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Invalid credentials path",
        ))
    })?;
    fs::create_dir_all(dir)?;

    let mut file = fs::File::create(&path)?;
    file.write_all(trimmed.as_bytes())?;
    file.write_all(b"\n")?;

    #[cfg(unix)]
    {
        let mut perms = file.metadata()?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::{ApiKeyError, load_api_key, store_api_key};
    use crate::core::paths::TEST_ENV_LOCK;

    #[test]
    fn roundtrip_store_and_load() {
        let _lock = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        unsafe { std::env::set_var("TEST_CONFIG_DIR", dir.path()) };

        let path = store_api_key("  sk-test-key-123\n").unwrap();
        assert!(path.starts_with(dir.path()));
        let loaded = load_api_key();
        assert_eq!(loaded.as_deref(), Some("sk-test-key-123"));

        unsafe { std::env::remove_var("TEST_CONFIG_DIR") };
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = store_api_key("   ").unwrap_err();
        assert!(matches!(err, ApiKeyError::Empty));
    }

    #[cfg(unix)]
    #[test]
    fn stored_key_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let _lock = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        unsafe { std::env::set_var("TEST_CONFIG_DIR", dir.path()) };

        let path = store_api_key("secret").unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        unsafe { std::env::remove_var("TEST_CONFIG_DIR") };
    }
}
