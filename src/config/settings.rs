use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{Argon2Params, MIN_SALT_LEN};
use crate::errors::{CrypticalError, Result};

/// Application configuration, loaded from `cryptical.toml`.
///
/// Every field has a sensible default so Cryptical works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path of the storage file (relative paths resolve against the
    /// directory the config was loaded from).
    #[serde(default = "default_db_file")]
    pub db_file: String,

    /// Length of the salt generated for each new vault.
    #[serde(default = "default_salt_length")]
    pub salt_length: usize,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,

    /// How long to wait on a store locked by another process.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Seed an example vault into a brand-new store.
    #[serde(default = "default_seed_example")]
    pub seed_example: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_db_file() -> String {
    "db.sqlite".to_string()
}

fn default_salt_length() -> usize {
    crate::crypto::hashing::DEFAULT_SALT_LEN
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_seed_example() -> bool {
    true
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_file: default_db_file(),
            salt_length: default_salt_length(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            busy_timeout_ms: default_busy_timeout_ms(),
            seed_example: default_seed_example(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for.
    pub const FILE_NAME: &'static str = "cryptical.toml";

    /// Load settings from `<dir>/cryptical.toml`.
    ///
    /// If the file does not exist, defaults are returned.  If it exists
    /// but cannot be parsed or holds unusable values, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            CrypticalError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the crypto layer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.salt_length < MIN_SALT_LEN {
            return Err(CrypticalError::ConfigError(format!(
                "salt_length must be at least {MIN_SALT_LEN} (got {})",
                self.salt_length
            )));
        }
        self.argon2_params()
            .validate()
            .map_err(|e| CrypticalError::ConfigError(e.to_string()))
    }

    /// Full path to the storage file.
    pub fn db_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.db_file)
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.db_file, "db.sqlite");
        assert_eq!(s.salt_length, 10);
        assert_eq!(s.argon2_memory_kib, 65_536);
        assert_eq!(s.argon2_iterations, 3);
        assert_eq!(s.argon2_parallelism, 4);
        assert_eq!(s.busy_timeout(), Duration::from_secs(5));
        assert!(s.seed_example);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.db_file, "db.sqlite");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
db_file = "vaults.db"
salt_length = 16
argon2_memory_kib = 131072
argon2_iterations = 5
argon2_parallelism = 8
busy_timeout_ms = 250
seed_example = false
"#;
        fs::write(tmp.path().join(Settings::FILE_NAME), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.db_file, "vaults.db");
        assert_eq!(settings.salt_length, 16);
        assert_eq!(settings.argon2_memory_kib, 131_072);
        assert_eq!(settings.argon2_iterations, 5);
        assert_eq!(settings.argon2_parallelism, 8);
        assert_eq!(settings.busy_timeout(), Duration::from_millis(250));
        assert!(!settings.seed_example);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(Settings::FILE_NAME), "salt_length = 12\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.salt_length, 12);
        assert_eq!(settings.db_file, "db.sqlite");
        assert_eq!(settings.argon2_iterations, 3);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(Settings::FILE_NAME), "not valid {{toml").unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn load_rejects_short_salt() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(Settings::FILE_NAME), "salt_length = 4\n").unwrap();
        assert!(matches!(
            Settings::load(tmp.path()),
            Err(CrypticalError::ConfigError(_))
        ));
    }

    #[test]
    fn load_rejects_weak_argon2() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(Settings::FILE_NAME),
            "argon2_memory_kib = 1024\n",
        )
        .unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn db_path_joins_dir() {
        let s = Settings::default();
        assert_eq!(
            s.db_path(Path::new("/home/user")),
            PathBuf::from("/home/user/db.sqlite")
        );
    }
}
