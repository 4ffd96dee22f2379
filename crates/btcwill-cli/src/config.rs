use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::Result;
use dirs::config_dir;
use serde::{Deserialize, Serialize};

pub const OWNER_ENV: &str = "BTCWILL_OWNER";
const DEFAULT_OWNER: &str = "local";

/// User-level configuration loaded from `~/.config/btcwill/config.toml` (platform-specific).
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Override for the data directory holding will blobs.
    pub data_dir: Option<PathBuf>,
    /// Owner id that scopes every will operation.
    pub owner: Option<String>,
    /// Codec secret; `BTCWILL_ENCRYPTION_KEY` takes precedence.
    pub encryption_key: Option<String>,
}

impl Config {
    /// Owner from `BTCWILL_OWNER`, then config, then `local`.
    pub fn owner(&self) -> String {
        resolve_owner(std::env::var(OWNER_ENV).ok(), self.owner.as_deref())
    }
}

fn resolve_owner(env: Option<String>, configured: Option<&str>) -> String {
    env.filter(|o| !o.trim().is_empty())
        .or_else(|| {
            configured
                .filter(|o| !o.trim().is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_OWNER.to_string())
}

/// Load config from the default path; if missing, return defaults.
pub fn load() -> Result<Config> {
    let path = default_path()?;
    load_from_path(path)
}

/// Load config from a given path; if missing or empty, return defaults.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(toml::from_str(&contents)?)
}

pub fn default_path() -> Result<PathBuf> {
    let base = config_dir().ok_or_else(|| color_eyre::eyre::eyre!("no config dir available"))?;
    Ok(base.join("btcwill").join("config.toml"))
}

/// Write `config` to the default path unless a file is already there.
pub fn write_default_if_missing(config: &Config) -> Result<PathBuf> {
    write_to_path_if_missing(config, &default_path()?)
}

fn write_to_path_if_missing(config: &Config, path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Ok(path.to_path_buf());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml::to_string_pretty(config)?)?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_default_when_missing_or_blank() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        assert_eq!(load_from_path(&path).expect("load"), Config::default());

        fs::write(&path, "  \n").expect("write");
        assert_eq!(load_from_path(&path).expect("load"), Config::default());
    }

    #[test]
    fn parses_custom_config() {
        let contents = r#"
            data_dir = "/tmp/btcwill-data"
            owner = "alice"
            encryption_key = "correct horse battery staple"
        "#;
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).expect("write temp config");

        let cfg = load_from_path(&path).expect("load");
        assert_eq!(
            cfg,
            Config {
                data_dir: Some(PathBuf::from("/tmp/btcwill-data")),
                owner: Some("alice".into()),
                encryption_key: Some("correct horse battery staple".into()),
            }
        );
    }

    #[test]
    fn rejects_malformed_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "owner = [").expect("write");
        assert!(load_from_path(&path).is_err());
    }

    #[test]
    fn write_creates_file_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            owner: Some("alice".into()),
            ..Config::default()
        };

        write_to_path_if_missing(&cfg, &path).expect("write should succeed");
        let other = Config {
            owner: Some("mallory".into()),
            ..Config::default()
        };
        let second = write_to_path_if_missing(&other, &path).expect("second write ok");
        assert_eq!(second, path);
        assert_eq!(load_from_path(&path).expect("load"), cfg);
    }

    #[test]
    fn owner_prefers_env_then_config() {
        assert_eq!(resolve_owner(Some("env".into()), Some("cfg")), "env");
        assert_eq!(resolve_owner(Some("  ".into()), Some("cfg")), "cfg");
        assert_eq!(resolve_owner(None, None), "local");
    }
}
