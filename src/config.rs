use std::path::PathBuf;

use crate::installer::{OutputSink, Platform};

pub const APP_NAME: &str = "lsm";

/// Subdirectory of the data directory holding one directory per tool
pub const SERVERS_DIR: &str = "servers";

/// User-Agent sent with every download
pub const USER_AGENT: &str = concat!("lsm/", env!("CARGO_PKG_VERSION"));

/// Environment variable overriding the base directory
pub const BASE_DIR_ENV: &str = "LSM_BASE_DIR";

/// Environment variable holding the tracing filter directives
pub const LOG_ENV: &str = "LSM_LOG";

/// Filter used when `LSM_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime configuration resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_dir: PathBuf,
    pub platform: Platform,
    pub output: OutputSink,
}

impl Config {
    /// Resolves the base directory from an explicit override or the
    /// platform's data-home convention.
    pub fn resolve(base_dir: Option<PathBuf>) -> std::io::Result<Self> {
        let base_dir = match base_dir {
            Some(dir) => std::path::absolute(dir)?,
            None => std::path::absolute(default_base_dir())?,
        };
        Ok(Self {
            base_dir,
            platform: Platform::current(),
            output: OutputSink::default(),
        })
    }
}

/// Returns the directory tools are installed into.
/// On Unix uses $XDG_DATA_HOME/lsm/servers if XDG_DATA_HOME is set to an
/// absolute path, otherwise falls back to ~/.local/share/lsm/servers,
/// or ./lsm/servers if neither is available.
/// On Windows uses the local application data directory.
pub fn default_base_dir() -> PathBuf {
    if cfg!(windows) {
        return windows_base_dir(dirs::data_local_dir());
    }
    base_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

fn base_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .filter(|dir| dir.is_absolute())
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join(APP_NAME).join(SERVERS_DIR)
}

fn windows_base_dir(local_app_data: Option<PathBuf>) -> PathBuf {
    local_app_data
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(SERVERS_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn base_dir_with_env_uses_xdg_data_home_when_set() {
        let path = base_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/lsm/servers"));
    }

    #[test]
    fn base_dir_with_env_ignores_empty_xdg_data_home() {
        let path = base_dir_with_env(Some(String::new()), Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/lsm/servers"));
    }

    #[test]
    fn base_dir_with_env_ignores_relative_xdg_data_home() {
        let path = base_dir_with_env(
            Some("relative/data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/home/user/.local/share/lsm/servers"));
    }

    #[test]
    fn base_dir_with_env_falls_back_to_home_local_share() {
        let path = base_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/lsm/servers"));
    }

    #[test]
    fn base_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = base_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./lsm/servers"));
    }

    #[test]
    fn windows_base_dir_uses_local_app_data() {
        let path = windows_base_dir(Some(PathBuf::from("/appdata/local")));
        assert_eq!(path, PathBuf::from("/appdata/local/lsm/servers"));
    }

    #[test]
    fn resolve_makes_explicit_base_dir_absolute() {
        let config = Config::resolve(Some(PathBuf::from("relative/servers"))).unwrap();

        assert!(config.base_dir.is_absolute());
        assert!(config.base_dir.ends_with("relative/servers"));
        assert_eq!(config.output, OutputSink::Inherit);
    }

    #[test]
    fn resolve_makes_default_base_dir_absolute() {
        let config = Config::resolve(None).unwrap();

        assert!(config.base_dir.is_absolute());
        assert!(config.base_dir.ends_with("lsm/servers"));
    }
}
