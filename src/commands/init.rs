use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::{default_file_config, write_config_atomic};

#[derive(Debug, Serialize)]
pub struct InitResult {
    pub config_path: PathBuf,
}

pub fn cmd_init(config_path: &Path, force: bool) -> Result<InitResult> {
    write_config_atomic(config_path, &default_file_config(), force)?;
    Ok(InitResult {
        config_path: config_path.to_path_buf(),
    })
}

pub fn format_init_human(result: &InitResult) -> String {
    format!(
        "Config written to {}\nEdit it to change the shell, working directory or network commands.",
        result.config_path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    #[cfg(target_os = "linux")]
    use crate::config::{default_config_path, load_default_config};
    #[cfg(target_os = "linux")]
    use serial_test::serial;

    #[test]
    fn init_writes_loadable_config() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let result = cmd_init(&path, false).unwrap();
        assert_eq!(result.config_path, path);

        let config = load_config(&path).unwrap();
        assert!(!config.shell_enabled);
        assert_eq!(config.network.ping_count, 4);
    }

    #[test]
    fn init_twice_requires_force() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        cmd_init(&path, false).unwrap();
        assert!(cmd_init(&path, false).is_err());
        assert!(cmd_init(&path, true).is_ok());
    }

    #[test]
    fn human_output_names_path() {
        let result = InitResult {
            config_path: PathBuf::from("/tmp/shell-panel/config.toml"),
        };
        assert!(format_init_human(&result)
            .starts_with("Config written to /tmp/shell-panel/config.toml"));
    }

    // These tests mutate XDG_CONFIG_HOME (process-global), so they must run serially.

    #[cfg(target_os = "linux")]
    struct XdgEnvGuard {
        saved: Option<String>,
    }

    #[cfg(target_os = "linux")]
    impl XdgEnvGuard {
        fn set(config: impl AsRef<Path>) -> Self {
            let saved = std::env::var("XDG_CONFIG_HOME").ok();
            std::env::set_var("XDG_CONFIG_HOME", config.as_ref());
            Self { saved }
        }
    }

    #[cfg(target_os = "linux")]
    impl Drop for XdgEnvGuard {
        fn drop(&mut self) {
            match &self.saved {
                Some(v) => std::env::set_var("XDG_CONFIG_HOME", v),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    #[serial]
    fn default_path_follows_xdg_config_home() {
        let tmp = tempfile::tempdir().unwrap();
        let _env = XdgEnvGuard::set(tmp.path());
        let path = default_config_path().unwrap();
        assert_eq!(path, tmp.path().join("shell-panel").join("config.toml"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    #[serial]
    fn missing_default_config_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let _env = XdgEnvGuard::set(tmp.path());
        let config = load_default_config().unwrap();
        assert!(config.working_dir.is_none());
        assert_eq!(config.network.ping_count, 4);
    }

    #[cfg(target_os = "linux")]
    #[test]
    #[serial]
    fn init_at_default_path_is_picked_up() {
        let tmp = tempfile::tempdir().unwrap();
        let _env = XdgEnvGuard::set(tmp.path());
        let path = default_config_path().unwrap();
        cmd_init(&path, false).unwrap();
        std::fs::write(&path, "[network]\nping_count = 7\n").unwrap();
        let config = load_default_config().unwrap();
        assert_eq!(config.network.ping_count, 7);
    }
}
