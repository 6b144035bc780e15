use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::paths::expand_tilde;
use crate::runner::{CommandRunner, OutputMode, ShellSpec};

pub const APP_NAME: &str = "shell-panel";
pub const MAX_PING_COUNT: u32 = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub shell: ShellConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Run free-text command lines through the shell without `--shell`.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_ping_count")]
    pub ping_count: u32,
    #[serde(default = "default_interfaces")]
    pub interfaces: Vec<String>,
    #[serde(default = "default_connections")]
    pub connections: Vec<String>,
    #[serde(default = "default_ports")]
    pub ports: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ping_count: default_ping_count(),
            interfaces: default_interfaces(),
            connections: default_connections(),
            ports: default_ports(),
        }
    }
}

fn default_ping_count() -> u32 {
    4
}

fn default_interfaces() -> Vec<String> {
    vec!["ifconfig".to_string()]
}

fn default_connections() -> Vec<String> {
    vec!["netstat".to_string(), "-tuln".to_string()]
}

fn default_ports() -> Vec<String> {
    vec!["ss".to_string(), "-tuln".to_string()]
}

#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    pub working_dir: Option<PathBuf>,
    pub shell_enabled: bool,
    pub shell: ShellSpec,
    pub network: NetworkConfig,
}

impl ResolvedConfig {
    pub fn runner(&self, mode: OutputMode) -> CommandRunner {
        let runner = CommandRunner::new(self.shell.clone()).with_mode(mode);
        match &self.working_dir {
            Some(dir) => runner.with_working_dir(dir),
            None => runner,
        }
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let proj = directories::ProjectDirs::from("", "", APP_NAME)
        .context("could not determine config directory")?;
    Ok(proj.config_dir().join("config.toml"))
}

/// Loads the config at the default path. A missing file means defaults.
pub fn load_default_config() -> Result<ResolvedConfig> {
    let path = default_config_path()?;
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(ResolvedConfig::default());
    }
    load_config(&path)
}

pub fn load_config(path: &Path) -> Result<ResolvedConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config from {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("invalid config at {}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<ResolvedConfig> {
    let raw: Config = toml::from_str(contents).context("failed to parse config TOML")?;

    let working_dir = match raw.general.working_dir {
        Some(dir) => {
            let dir = expand_tilde(dir.to_str().unwrap_or(""));
            if !dir.is_absolute() {
                bail!(
                    "general.working_dir must be an absolute path (got {})",
                    dir.display()
                );
            }
            Some(dir)
        }
        None => None,
    };

    let defaults = ShellSpec::default();
    let shell = ShellSpec {
        program: raw.shell.program.unwrap_or(defaults.program),
        flag: raw.shell.flag.unwrap_or(defaults.flag),
    };
    if shell.program.trim().is_empty() {
        bail!("shell.program must not be empty");
    }

    let network = raw.network;
    if network.ping_count == 0 || network.ping_count > MAX_PING_COUNT {
        bail!(
            "network.ping_count must be between 1 and {} (got {})",
            MAX_PING_COUNT,
            network.ping_count
        );
    }
    for (key, argv) in [
        ("interfaces", &network.interfaces),
        ("connections", &network.connections),
        ("ports", &network.ports),
    ] {
        if argv.first().is_none_or(|p| p.trim().is_empty()) {
            bail!("network.{} must name a program", key);
        }
    }

    let result = ResolvedConfig {
        working_dir,
        shell_enabled: raw.shell.enabled,
        shell,
        network,
    };

    debug_assert!(
        result
            .working_dir
            .as_ref()
            .is_none_or(|d| d.is_absolute()),
        "working_dir must be absolute after parsing"
    );

    Ok(result)
}

/// The config file `init` writes: every default spelled out so it can be edited.
pub fn default_file_config() -> Config {
    let shell = ShellSpec::default();
    Config {
        general: GeneralConfig::default(),
        shell: ShellConfig {
            enabled: false,
            program: Some(shell.program),
            flag: Some(shell.flag),
        },
        network: NetworkConfig::default(),
    }
}

pub fn write_config_atomic(path: &Path, config: &Config, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "config already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(config).context("failed to serialize config")?;

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, &content)
        .with_context(|| format!("failed to write temp config to {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("failed to rename config to {}", path.display()))?;

    Ok(())
}
