use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::sensors::ram::DEFAULT_WATTS_PER_8GB;
use crate::core::telemetry::SamplingWindow;
use crate::platform::command::MAX_COMMAND_TIMEOUT;

/// Overrides `data_dir` when set
pub const DATA_DIR_ENV: &str = "TASKMON_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root for backups, the history database and the action log
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Filesystem whose usage is reported
    #[serde(default = "default_disk_path")]
    pub disk_path: PathBuf,
    /// CPU sampling window in milliseconds
    #[serde(default = "default_cpu_sample_ms")]
    pub cpu_sample_ms: u64,
    /// Deadline for external probe utilities, capped at 10 seconds
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
    /// Coefficient of the RAM power estimate
    #[serde(default = "default_ram_watts")]
    pub ram_watts_per_8gb: f64,
    /// How many backups `backups` lists by default
    #[serde(default = "default_recent_backups")]
    pub recent_backups: usize,
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("taskmon")
}

#[cfg(windows)]
fn default_disk_path() -> PathBuf {
    PathBuf::from("C:\\")
}

#[cfg(not(windows))]
fn default_disk_path() -> PathBuf {
    PathBuf::from("/")
}

fn default_cpu_sample_ms() -> u64 {
    SamplingWindow::DEFAULT_MS
}

fn default_command_timeout_secs() -> u64 {
    5
}

fn default_ram_watts() -> f64 {
    DEFAULT_WATTS_PER_8GB
}

fn default_recent_backups() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            disk_path: default_disk_path(),
            cpu_sample_ms: default_cpu_sample_ms(),
            command_timeout_secs: default_command_timeout_secs(),
            ram_watts_per_8gb: default_ram_watts(),
            recent_backups: default_recent_backups(),
        }
    }
}

impl Config {
    /// Load the user config, falling back to defaults when the file is
    /// missing or unreadable, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let data = fs::read(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if data.is_empty() {
            return Ok(Config::default());
        }

        // An outdated or corrupted file is replaced by defaults on next save
        Ok(serde_json::from_slice(&data).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable config {:?}: {}", path, e);
            Config::default()
        }))
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_json::to_vec_pretty(self).context("Failed to serialize config")?;

        fs::write(path, data)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("taskmon").join("config.json"))
    }

    fn apply_env(&mut self) {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
    }

    /// Update one field from its textual form
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data_dir" => self.data_dir = PathBuf::from(value),
            "disk_path" => self.disk_path = PathBuf::from(value),
            "cpu_sample_ms" => {
                self.cpu_sample_ms = value.parse().context("cpu_sample_ms must be an integer")?
            }
            "command_timeout_secs" => {
                let secs: u64 = value
                    .parse()
                    .context("command_timeout_secs must be an integer")?;
                if secs == 0 || secs > MAX_COMMAND_TIMEOUT.as_secs() {
                    bail!(
                        "command_timeout_secs must be between 1 and {}",
                        MAX_COMMAND_TIMEOUT.as_secs()
                    );
                }
                self.command_timeout_secs = secs;
            }
            "ram_watts_per_8gb" => {
                let watts: f64 = value.parse().context("ram_watts_per_8gb must be a number")?;
                if !watts.is_finite() || watts <= 0.0 {
                    bail!("ram_watts_per_8gb must be positive");
                }
                self.ram_watts_per_8gb = watts;
            }
            "recent_backups" => {
                self.recent_backups = value.parse().context("recent_backups must be an integer")?
            }
            other => bail!("Unknown config key: {}", other),
        }
        Ok(())
    }

    pub fn sampling_window(&self) -> SamplingWindow {
        SamplingWindow::from_millis(self.cpu_sample_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs).min(MAX_COMMAND_TIMEOUT)
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.data_dir.join("backups")
    }

    pub fn history_db_path(&self) -> PathBuf {
        self.data_dir.join("history.db")
    }

    pub fn action_log_path(&self) -> PathBuf {
        self.data_dir.join("logs").join("monitor.log")
    }
}
