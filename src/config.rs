use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::FTP_BUF_SIZE;

#[derive(Debug, Deserialize, Serialize)]
pub struct ServerConfig {
    pub listen_port: u16,
    pub pasv_address: String,
    /// First data port; slot `n` listens on `data_port_base + n` in passive mode.
    pub data_port_base: u16,
    /// Number of worker slots, the hard cap on concurrent sessions.
    pub max_clients: usize,
    pub username: String,
    pub password: String,
    pub chroot_dir: String,
    pub log_dir: String,
    pub login_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
    pub transfer_buffer_size: Option<usize>, // Optional to allow default value
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_port: 21,
            pasv_address: String::from("0.0.0.0"),
            data_port_base: 55600,
            max_clients: 5,
            username: String::from("stm32"),
            password: String::from("chibi"),
            chroot_dir: String::from("/var/ftp"),
            log_dir: String::from("/var/ftp/log"),
            login_timeout_secs: Some(10),
            idle_timeout_secs: Some(10 * 60),
            transfer_buffer_size: Some(FTP_BUF_SIZE),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))?;
        Ok(config)
    }

    /// Window allowed for each of the USER and PASS lines.
    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.server.login_timeout_secs.unwrap_or(10))
    }

    /// Idle window on the control connection once authenticated.
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.server.idle_timeout_secs.unwrap_or(10 * 60))
    }

    pub fn transfer_buffer_size(&self) -> usize {
        self.server.transfer_buffer_size.unwrap_or(FTP_BUF_SIZE)
    }
}
