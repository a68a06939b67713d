use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

use crate::http::parser::Limits;

/// Command-line flags. Each flag can also come from the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "courier")]
#[command(about = "Minimal HTTP/1.1 server with echo, user-agent and file routes")]
#[command(version)]
pub struct Cli {
    /// Directory served by the /files/ routes
    #[arg(long, env = "COURIER_DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:4221
    #[arg(long, env = "LISTEN")]
    pub listen: Option<String>,

    /// Optional YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub files: FilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,

    /// Deadline for receiving a complete request
    pub read_timeout_secs: u64,

    /// Upper bound for the request line plus headers
    pub max_head_bytes: usize,

    /// Upper bound for a declared Content-Length
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub directory: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:4221".to_string(),
            read_timeout_secs: 30,
            max_head_bytes: 64 * 1024,
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_head_bytes: self.max_head_bytes,
            max_body_bytes: self.max_body_bytes,
        }
    }
}

impl Config {
    pub fn from_yaml_str(src: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(src).context("Invalid YAML configuration")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&src)
    }

    /// Resolves the final configuration: defaults, then the YAML file, then
    /// flags (clap has already folded environment variables into them).
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let mut cfg = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(listen) = cli.listen {
            cfg.server.listen_addr = listen;
        }
        if let Some(directory) = cli.directory {
            cfg.files.directory = Some(directory);
        }

        Ok(cfg)
    }
}
