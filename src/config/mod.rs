use anyhow::{Context, anyhow};
use serde::Deserialize;
use std::path::PathBuf;

mod logs_config;
mod server_config;
mod storage_config;

pub use logs_config::LogsConfig;
pub use server_config::ServerConfig;
pub use storage_config::StorageConfig;

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logs: LogsConfig,
}

/// Base directory for relative paths in the configuration.
pub fn root_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn parse_config_path(mut args: impl Iterator<Item = String>) -> anyhow::Result<Option<PathBuf>> {
    while let Some(arg) = args.next() {
        if arg == "-c" || arg == "--config" {
            return match args.next() {
                Some(path) => Ok(Some(PathBuf::from(path))),
                None => Err(anyhow!("Please specify path string for {arg} argument.")),
            };
        }
    }
    Ok(None)
}

/// Loads the file given by `-c <config_file>`, or the built-in defaults when
/// no file is given.
pub fn load() -> anyhow::Result<Config> {
    match parse_config_path(std::env::args().skip(1))? {
        Some(path) => load_from(&path),
        None => Ok(Config::default()),
    }
}

pub fn load_from(path: &std::path::Path) -> anyhow::Result<Config> {
    if !path.is_file() {
        return Err(anyhow!(
            "Configuration file not found or invalid.\n\
        Please make sure that the configuration file exists and is a valid TOML file.\n\
        Expected file path: {:?}",
            path
        ));
    }
    let content = std::fs::read_to_string(path).with_context(|| {
        "Failed to read configuration file.\n\
        Please check the file path and file permissions, and make sure the file is valid accessible"
    })?;
    parse(&content)
}

fn parse(content: &str) -> anyhow::Result<Config> {
    toml::from_str(content).with_context(|| {
        "Failed to parse configuration file.\n\
        Please check the file syntax is valid TOML syntax"
    })
}
