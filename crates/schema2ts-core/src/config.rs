use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SCHEMA_URL: &str = "https://melvoridle.com/assets/schema/gameData.json";
pub const DEFAULT_SCHEMA_PATH: &str = "schema/gameData.json";
pub const DEFAULT_DECLARATION_PATH: &str = "types/schema/gameData.d.ts";

/// HTTP transfer parameters (optional `[fetch]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Seconds allowed for the TCP/TLS connect phase.
    pub connect_timeout_secs: u64,
    /// Upper bound on the whole transfer in seconds.
    pub timeout_secs: u64,
    /// Abort when throughput stays below 1 KiB/s for this many seconds.
    pub low_speed_time_secs: u64,
    /// Follow 3xx responses.
    pub follow_redirects: bool,
    /// Maximum number of redirects followed when `follow_redirects` is set.
    pub max_redirections: u32,
    /// Optional User-Agent header (None = libcurl sends none).
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 600,
            low_speed_time_secs: 60,
            follow_redirects: true,
            max_redirections: 10,
            user_agent: Some(format!("schema2ts/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

/// Declaration output options (optional `[compile]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileConfig {
    /// Comment placed verbatim at the top of every generated file. Empty = none.
    pub banner_comment: String,
    /// Emit `[k: string]: unknown;` on objects that do not set `additionalProperties`.
    pub additional_properties: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            banner_comment: "/* eslint-disable */\n/**\n * This file was automatically generated by schema2ts.\n * DO NOT MODIFY IT BY HAND. Instead, modify the source JSON Schema file,\n * and run schema2ts to regenerate this file.\n */".to_string(),
            additional_properties: true,
        }
    }
}

/// Global configuration loaded from `~/.config/schema2ts/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema2tsConfig {
    /// URL used when no positional URL is given.
    pub schema_url: String,
    /// Cache location for the downloaded schema when none is given.
    pub schema_path: PathBuf,
    /// Output location for declarations when none is given.
    pub declaration_path: PathBuf,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub compile: CompileConfig,
}

impl Default for Schema2tsConfig {
    fn default() -> Self {
        Self {
            schema_url: DEFAULT_SCHEMA_URL.to_string(),
            schema_path: PathBuf::from(DEFAULT_SCHEMA_PATH),
            declaration_path: PathBuf::from(DEFAULT_DECLARATION_PATH),
            fetch: FetchConfig::default(),
            compile: CompileConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("schema2ts")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<Schema2tsConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = Schema2tsConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    read_config(&path)
}

/// Load configuration from disk if the file exists. Never creates anything.
pub fn load_existing() -> Result<Option<Schema2tsConfig>> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("schema2ts")?;
    match xdg_dirs.find_config_file("config.toml") {
        Some(path) => read_config(&path).map(Some),
        None => Ok(None),
    }
}

fn read_config(path: &Path) -> Result<Schema2tsConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: Schema2tsConfig = toml::from_str(&data)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
    Ok(cfg)
}
