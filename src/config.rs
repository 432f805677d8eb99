use std::path::{Path, PathBuf};

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::description::Format;
use crate::locale;

pub const DEFAULT_INSTANCE: &str = "http://localhost:3000";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub instance: Option<String>,
    pub token: Option<String>,
    pub locale: Option<String>,
    pub region: Option<String>,
    pub default_format: Option<String>,
    pub description_format: Option<Format>,
}

impl Config {
    /// Load config from ~/.config/ivx/config.toml if it exists
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    /// Instance base URL: flag, then IVX_INSTANCE, then config, then the default
    pub fn instance(&self, flag: Option<&str>) -> String {
        pick(flag, env_var("IVX_INSTANCE"), self.instance.as_deref()).unwrap_or_else(|| DEFAULT_INSTANCE.to_string())
    }

    /// API token: IVX_TOKEN, then config
    pub fn token(&self) -> Option<String> {
        pick(None, env_var("IVX_TOKEN"), self.token.as_deref())
    }

    /// Supported locale for `hl`: flag, IVX_LOCALE, config, then the system locale
    pub fn locale(&self, flag: Option<&str>) -> &'static str {
        let preferred = pick(flag, env_var("IVX_LOCALE"), self.locale.as_deref()).or_else(locale::from_env);
        locale::resolve(preferred.as_deref().unwrap_or(locale::DEFAULT))
    }

    pub fn description_format(&self) -> Format {
        self.description_format.unwrap_or_default()
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ivx")
        .join("config.toml")
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn pick(flag: Option<&str>, env: Option<String>, file: Option<&str>) -> Option<String> {
    let non_empty = |v: &String| !v.trim().is_empty();
    flag.map(str::to_string)
        .filter(non_empty)
        .or(env.filter(non_empty))
        .or_else(|| file.map(str::to_string).filter(non_empty))
}
