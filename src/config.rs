use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Connection settings for the hosted store. `email`/`password` are
/// optional; when both are present the app signs in without showing the
/// auth screen.
#[derive(Clone, Debug)]
pub struct Config {
    pub supabase_url: String,
    pub anon_key: String,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
struct FileConfig {
    supabase_url: Option<String>,
    anon_key: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("SUPABASE_URL is not set and the config file has no supabase_url")]
    MissingUrl,
    #[error("SUPABASE_ANON_KEY is not set and the config file has no anon_key")]
    MissingKey,
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taskdeck-tui").join("config.toml"))
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

/// Environment variables win over the config file, so a `.env` next to the
/// binary can point an existing setup at another project.
pub fn load() -> Result<Config, ConfigError> {
    let file = match config_path() {
        Some(path) if path.exists() => {
            let display = path.display().to_string();
            let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: display.clone(),
                source,
            })?;
            parse(&raw).map_err(|source| ConfigError::Parse {
                path: display,
                source,
            })?
        }
        _ => FileConfig::default(),
    };

    let supabase_url = env_var("SUPABASE_URL")
        .or(file.supabase_url)
        .ok_or(ConfigError::MissingUrl)?;
    let anon_key = env_var("SUPABASE_ANON_KEY")
        .or(file.anon_key)
        .ok_or(ConfigError::MissingKey)?;

    Ok(Config {
        supabase_url: supabase_url.trim_end_matches('/').to_string(),
        anon_key,
        email: env_var("TASKDECK_EMAIL").or(file.email),
        password: env_var("TASKDECK_PASSWORD").or(file.password),
    })
}

fn parse(raw: &str) -> Result<FileConfig, toml::de::Error> {
    toml::from_str(raw)
}
