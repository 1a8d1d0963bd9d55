mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    let mut config = load_file(&config_path).await?;
    apply_env_overrides(&mut config, |key| env::var(key).ok())?;
    Ok(config)
}

/// Parses the YAML file at `path`, falling back to defaults when it does not exist.
pub async fn load_file(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    if !tokio::fs::try_exists(path).await? {
        debug!("No configuration file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    debug!("Loading configuration from: {}", path.display());

    let config_str = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

/// Lets deployment secrets and addresses come from the environment.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(endpoint_id) = lookup("RUNPOD_ENDPOINT_ID") {
        config.runpod.endpoint_id = endpoint_id;
    }
    if let Some(api_key) = lookup("RUNPOD_API_KEY") {
        config.runpod.api_key = api_key;
    }
    if let Some(base_url) = lookup("RUNPOD_BASE_URL") {
        config.runpod.base_url = base_url;
    }
    if let Some(host) = lookup("HOST") {
        config.server.host = host;
    }
    if let Some(port) = lookup("PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| Error::config(format!("Invalid PORT value: '{}'", port)))?;
    }
    Ok(())
}
