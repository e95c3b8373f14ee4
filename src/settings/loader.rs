//! Settings loading
//!
//! Layers, lowest priority first: the embedded `config/default.toml`, the
//! profile file `config/{DUELBENCH_ENV}`, `config/local`, then `DUELBENCH_*`
//! environment variables (`__` between nested keys, e.g.
//! `DUELBENCH_MODEL__SAMPLES=3`).

use super::AppConfig;
use anyhow::{bail, Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

const ENV_PREFIX: &str = "DUELBENCH";
const DEFAULT_PROFILE: &str = "development";

fn layered(profile: &str) -> ConfigBuilder<DefaultState> {
    Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        .add_source(File::with_name(&format!("config/{profile}")).required(false))
        .add_source(File::with_name("config/local").required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig> {
    let config: AppConfig = builder
        .build()
        .context("Failed to build configuration")?
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    if config.model.id.trim().is_empty() {
        bail!("model.id must not be empty");
    }
    if config.model.samples == 0 {
        bail!("model.samples must be at least 1");
    }
    Ok(config)
}

/// Load settings for the profile named by `DUELBENCH_ENV`
pub fn load_config() -> Result<AppConfig> {
    let profile = std::env::var("DUELBENCH_ENV").unwrap_or_else(|_| DEFAULT_PROFILE.to_string());
    finish(layered(&profile))
}
