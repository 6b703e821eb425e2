pub mod darkness;
pub mod logging;
pub mod mail;
pub mod observer;
pub mod services;

use std::time::Duration;

use serde::{ Deserialize, Deserializer, de::Unexpected };
use thiserror::Error;
use config_rs::{ self, builder::DefaultState, ConfigBuilder, Environment, File, FileFormat };

use darkness::Darkness;
use logging::Logging;
use mail::Mail;
use observer::Observer;
use services::Services;

const CONFIGS: &[&str] = &["spotter.toml"];
const ENV_PREFIX: &str = "SPOTTER";

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("loading config failed. {0}")]
    Build(#[from] config_rs::ConfigError),

    #[error("environment variable {0} is not set.")]
    MissingCredential(&'static str),
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub observer: Observer,
    pub services: Services,
    pub mail: Mail,
    pub darkness: Darkness,
    pub logging: Logging,
}

impl Config {
    /// Embedded defaults, then `spotter.toml` if present, then
    /// `SPOTTER_<SECTION>__<KEY>` environment variables.
    pub fn load() -> Result<Config, ConfigurationError> {
        let mut builder = defaults();
        for s in CONFIGS {
            builder = builder.add_source(File::with_name(s).required(false));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
        );
        Ok(builder.build()?.try_deserialize::<Config>()?)
    }
}

fn defaults() -> ConfigBuilder<DefaultState> {
    config_rs::Config::builder()
        .add_source(File::from_str(include_str!("defaults/observer.toml"), FileFormat::Toml))
        .add_source(File::from_str(include_str!("defaults/services.toml"), FileFormat::Toml))
        .add_source(File::from_str(include_str!("defaults/mail.toml"), FileFormat::Toml))
        .add_source(File::from_str(include_str!("defaults/darkness.toml"), FileFormat::Toml))
        .add_source(File::from_str(include_str!("defaults/logging.toml"), FileFormat::Toml))
}

/// Seconds as a float, strictly positive.
fn deserialize_timeout<'de, D>(d: D) -> Result<Duration, D::Error> where D: Deserializer<'de> {
    let value = f64::deserialize(d)?;
    if value.is_finite() && value > 0.0 { Ok(Duration::from_secs_f64(value)) }
    else { Err(serde::de::Error::invalid_value(Unexpected::Float(value), &"greater than zero. (timeout)")) }
}

#[cfg(test)]
pub(crate) fn from_toml(overrides: &str) -> Result<Config, ConfigurationError> {
    Ok(defaults()
        .add_source(File::from_str(overrides, FileFormat::Toml))
        .build()?
        .try_deserialize::<Config>()?)
}
