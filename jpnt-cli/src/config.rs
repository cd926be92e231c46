//! Optional `config.toml` layer over the runtime conversion settings,
//! grounded in `legacy::config`'s `Figment::new().merge(Toml::file(..))`
//! pattern.

use std::path::PathBuf;

use figment::{
    providers::{Format, Toml},
    Figment,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    pub dictionary: Option<PathBuf>,
    pub segment: Option<bool>,
}

impl CliConfig {
    pub fn load(path: &std::path::Path) -> Self {
        if !path.exists() {
            return CliConfig::default();
        }
        Figment::new()
            .merge(Toml::file(path))
            .extract()
            .unwrap_or_default()
    }
}
