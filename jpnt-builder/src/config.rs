//! Optional `config.toml` layer over the builder's input/output paths,
//! grounded in `legacy::config`'s `Figment::new().merge(Toml::file(..))`
//! pattern. CLI flags passed to [`crate::Args`] take priority over whatever
//! a config file sets; neither source is required on its own.

use std::path::PathBuf;

use figment::{
    providers::{Format, Toml},
    Figment,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct BuilderConfig {
    pub dictionary: Option<PathBuf>,
    pub words: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl BuilderConfig {
    /// Reads `path` if it exists; a missing config file is not an error,
    /// since every field it could supply can also come from the CLI.
    pub fn load(path: &std::path::Path) -> Self {
        if !path.exists() {
            return BuilderConfig::default();
        }
        Figment::new()
            .merge(Toml::file(path))
            .extract()
            .unwrap_or_default()
    }
}
