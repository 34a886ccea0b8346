use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};

use crate::config::AppConfig;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration by merging the TOML file with `TAPEWATCH_`
    /// environment overrides. Every option has a default, so a missing
    /// file is fine.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from("config/Config.toml")
    }

    /// Loads configuration from a specific TOML path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be parsed.
    pub fn load_from(path: &str) -> Result<AppConfig> {
        let config: AppConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("TAPEWATCH_"))
            .extract()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_aliases_extract() {
        let config: AppConfig = Figment::new()
            .merge(Toml::string(
                r#"
                MT = 12
                DMT = 3
                NSD = 2.5
                WATCH = "SPY"
                "#,
            ))
            .extract()
            .unwrap();
        assert_eq!(config.stop_poll_secs, 12);
        assert_eq!(config.detect_interval_secs, 3);
        assert!((config.stdev_multiplier - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.watchlist, "SPY");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ConfigLoader::load_from("config/does-not-exist.toml").unwrap();
        assert_eq!(config.detect_interval_secs, 5);
    }
}
