use core::fmt::{Debug, Display};

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct DatastoreConfig {
    pub project_id: String,
    pub api_key: String,
}

#[derive(Deserialize, Clone)]
pub struct Config {
    pub url: String,
    pub datastore: DatastoreConfig,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

const fn default_page_size() -> usize {
    10
}

#[derive(thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Extract(#[from] figment::Error),
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

pub fn get_config() -> Result<Config, ConfigError> {
    Ok(Figment::new()
        .merge(Toml::file("volunteer-hub.toml"))
        .merge(Env::prefixed("VOLUNTEER_HUB_").split("__"))
        .extract()?)
}

#[cfg(test)]
mod tests {
    use figment::providers::{Format, Toml};
    use figment::Figment;

    use crate::Config;

    #[test]
    fn page_size_defaults_to_ten() {
        let config: Config = Figment::new()
            .merge(Toml::string(
                r#"
                url = "https://hub.example"

                [datastore]
                project_id = "volunteer-hub-test"
                api_key = "test-key"
                "#,
            ))
            .extract()
            .unwrap();
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn page_size_can_be_overridden() {
        let config: Config = Figment::new()
            .merge(Toml::string(
                r#"
                url = "https://hub.example"
                page_size = 25

                [datastore]
                project_id = "volunteer-hub-test"
                api_key = "test-key"
                "#,
            ))
            .extract()
            .unwrap();
        assert_eq!(config.page_size, 25);
    }
}
