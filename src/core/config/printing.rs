use crate::core::config::data::{Config, ConfigKey};

impl Config {
    /// `key: value` lines for every setting, with defaults marked.
    pub fn describe(&self) -> Vec<String> {
        ConfigKey::ALL
            .iter()
            .map(|key| {
                let value = match key {
                    ConfigKey::Model => self
                        .model
                        .clone()
                        .unwrap_or_else(|| format!("{} (default)", self.model_or_default())),
                    ConfigKey::BaseUrl => self
                        .base_url
                        .clone()
                        .unwrap_or_else(|| format!("{} (default)", self.base_url_or_default())),
                    ConfigKey::Theme => self
                        .theme
                        .clone()
                        .unwrap_or_else(|| "dark (default)".to_string()),
                    ConfigKey::Markdown => match self.markdown {
                        Some(true) => "on".to_string(),
                        Some(false) => "off".to_string(),
                        None => "on (default)".to_string(),
                    },
                };
                format!("{key}: {value}")
            })
            .collect()
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        for line in self.describe() {
            println!("  {line}");
        }
    }
}
