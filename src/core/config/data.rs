use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::constants::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::ui::theme::BUILTIN_THEME_NAMES;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Gemini model id (e.g., "gemini-2.5-flash")
    pub model: Option<String>,
    /// API root, for proxies or local gateways
    pub base_url: Option<String>,
    /// UI theme name ("dark" or "light")
    pub theme: Option<String>,
    /// Render model replies as markdown
    pub markdown: Option<bool>,
}

impl Config {
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn base_url_or_default(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn markdown_enabled(&self) -> bool {
        self.markdown.unwrap_or(true)
    }

    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("a value is required for {key}"));
        }
        match key {
            ConfigKey::Model => self.model = Some(value.to_string()),
            ConfigKey::BaseUrl => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(format!("base-url must start with http:// or https://: {value}"));
                }
                self.base_url = Some(value.to_string());
            }
            ConfigKey::Theme => {
                let name = value.to_ascii_lowercase();
                if !BUILTIN_THEME_NAMES.contains(&name.as_str()) {
                    return Err(format!(
                        "unknown theme '{value}' (available: {})",
                        BUILTIN_THEME_NAMES.join(", ")
                    ));
                }
                self.theme = Some(name);
            }
            ConfigKey::Markdown => self.markdown = Some(parse_toggle(value)?),
        }
        Ok(())
    }

    pub fn unset(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::Model => self.model = None,
            ConfigKey::BaseUrl => self.base_url = None,
            ConfigKey::Theme => self.theme = None,
            ConfigKey::Markdown => self.markdown = None,
        }
    }
}

/// Keys accepted by `parley config set|unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Model,
    BaseUrl,
    Theme,
    Markdown,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::Model,
        ConfigKey::BaseUrl,
        ConfigKey::Theme,
        ConfigKey::Markdown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Model => "model",
            ConfigKey::BaseUrl => "base-url",
            ConfigKey::Theme => "theme",
            ConfigKey::Markdown => "markdown",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "model" => Ok(ConfigKey::Model),
            "base-url" => Ok(ConfigKey::BaseUrl),
            "theme" => Ok(ConfigKey::Theme),
            "markdown" => Ok(ConfigKey::Markdown),
            other => Err(format!(
                "unknown config key '{other}' (expected one of: {})",
                ConfigKey::ALL.map(ConfigKey::as_str).join(", ")
            )),
        }
    }
}

fn parse_toggle(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(format!("expected on/off, got '{value}'")),
    }
}

/// Render a path for display, abbreviating the home directory to `~`.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
