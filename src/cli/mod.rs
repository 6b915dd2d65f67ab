//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::core::app::{App, AppInitConfig};
use crate::core::chat_request::GeminiBackend;
use crate::core::config::{path_display, Config, ConfigKey};
use crate::core::constants::API_KEY_ENV_VARS;
use crate::ui::chat_loop::run_chat;
use crate::ui::theme::Theme;
use crate::utils::logging::{init_file_logging, init_stderr_logging};
use crate::utils::url::normalize_base_url;

#[derive(Parser)]
#[command(name = "parley")]
#[command(version)]
#[command(about = "A terminal chat interface for the Gemini API")]
#[command(
    long_about = "parley is a full-screen terminal chat interface that sends the whole \
conversation to the Gemini generateContent API and renders replies as Markdown.\n\n\
Environment Variables:\n\
  GEMINI_API_KEY    Your Gemini API key (API_KEY is used as a fallback)\n\
  RUST_LOG          Log filter for --log-file output (default: parley=info)\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a new line\n\
  Up/Down/Mouse     Scroll through chat history\n\
  PageUp/PageDown   Scroll by a page\n\
  Ctrl+L            Clear the conversation\n\
  Esc, Ctrl+C       Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use for chat
    #[arg(short = 'm', long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Override the API base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Color theme (dark or light)
    #[arg(long, value_name = "THEME")]
    pub theme: Option<String>,

    /// Show model replies as plain text
    #[arg(long)]
    pub no_markdown: bool,

    /// Write diagnostic logs to the specified file
    #[arg(short = 'l', long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Send one message, print the reply, and exit
    #[arg(long, value_name = "TEXT")]
    pub once: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect or change the configuration file
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print every setting (default)
    Show,
    /// Set a configuration value
    Set {
        /// One of: model, base_url, theme, markdown
        key: String,
        value: String,
    },
    /// Remove a configuration value, restoring its default
    Unset { key: String },
    /// Print the configuration file location
    Path,
}

#[derive(Debug)]
pub struct MissingApiKey;

impl fmt::Display for MissingApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "No API key found. Set {} in your environment.",
            API_KEY_ENV_VARS.join(" or ")
        )
    }
}

impl Error for MissingApiKey {}

/// Settings for a chat session after merging flags, config, and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub model: String,
    pub base_url: String,
    pub theme: String,
    pub markdown: bool,
}

impl ResolvedSettings {
    /// Command-line flags win over the config file, which wins over defaults.
    pub fn resolve(args: &Args, config: &Config) -> Self {
        let model = args
            .model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| config.model_or_default().to_string());
        let base_url = args
            .base_url
            .as_deref()
            .map(normalize_base_url)
            .unwrap_or_else(|| config.base_url_or_default().to_string());
        let theme = args
            .theme
            .clone()
            .or_else(|| config.theme.clone())
            .unwrap_or_else(|| "dark".to_string());
        let markdown = !args.no_markdown && config.markdown_enabled();

        Self {
            model,
            base_url,
            theme,
            markdown,
        }
    }
}

/// First non-empty key among [`API_KEY_ENV_VARS`], looked up through `lookup`.
pub fn resolve_api_key<F>(lookup: F) -> Result<String, MissingApiKey>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or(MissingApiKey)
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if let Some(Commands::Config { action }) = &args.command {
        return run_config_command(action.as_ref().unwrap_or(&ConfigAction::Show));
    }

    match (&args.log_file, &args.once) {
        (Some(path), _) => init_file_logging(path, args.verbose)?,
        (None, Some(_)) => init_stderr_logging(args.verbose),
        (None, None) => {}
    }

    let config = Config::load()?;
    let settings = ResolvedSettings::resolve(&args, &config);
    let api_key = resolve_api_key(|name| std::env::var(name).ok())?;

    let backend = GeminiBackend::new(
        reqwest::Client::new(),
        settings.base_url.clone(),
        api_key,
        settings.model.clone(),
    );
    info!(model = %settings.model, base_url = %settings.base_url, "Starting parley");

    let mut app = App::new(AppInitConfig {
        backend: Arc::new(backend),
        model: settings.model,
        theme: Theme::from_name(&settings.theme),
        markdown_enabled: settings.markdown,
    });

    match args.once {
        Some(text) => {
            if let Some(reply) = app.send_and_wait(&text).await {
                println!("{}", reply.text());
            }
            Ok(())
        }
        None => run_chat(app).await,
    }
}

fn run_config_command(action: &ConfigAction) -> Result<(), Box<dyn Error>> {
    match action {
        ConfigAction::Show => {
            Config::load()?.print_all();
        }
        ConfigAction::Set { key, value } => {
            let key: ConfigKey = key.parse()?;
            let mut config = Config::load()?;
            config.set(key, value)?;
            config.save()?;
            println!("✅ Set {key}");
        }
        ConfigAction::Unset { key } => {
            let key: ConfigKey = key.parse()?;
            let mut config = Config::load()?;
            config.unset(key);
            config.save()?;
            println!("✅ Unset {key}");
        }
        ConfigAction::Path => {
            println!("{}", path_display(Config::get_config_path()?));
        }
    }
    Ok(())
}
