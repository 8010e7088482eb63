use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Looked up (without extension) relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config/settings";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub store: StoreConfig,
    pub report: ReportConfig,
    pub grid: GridConfig,
    pub login: LoginConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    pub url: String,
    pub anon_key: String,
    pub table: String,
    pub timeout_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            table: "employees".to_string(),
            timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ReportConfig {
    /// Row cap of the "recent activity" fallback report.
    pub recent_limit: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { recent_limit: 500 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct GridConfig {
    pub page_length: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { page_length: 8 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoginConfig {
    pub demo_code: String,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            demo_code: "1234".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    pub preferences_path: PathBuf,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            preferences_path: PathBuf::from(".staffdesk/preferences.toml"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` wins when set.
    pub level: String,
    pub directory: PathBuf,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,staffdesk_core=debug,staffdesk_store=debug".to_string(),
            directory: PathBuf::from("logs"),
            format: LogFormat::Pretty,
        }
    }
}

/// The two store values the original deployment supplied through its build
/// environment.
#[derive(Debug, Clone, Default)]
pub struct StoreCredentials {
    pub url: Option<String>,
    pub anon_key: Option<String>,
}

impl StoreCredentials {
    pub fn from_env() -> Self {
        Self {
            url: first_env(&["SUPABASE_URL", "VITE_SUPABASE_URL"]),
            anon_key: first_env(&["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"]),
        }
    }
}

fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Reads `.env`, then the config file (`config/settings.*` when `file` is
    /// `None`, optional), then `APP__SECTION__KEY` variables, then the store
    /// credential variables.
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::build(file, StoreCredentials::from_env())
    }

    pub fn build(file: Option<&Path>, credentials: StoreCredentials) -> Result<Self> {
        let builder = match file {
            Some(path) => Config::builder().add_source(File::from(path).required(true)),
            None => Config::builder().add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let config = builder
            // Example: APP__STORE__TABLE=employees_staging
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("store.url", credentials.url)?
            .set_override_option("store.anon_key", credentials.anon_key)?
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.grid.page_length == 0 {
            anyhow::bail!("grid.page_length must be at least 1");
        }

        if self.report.recent_limit == 0 {
            anyhow::bail!("report.recent_limit must be at least 1");
        }

        let code = &self.login.demo_code;
        if code.len() != 4 || !code.chars().all(|c| c.is_ascii_digit()) {
            anyhow::bail!("login.demo_code must be exactly four digits, got {:?}", code);
        }

        Ok(())
    }

    /// Whether both store values are present. Missing values are not an
    /// error; every store call will fail instead.
    pub fn store_configured(&self) -> bool {
        !self.store.url.trim().is_empty() && !self.store.anon_key.trim().is_empty()
    }
}
