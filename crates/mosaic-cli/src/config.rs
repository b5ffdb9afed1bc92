use config::{Config as ConfigLoader, ConfigError, Environment, File};
use mosaic_client::{BackendConfig, ImageSettings, Settings};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub snapshot_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("data/threads.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Send-time options as written in TOML
///
/// Keys are snake_case here because config sources lowercase everything;
/// they are mapped onto the backend's camelCase [`Settings`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    pub model: String,
    pub temperature: f32,
    pub enable_rag: bool,
    pub enable_agent: bool,
    pub enable_streaming: bool,
    pub detailed_analysis: bool,
    pub image: ImageSettingsConfig,
    pub enabled_tools: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageSettingsConfig {
    pub model: String,
    pub size: String,
    pub quality: String,
    pub style: String,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            model: settings.model,
            temperature: settings.temperature,
            enable_rag: settings.enable_rag,
            enable_agent: settings.enable_agent,
            enable_streaming: settings.enable_streaming,
            detailed_analysis: settings.detailed_analysis,
            image: ImageSettingsConfig::default(),
            enabled_tools: settings.enabled_tools,
        }
    }
}

impl Default for ImageSettingsConfig {
    fn default() -> Self {
        let image = ImageSettings::default();
        Self {
            model: image.model,
            size: image.size,
            quality: image.quality,
            style: image.style,
        }
    }
}

impl From<SettingsConfig> for Settings {
    fn from(config: SettingsConfig) -> Self {
        Self {
            model: config.model,
            temperature: config.temperature.clamp(0.0, 2.0),
            enable_rag: config.enable_rag,
            enable_agent: config.enable_agent,
            enable_streaming: config.enable_streaming,
            image_settings: ImageSettings {
                model: config.image.model,
                size: config.image.size,
                quality: config.image.quality,
                style: config.image.style,
            },
            detailed_analysis: config.detailed_analysis,
            enabled_tools: config.enabled_tools,
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. MOSAIC_SECTION__KEY variables (e.g. MOSAIC_SETTINGS__MODEL)
    /// 4. BACKEND_BASE_URL, STORE_SNAPSHOT_PATH, LOG_LEVEL, LOG_FORMAT
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            // 1. Load default config
            .add_source(File::with_name("config/default").required(false))
            // 2. Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // 3. Nested overrides for any key
            .add_source(
                Environment::with_prefix("MOSAIC")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // 4. Short names for the common ones
            .set_override_option("backend.base_url", std::env::var("BACKEND_BASE_URL").ok())?
            .set_override_option("store.snapshot_path", std::env::var("STORE_SNAPSHOT_PATH").ok())?
            .set_override_option("logging.level", std::env::var("LOG_LEVEL").ok())?
            .set_override_option("logging.format", std::env::var("LOG_FORMAT").ok())?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder()
            .add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }
}
