use serde::Deserialize;
use std::fs;
use std::path::Path;

const ENV_CONFIG_PATH: &str = "MARKET_INTEL_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const DEFAULT_ORACLE_BASE_URL: &str = "https://api.perplexity.ai";
const DEFAULT_ORACLE_MODEL: &str = "sonar";
const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 60;

const DEFAULT_SERP_BASE_URL: &str = "https://serpapi.com/search";
const DEFAULT_SERP_LOCATION: &str = "United States";
const DEFAULT_SERP_MAX_KEYWORDS: usize = 50;

/// Knowledge oracle (Perplexity Sonar) settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ORACLE_BASE_URL.to_string(),
            model: DEFAULT_ORACLE_MODEL.to_string(),
            timeout_secs: DEFAULT_ORACLE_TIMEOUT_SECS,
        }
    }
}

/// SERP keyword discovery settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SerpConfig {
    pub base_url: String,
    /// Google location used for every SERP query
    pub location: String,
    /// Cap on keywords harvested per aggregation run
    pub max_keywords: usize,
}

impl Default for SerpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERP_BASE_URL.to_string(),
            location: DEFAULT_SERP_LOCATION.to_string(),
            max_keywords: DEFAULT_SERP_MAX_KEYWORDS,
        }
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub serp: SerpConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub oracle: OracleConfig,
    pub serp: SerpConfig,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            oracle: OracleConfig::default(),
            serp: SerpConfig::default(),
            port: 8080,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let config_path = std::env::var(ENV_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let file = Self::load_config_file(&config_path).unwrap_or_default();

        Self {
            oracle: file.oracle,
            serp: file.serp,
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents, path),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    fn parse(contents: &str, path: &Path) -> Option<ConfigFile> {
        let contents = contents.trim();
        if contents.is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Some(ConfigFile::default());
        }

        match serde_yaml::from_str(contents) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "Loaded configuration from file");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
