use redact_core::{AcceptList, FilenamePolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the redact client, TUI and reference service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub accept: AcceptConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Absolute URL of the redaction endpoint
    #[serde(default = "default_redact_url")]
    pub redact_url: String,

    /// Base URL of the admin API
    #[serde(default = "default_admin_url")]
    pub admin_url: String,

    /// Request timeout; 0 disables it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub filename_policy: FilenamePolicy,

    /// Where redacted files are saved
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    /// Used only when `admin_password_hash` is empty
    #[serde(default = "default_admin_password")]
    pub admin_password: String,

    /// Argon2 PHC string
    #[serde(default)]
    pub admin_password_hash: String,

    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptConfig {
    #[serde(default = "AcceptList::default_patterns")]
    pub patterns: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            redact_url: default_redact_url(),
            admin_url: default_admin_url(),
            timeout_secs: default_timeout_secs(),
            filename_policy: FilenamePolicy::default(),
            download_dir: default_download_dir(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
            admin_password_hash: String::new(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

impl Default for AcceptConfig {
    fn default() -> Self {
        Self {
            patterns: AcceptList::default_patterns(),
        }
    }
}

fn default_redact_url() -> String {
    "http://127.0.0.1:5000/redact".to_string()
}

fn default_admin_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_download_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "change-me".to_string()
}

fn default_session_ttl_secs() -> u64 {
    8 * 60 * 60
}

impl ClientConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl ServerConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AcceptConfig {
    pub fn accept_list(&self) -> AcceptList {
        AcceptList::new(self.patterns.clone())
    }
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path, writing defaults if it is missing
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(path, content)?;
            Ok(config)
        }
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = Self::project_dirs() {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.redact/config.toml")
        }
    }

    /// Get default database path
    pub fn data_path() -> PathBuf {
        if let Some(dirs) = Self::project_dirs() {
            dirs.data_dir().join("redact.db")
        } else {
            PathBuf::from("~/.redact/redact.db")
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "justredact", "redact")
    }
}
