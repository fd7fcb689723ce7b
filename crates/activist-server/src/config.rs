use activist_egress::ChatConfig;
use activist_routing::HostConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Reserved admin and root hostnames
    #[serde(default)]
    pub hosts: HostConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the tenant file
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Reload tenants when the file changes on disk
    #[serde(default = "default_true")]
    pub watch: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default = "default_false")]
    pub json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            hosts: HostConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            watch: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents)?
        } else {
            // Default to YAML
            serde_yaml::from_str(&contents)?
        };

        Ok(config)
    }

    /// Merge environment variables into config (env vars take precedence)
    pub fn merge_env(&mut self) {
        // Server settings
        if let Ok(val) = std::env::var("ACTIVIST_HOST") {
            self.host = val;
        }

        if let Ok(val) = std::env::var("ACTIVIST_PORT") {
            match val.parse::<u16>() {
                Ok(port) => self.port = port,
                Err(_) => eprintln!("Warning: Invalid ACTIVIST_PORT '{}', keeping {}", val, self.port),
            }
        }

        // Logging settings
        if let Ok(val) = std::env::var("ACTIVIST_LOG_LEVEL") {
            self.logging.level = val;
        }

        if let Ok(val) = std::env::var("ACTIVIST_LOG_JSON")
            && let Ok(json) = val.parse::<bool>()
        {
            self.logging.json = json;
        }

        // Storage
        if let Ok(val) = std::env::var("ACTIVIST_DATA_DIR") {
            self.storage.data_dir = val;
        }

        // Reserved hosts
        if let Ok(val) = std::env::var("ACTIVIST_ADMIN_HOST") {
            self.hosts.admin_host = val;
        }

        if let Ok(val) = std::env::var("ACTIVIST_ROOT_HOST") {
            self.hosts.root_host = val;
        }

        // Chat backend
        if let Ok(val) = std::env::var("ACTIVIST_CHAT_ENDPOINT") {
            self.chat.endpoint = Some(val);
        }

        if let Ok(val) = std::env::var("ACTIVIST_CHAT_API_KEY") {
            self.chat.api_key = Some(val);
        }
    }

    /// Data directory with `~` and environment variables expanded.
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::full(&self.storage.data_dir).map_or_else(
            |_| self.storage.data_dir.clone(),
            |expanded| expanded.into_owned(),
        ))
    }

    /// Host config with both names normalized.
    pub fn host_config(&self) -> HostConfig {
        HostConfig::new(&self.hosts.admin_host, &self.hosts.root_host)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> String {
    "~/.activist".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}
