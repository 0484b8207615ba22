use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

/// Environment variable naming an optional YAML configuration file.
pub const CONFIG_ENV: &str = "DOCSERVER_CONFIG";

/// Environment variable overriding `server.listen_addr`.
pub const LISTEN_ENV: &str = "LISTEN";

/// Immutable server configuration, loaded once at startup and shared with
/// the accept loop and every connection worker.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub documents: DocumentConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the listener binds to.
    pub listen_addr: String,
    /// Upper bound on connections processed at once. `None` means one worker
    /// per accepted connection with no cap.
    pub max_connections: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            max_connections: None,
        }
    }
}

/// Where documents live and which resources have special meaning.
///
/// Request targets are resolved against the parent of `root`, so with the
/// default `root` of `doc` a request for `/doc/a.html` maps to `doc/a.html`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Directory every servable or writable resource must live under.
    pub root: PathBuf,
    /// Resource served for an empty target.
    pub index: PathBuf,
    /// Body substituted into GET 404 responses, when the file exists.
    pub error_page: Option<PathBuf>,
    /// Target that accepts form posts instead of file writes.
    pub form_action: Option<String>,
    /// Directory that receives generated user pages.
    pub users_dir: PathBuf,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("doc"),
            index: PathBuf::from("doc/index.html"),
            error_page: Some(PathBuf::from("doc/404.html")),
            form_action: Some("HandleRequest".to_string()),
            users_dir: PathBuf::from("doc/users"),
        }
    }
}

impl Config {
    /// Loads the configuration from the file named by `DOCSERVER_CONFIG`, or
    /// defaults if unset, then applies the `LISTEN` override.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            std::env::var(LISTEN_ENV).ok(),
        )
    }

    /// Same as [`Config::load`], with the environment values passed in.
    pub fn load_from(path: Option<PathBuf>, listen_addr: Option<String>) -> anyhow::Result<Self> {
        let mut cfg = match path {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                Self::from_yaml(&text)
                    .with_context(|| format!("parsing config file {}", path.display()))?
            }
            None => Self::default(),
        };

        if let Some(addr) = listen_addr {
            cfg.server.listen_addr = addr;
        }

        Ok(cfg)
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        // An empty document deserializes to unit, not to a mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg = serde_yaml::from_str(text)?;
        Ok(cfg)
    }
}
