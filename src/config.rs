use anyhow::{Context, Result, ensure};
use contrailkit::Dispatcher;
use contrailkit::transport::http::{DEFAULT_TIMEOUT, DEFAULT_URL, HttpTransport};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::ControllerArgs;

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("contrail"))
}

/// Get the default config file path
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

// ============================================================================
// Controller Config
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Controller API root, e.g. http://controller:8082
    pub url: String,
    /// Keystone token sent as X-Auth-Token
    pub token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    /// Load config from an explicit path, or from the default location.
    ///
    /// A missing default config file yields the defaults; a missing
    /// explicit one is an error.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(&expand(path)),
            None => {
                let path = config_path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    log::debug!("No config at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Parse TOML config content
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Invalid config format")?;
        config.validate()
    }

    /// Load config and apply overrides, rejecting unusable values
    pub fn resolve(args: &ControllerArgs) -> Result<Self> {
        Self::load(args.config.as_deref())?
            .with_overrides(args)
            .validate()
    }

    fn validate(self) -> Result<Self> {
        ensure!(
            self.timeout_secs > 0,
            "Timeout must be at least 1 second (got {})",
            self.timeout_secs
        );
        Ok(self)
    }

    /// Apply command-line and environment overrides
    pub fn with_overrides(mut self, args: &ControllerArgs) -> Self {
        if let Some(url) = &args.url {
            self.url = url.clone();
        }
        if let Some(token) = &args.token {
            self.token = Some(token.clone());
        }
        if let Some(timeout) = args.timeout {
            self.timeout_secs = timeout;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the HTTP transport for this controller
    pub fn transport(&self) -> HttpTransport {
        let transport = HttpTransport::with_timeout(&self.url, self.timeout());
        match &self.token {
            Some(token) => transport.token(token),
            None => transport,
        }
    }
}

/// Resolve config from file and overrides, and build a dispatcher
pub fn connect(args: &ControllerArgs) -> Result<Dispatcher> {
    let config = Config::resolve(args)?;
    log::info!("Using controller at {}", config.url);
    Ok(Dispatcher::new(Box::new(config.transport())))
}
