//! Shipper configuration stored at `~/.shipper.toml`.
//!
//! The file holds a single `[application]` table:
//!
//! ```toml
//! [application]
//! server = "https://tanker.example.com"
//! accessKey = "..."
//! ```
//!
//! An empty server and access key means shipper is not installed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".shipper.toml";

/// Owner read/write only; the file carries a credential.
pub const CONFIG_FILE_MODE: u32 = 0o600;

/// Server address and access key of an installed shipper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub server: String,
    pub access_key: String,
}

impl Config {
    pub fn new(server: impl Into<String>, access_key: impl Into<String>) -> Self {
        Config {
            server: server.into(),
            access_key: access_key.into(),
        }
    }

    /// True when neither field is set, i.e. shipper is not installed.
    pub fn is_empty(&self) -> bool {
        self.server.is_empty() && self.access_key.is_empty()
    }
}

#[derive(Serialize, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    application: Application,
}

#[derive(Serialize, Deserialize, Default)]
struct Application {
    #[serde(default)]
    server: String,
    #[serde(default, rename = "accessKey")]
    access_key: String,
}

/// Path to `~/.shipper.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        Error::io(
            "locate",
            "home directory",
            std::io::Error::new(std::io::ErrorKind::NotFound, "HOME is not set"),
        )
    })?;
    Ok(home.join(CONFIG_FILE_NAME))
}

/// Render the config file contents for a server/access key pair.
pub fn render(server: &str, access_key: &str) -> Result<String> {
    let file = ConfigFile {
        application: Application {
            server: server.to_string(),
            access_key: access_key.to_string(),
        },
    };
    Ok(toml::to_string(&file)?)
}

/// Parse config file contents. Missing keys are treated as empty.
pub fn parse(path: &Path, contents: &str) -> Result<Config> {
    let file: ConfigFile = toml::from_str(contents).map_err(|source| Error::InvalidConfig {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Config::new(file.application.server, file.application.access_key))
}

/// Load the config at `path`, returning an empty config if the file is missing.
pub fn load(path: &Path) -> Result<Config> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse(path, &contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(Error::io("read", path, e)),
    }
}
