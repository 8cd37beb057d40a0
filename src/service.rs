//! Install, uninstall and upload lifecycle.
//!
//! The service owns the in-process [`Config`] and drives the remote client and
//! the filesystem through their traits. Every operation validates its inputs
//! before the first side effect, so a validation failure never changes state.
//!
//! | state       | install | uninstall   | upload    |
//! |-------------|---------|-------------|-----------|
//! | uninstalled | -> installed | error  | error     |
//! | installed   | error   | -> uninstalled | stays  |

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::client::RemoteClient;
use crate::config::{self, Config, CONFIG_FILE_MODE};
use crate::fs::FileSystem;
use crate::{Error, Result};

pub struct Service<C, F> {
    config: Config,
    config_path: PathBuf,
    client: C,
    fs: F,
}

impl<C: RemoteClient, F: FileSystem> Service<C, F> {
    pub fn new(config: Config, config_path: impl Into<PathBuf>, client: C, fs: F) -> Self {
        Service {
            config,
            config_path: config_path.into(),
            client,
            fs,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Register this host with `server` and persist the issued access key.
    pub fn install(&mut self, server: &str) -> Result<()> {
        if !self.config.is_empty() {
            return Err(Error::AlreadyConfigured);
        }
        if server.is_empty() {
            return Err(Error::MissingArgument("Server flag missing"));
        }

        debug!(server, "requesting access key");
        let access_key = self
            .client
            .acquire_access_key(server)
            .map_err(|e| Error::remote("Could not get Access Key", e))?;

        self.write_config_file(server, &access_key)?;
        self.config = Config::new(server, access_key);
        info!(server, path = %self.config_path.display(), "shipper installed");
        Ok(())
    }

    /// Revoke the access key on the server, then remove the local config file.
    ///
    /// The two steps are not transactional: if the key is revoked but the file
    /// cannot be deleted, the error is returned and the config stays in place.
    pub fn uninstall(&mut self) -> Result<()> {
        if self.config.is_empty() {
            return Err(Error::NotConfigured("No config file found"));
        }

        debug!(server = %self.config.server, "revoking access key");
        self.client
            .revoke_access_key(&self.config.server, &self.config.access_key)
            .map_err(|e| Error::remote("Could not delete Access Key", e))?;

        if let Err(e) = self.delete_config_file() {
            warn!(
                path = %self.config_path.display(),
                "access key revoked but config file could not be removed"
            );
            return Err(e);
        }

        info!(server = %self.config.server, "shipper uninstalled");
        self.config = Config::default();
        Ok(())
    }

    /// Ship the file at `file_path` as bundle `bundle_id`.
    pub fn upload(&self, bundle_id: &str, file_path: &str) -> Result<()> {
        if self.config.is_empty() {
            return Err(Error::NotConfigured("Need to install shipper first"));
        }
        if bundle_id.is_empty() {
            return Err(Error::MissingArgument("BundleID missing"));
        }
        if file_path.is_empty() {
            return Err(Error::MissingArgument("File path is missing"));
        }

        let data = self
            .fs
            .read_file(Path::new(file_path))
            .map_err(|e| Error::io("read", file_path, e))?;
        debug!(bundle_id, file_path, bytes = data.len(), "read bundle file");

        let ticket = self
            .client
            .get_upload_url(&self.config.server, &self.config.access_key, bundle_id)
            .map_err(|e| Error::remote("Could not get upload URL", e))?;
        debug!(bundle_id, upload_id = %ticket.id, "got upload URL");

        self.client
            .upload_file(&ticket.url, data)
            .map_err(|e| Error::remote("Could not upload file", e))?;
        debug!(bundle_id, upload_id = %ticket.id, "transferred bundle");

        self.client
            .confirm_upload(&self.config.server, &self.config.access_key, &ticket.id)
            .map_err(|e| Error::remote("Could not confirm upload", e))?;
        info!(bundle_id, upload_id = %ticket.id, "upload confirmed");
        Ok(())
    }

    pub(crate) fn write_config_file(&self, server: &str, access_key: &str) -> Result<()> {
        let contents = config::render(server, access_key)?;
        self.fs
            .write_file(&self.config_path, contents.as_bytes(), CONFIG_FILE_MODE)
            .map_err(|e| Error::io("write", &self.config_path, e))
    }

    pub(crate) fn delete_config_file(&self) -> Result<()> {
        self.fs
            .delete_file(&self.config_path)
            .map_err(|e| Error::io("delete", &self.config_path, e))
    }
}
