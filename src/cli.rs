// CLI layer: parses the command line, builds one `Service` from the config
// on disk and runs a single operation on it.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};

use crate::client::HttpClient;
use crate::config;
use crate::fs::DiskFileSystem;
use crate::service::Service;

/// Shipper - register this host and ship bundles to an upload server
#[derive(Parser, Debug)]
#[command(name = "shipper")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.shipper.toml
    #[arg(long, global = true, env = "SHIPPER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register this host with a server and save the access key
    Install(InstallArgs),
    /// Revoke the access key and remove the local config
    Uninstall(UninstallArgs),
    /// Upload a file as a bundle
    Upload(UploadArgs),
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Upload server address, e.g. http://localhost:8000
    #[arg(long, short)]
    pub server: Option<String>,
}

#[derive(Args, Debug)]
pub struct UninstallArgs {
    /// Do not ask for confirmation
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Bundle identifier to upload into
    #[arg(long, short)]
    pub bundle: Option<String>,

    /// Path of the file to upload
    #[arg(long, short)]
    pub file: Option<String>,
}

impl Cli {
    /// Run the selected command against the config found on disk.
    pub fn run(self) -> Result<()> {
        let path = match self.config {
            Some(path) => path,
            None => config::default_config_path()?,
        };
        let current = config::load(&path)?;
        tracing::debug!(path = %path.display(), installed = !current.is_empty(), "loaded config");

        let client = HttpClient::new()?;
        let mut service = Service::new(current, path, client, DiskFileSystem);

        match self.command {
            Commands::Install(args) => {
                service.install(args.server.as_deref().unwrap_or_default())?;
                println!(
                    "Installed. Config written to {}",
                    service.config_path().display()
                );
            }
            Commands::Uninstall(args) => {
                if !service.config().is_empty() && !args.yes {
                    // Without a terminal there is nobody to answer the prompt.
                    if !std::io::stdin().is_terminal() {
                        anyhow::bail!(
                            "Refusing to uninstall without confirmation: stdin is not a terminal, pass --yes"
                        );
                    }
                    if !confirm_uninstall()? {
                        println!("Uninstall cancelled.");
                        return Ok(());
                    }
                }
                service.uninstall()?;
                println!("Uninstalled. Access key revoked and config removed.");
            }
            Commands::Upload(args) => {
                let bundle = args.bundle.unwrap_or_default();
                let file = args.file.unwrap_or_default();

                // Spinner only; the transfer itself is a single blocking call.
                let spinner = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
                    spinner.set_style(style);
                }
                spinner.set_message(format!("Uploading {}...", bundle));
                spinner.enable_steady_tick(Duration::from_millis(100));

                let result = service.upload(&bundle, &file);
                spinner.finish_and_clear();
                result?;
                println!("Upload successful: {} -> {}", file, bundle);
            }
        }
        Ok(())
    }
}

fn confirm_uninstall() -> Result<bool> {
    Confirm::new()
        .with_prompt("Revoke the access key and remove the shipper config?")
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn upload_flags_are_optional() {
        let cli = Cli::try_parse_from(["shipper", "upload", "--bundle", "b1"]).unwrap();
        match cli.command {
            Commands::Upload(args) => {
                assert_eq!(args.bundle.as_deref(), Some("b1"));
                assert!(args.file.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from([
            "shipper",
            "install",
            "--server",
            "http://localhost:8000",
            "--config",
            "/tmp/s.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/s.toml")));
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.server.as_deref(), Some("http://localhost:8000"))
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
