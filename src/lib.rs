// Library root
// -----------
// The binary (`main.rs`) only parses flags and hands over to `cli`.
//
// Module responsibilities:
// - `service`: install/uninstall/upload lifecycle and its validation rules.
// - `client`: remote operations (trait) and their blocking HTTP implementation.
// - `fs`: whole-file disk access (trait) used by the service.
// - `config`: the `~/.shipper.toml` file, its path and its format.
// - `cli`: command tree and terminal feedback.
// - `error`: typed errors with stable user-facing messages.
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod fs;
pub mod service;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use service::Service;
