//! Command line interface of the server binary.
//!
//! Flags override the matching config file values.

use std::path::PathBuf;

use clap::Parser;

use crate::config::TrapConfig;

#[derive(Debug, Parser)]
#[command(name = "honeytoken-server", version)]
#[command(
    about = "Serve a fixed decoy response and alert when a honeytoken URL is requested",
    after_help = "Example config.toml:\n\n  [listener]\n  bind_address = \"127.0.0.1:20000\"\n\n  [response]\n  file = \"response.xml\"\n  content_type = \"text/xml; charset=UTF-8\"\n  status_code = 200\n\n  [registry]\n  database_url = \"sqlite://honeytokens.db\""
)]
pub struct Args {
    /// Configuration file (TOML, or JSON when it ends in .json).
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Show verbose logging (full request dumps).
    #[arg(short, long)]
    pub verbose: bool,

    /// Interface and port, e.g. localhost:20000, or :20000 for all interfaces.
    #[arg(long)]
    pub bind_address: Option<String>,

    /// File sent as the response to every request.
    #[arg(long)]
    pub response_file: Option<String>,

    /// Content-Type response header.
    #[arg(long)]
    pub response_content_type: Option<String>,

    /// Response status code (e.g. 200).
    #[arg(long)]
    pub response_code: Option<u16>,

    /// Token registry database.
    #[arg(long)]
    pub database: Option<String>,
}

impl Args {
    /// Apply command line values on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut TrapConfig) {
        if self.verbose {
            config.observability.verbose = true;
        }
        if let Some(bind_address) = &self.bind_address {
            config.listener.bind_address = bind_address.clone();
        }
        if let Some(file) = &self.response_file {
            config.response.file = file.clone();
        }
        if let Some(content_type) = &self.response_content_type {
            config.response.content_type = content_type.clone();
        }
        if let Some(code) = self.response_code {
            config.response.status_code = code;
        }
        if let Some(database) = &self.database {
            config.registry.database_url = database.clone();
        }
    }
}
