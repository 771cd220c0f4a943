//! Configuration for the activity signup service

use clap::Parser;
use std::path::PathBuf;

/// Directory holding the bundled browser front-end
pub const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Configuration for the activity signup service
#[derive(Debug, Clone, Parser)]
#[command(name = "activity-signup")]
#[command(about = "Serves the extracurricular activity catalog and handles signups")]
pub struct Config {
    /// Address to bind the HTTP listener to
    #[arg(long, env, default_value = "0.0.0.0")]
    pub bind_addr: String,

    /// Port to listen on
    #[arg(long, env, default_value_t = 8000)]
    pub port: u16,

    /// Directory served under /static
    #[arg(long, env, default_value = DEFAULT_STATIC_DIR)]
    pub static_dir: PathBuf,

    /// Output logs in JSON format
    #[arg(long, env)]
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8000,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            log_json: false,
        }
    }
}

impl Config {
    /// Parse configuration from command-line args and environment variables
    pub fn parse_config() -> Self {
        Config::parse()
    }

    /// Listen address in `host:port` form
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
