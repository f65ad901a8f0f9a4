//! fielddex-sv runtime configuration
//!
//! CLI arguments (with env fallbacks) plus the shared data folder
//! resolution from fielddex-common.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use fielddex_common::config::resolve_data_folder;
use fielddex_common::stability::DEFAULT_CLIENT_CAPACITY;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "fielddex-sv", about = "FieldDex species classification server")]
pub struct Args {
    /// Folder holding the label schema, reference datasets, and static assets
    #[arg(long)]
    pub data_folder: Option<PathBuf>,

    /// HTTP listen port
    #[arg(long, env = "FIELDDEX_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Predict endpoint of the model service
    #[arg(
        long,
        env = "FIELDDEX_INFERENCE_URL",
        default_value = "http://127.0.0.1:8501/v1/models/fielddex:predict"
    )]
    pub inference_url: String,

    /// Maximum number of tracked client identities
    #[arg(long, default_value_t = DEFAULT_CLIENT_CAPACITY)]
    pub tracker_capacity: usize,

    /// Seconds of inactivity before a client's history is dropped
    #[arg(long, default_value_t = 900)]
    pub tracker_idle_secs: u64,
}

/// Resolved server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub data_folder: PathBuf,
    pub port: u16,
    pub inference_url: String,
    pub tracker_capacity: usize,
    pub tracker_idle: Duration,
}

impl Config {
    pub fn from_args(args: Args) -> Self {
        Self {
            data_folder: resolve_data_folder(args.data_folder.as_deref()),
            port: args.port,
            inference_url: args.inference_url,
            tracker_capacity: args.tracker_capacity,
            tracker_idle: Duration::from_secs(args.tracker_idle_secs),
        }
    }
}
