use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default output directory
pub const DEFAULT_OUT_DIR: &str = "mirror_output";

/// Default maximum recursion depth
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Main configuration structure for Site-Mirror
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mirror: MirrorConfig,
}

/// Mirror behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorConfig {
    /// Directory the mirrored tree is written under
    #[serde(rename = "out-dir", default = "default_out_dir")]
    pub out_dir: String,

    /// Maximum link/resource hops from the root URL
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional path of a markdown report written after the run
    #[serde(rename = "report-path", default)]
    pub report_path: Option<String>,
}

impl MirrorConfig {
    /// Per-request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Output directory as a path
    pub fn out_path(&self) -> PathBuf {
        PathBuf::from(&self.out_dir)
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            max_depth: default_max_depth(),
            timeout_secs: default_timeout_secs(),
            report_path: None,
        }
    }
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub out_dir: Option<String>,
    pub max_depth: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub report_path: Option<String>,
}

fn default_out_dir() -> String {
    DEFAULT_OUT_DIR.to_string()
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
