use crate::config::types::{Config, Overrides};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Missing keys fall back to their defaults.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use site_mirror::config::load_config;
///
/// let config = load_config(Path::new("mirror.toml")).unwrap();
/// println!("Max depth: {}", config.mirror.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Builds the effective configuration for a run
///
/// Starts from the file at `path` (or the defaults when there is none),
/// applies command-line overrides on top, and validates the result.
pub fn resolve_config(path: Option<&Path>, overrides: Overrides) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = std::fs::read_to_string(p)?;
            toml::from_str(&content)?
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, overrides);
    validate(&config)?;
    Ok(config)
}

/// Applies command-line overrides onto a configuration
fn apply_overrides(config: &mut Config, overrides: Overrides) {
    if let Some(out_dir) = overrides.out_dir {
        config.mirror.out_dir = out_dir;
    }
    if let Some(depth) = overrides.max_depth {
        config.mirror.max_depth = depth;
    }
    if let Some(timeout) = overrides.timeout_secs {
        config.mirror.timeout_secs = timeout;
    }
    if overrides.report_path.is_some() {
        config.mirror.report_path = overrides.report_path;
    }
}
