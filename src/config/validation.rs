use crate::config::types::{Config, MirrorConfig};
use crate::ConfigError;

/// Upper bound on recursion depth; each hop is one stack frame
pub const MAX_ALLOWED_DEPTH: u32 = 64;

/// Upper bound on the per-request timeout (seconds)
pub const MAX_TIMEOUT_SECS: u64 = 600;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_mirror_config(&config.mirror)
}

/// Validates mirror configuration
fn validate_mirror_config(config: &MirrorConfig) -> Result<(), ConfigError> {
    if config.out_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "out_dir cannot be empty".to_string(),
        ));
    }

    if config.max_depth > MAX_ALLOWED_DEPTH {
        return Err(ConfigError::Validation(format!(
            "max_depth must be <= {}, got {}",
            MAX_ALLOWED_DEPTH, config.max_depth
        )));
    }

    if config.timeout_secs < 1 || config.timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and {}, got {}",
            MAX_TIMEOUT_SECS, config.timeout_secs
        )));
    }

    if let Some(report) = &config.report_path {
        if report.trim().is_empty() {
            return Err(ConfigError::Validation(
                "report_path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}
