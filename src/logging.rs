use crate::config::LoggingConfig;
use crate::error::ServiceError;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

/// Resolve the effective log level from an explicit override or the config
pub fn resolve_level(
    config: &LoggingConfig,
    override_level: Option<&str>,
) -> Result<Level, ServiceError> {
    let log_level = override_level.or(config.level.as_deref()).unwrap_or("info");

    match log_level.to_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        _ => Err(ServiceError::InvalidData(format!(
            "Invalid log level: {log_level}. Valid levels are: error, warn, info, debug, trace"
        ))),
    }
}

/// Initialize structured logging; `RUST_LOG` takes precedence over the configured level
pub fn init_logging(
    config: &LoggingConfig,
    override_level: Option<&str>,
) -> Result<(), ServiceError> {
    let level = resolve_level(config, override_level)?;
    let level_name = level.to_string().to_lowercase();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level_name))
        .map_err(|e| ServiceError::InvalidData(format!("Failed to create log filter: {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .try_init()
        .map_err(|e| ServiceError::InvalidData(format!("Failed to install subscriber: {e}")))?;

    debug!("Logging initialized with level: {}", level_name);
    Ok(())
}
