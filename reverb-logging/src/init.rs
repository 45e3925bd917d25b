use anyhow::Result;
use tracing_subscriber::EnvFilter;

use reverb_config::domains::logging::LogFormat;
use reverb_config::LoggingConfig;

/// Initialize logging from the `logging` configuration section
pub fn init_logging_from_config(config: &LoggingConfig) -> Result<()> {
    let env_filter = env_filter(&config.level.to_string());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    // try_init so a second initialization in the same process is harmless
    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    if result.is_err() {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

/// Initialize simple tracing for basic console output
pub fn init_simple_tracing(log_level: &str) -> Result<()> {
    if tracing_subscriber::fmt()
        .with_env_filter(env_filter(log_level))
        .try_init()
        .is_err()
    {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
