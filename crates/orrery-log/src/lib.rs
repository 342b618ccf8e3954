//! Structured logging for Orrery.
//!
//! Console output with an uptime timer, plus a JSON log file in debug builds.
//! `RUST_LOG` wins over the configured `debug.log_level`.

use std::path::Path;

use orrery_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config names a level.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "orrery.log";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file (debug builds only)
/// * `debug_build` - enables file logging
/// * `config` - supplies `debug.log_level` when `RUST_LOG` is unset
///
/// ```no_run
/// use orrery_config::Config;
/// use orrery_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_directives(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        tracing::info!(filter = %filter_str, file = %log_dir.join(LOG_FILE_NAME).display(), "Logging initialized");
        return;
    }

    subscriber.init();
    tracing::info!(filter = %filter_str, "Logging initialized");
}

/// Filter directives derived from the config, ignoring `RUST_LOG`.
///
/// A bare level such as `"debug"` keeps the GPU stack quiet by appending the
/// wgpu/naga directives; anything with a `,` or `=` is taken verbatim.
pub fn filter_directives(config: Option<&Config>) -> String {
    let Some(level) = config
        .map(|c| c.debug.log_level.trim())
        .filter(|level| !level.is_empty())
    else {
        return DEFAULT_FILTER.to_string();
    };

    if level.contains(',') || level.contains('=') {
        level.to_string()
    } else {
        format!("{level},wgpu=warn,naga=warn")
    }
}

/// Create an `EnvFilter` with [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        let filter_str = format!("{}", default_env_filter());
        assert!(filter_str.contains("wgpu=warn"));
        assert!(filter_str.contains("naga=warn"));
        assert!(filter_str.contains("info"));
    }

    #[test]
    fn test_no_config_uses_default() {
        assert_eq!(filter_directives(None), DEFAULT_FILTER);
    }

    #[test]
    fn test_empty_level_uses_default() {
        let mut config = Config::default();
        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_directives(Some(&config)), DEFAULT_FILTER);
    }

    #[test]
    fn test_bare_level_keeps_gpu_quiet() {
        let mut config = Config::default();
        config.debug.log_level = "debug".to_string();
        assert_eq!(
            filter_directives(Some(&config)),
            "debug,wgpu=warn,naga=warn"
        );
    }

    #[test]
    fn test_full_directive_taken_verbatim() {
        let mut config = Config::default();
        config.debug.log_level = "warn,orrery_orbit=trace".to_string();
        assert_eq!(filter_directives(Some(&config)), "warn,orrery_orbit=trace");
    }

    #[test]
    fn test_env_filter_parsing() {
        let valid_filters = [
            "info",
            "debug,orrery_render=trace",
            "warn,orrery_app=debug,orrery_observer=trace",
            "error",
        ];
        for filter_str in &valid_filters {
            let result = EnvFilter::try_from(*filter_str);
            assert!(result.is_ok(), "Failed to parse filter: {filter_str}");
        }
    }
}
