//! Structured logging for the Verdant tools.
//!
//! Library crates emit `tracing` events; binaries call [`init_logging`] once at
//! startup to install a console subscriber (and, in debug builds, a JSON log
//! file). The filter honours `RUST_LOG` first, then the settings log level.

use std::fs::File;
use std::path::Path;

use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use verdant_config::Settings;

/// Filter used when neither `RUST_LOG` nor settings provide one.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "verdant.log";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file (debug builds only)
/// * `debug_build` - enables the file layer
/// * `settings` - optional settings supplying the log level and file toggle
///
/// # Examples
///
/// ```no_run
/// use verdant_config::Settings;
/// use verdant_log::init_logging;
///
/// let settings = Settings::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&settings));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, settings: Option<&Settings>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_string(settings)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let file_enabled = settings.is_none_or(|s| s.debug.log_to_file);
    if debug_build
        && file_enabled
        && let Some(log_dir) = log_dir
        && let Some(log_file) = open_log_file(log_dir)
    {
        subscriber.with(json_file_layer(log_file)).init();
        return;
    }

    subscriber.init();
}

/// Creates `log_dir` if needed and truncates `verdant.log` inside it.
fn open_log_file(log_dir: &Path) -> Option<File> {
    std::fs::create_dir_all(log_dir).ok()?;
    File::create(log_dir.join(LOG_FILE_NAME)).ok()
}

/// JSON lines layer writing to `file`.
fn json_file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::uptime())
        .json()
}

/// Create an `EnvFilter` with the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

fn filter_string(settings: Option<&Settings>) -> String {
    match settings {
        Some(settings) if !settings.debug.log_level.trim().is_empty() => {
            settings.debug.log_level.clone()
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}
