//! Logging initialization.
//!
//! Logs go to stderr so stdout carries only the extracted JSON. `RUST_LOG`
//! overrides the level chosen here.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Resolved logging choices after merging config and CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub level: String,
    pub json: bool,
}

impl LogOptions {
    /// Merge the `[logging]` section with the CLI overrides.
    ///
    /// `--verbose` raises the level to debug unless the config already asks
    /// for trace.
    pub fn resolve(config: &scribe_core::Config, verbose: bool, json_logs: bool) -> Self {
        let configured = config.logging.level.to_lowercase();
        let level = if verbose && configured != "trace" {
            "debug".to_string()
        } else {
            configured
        };
        Self {
            level,
            json: json_logs || config.logging.format.eq_ignore_ascii_case("json"),
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Install the global subscriber.
pub fn init(options: &LogOptions) {
    let filter = options.filter();

    if options.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

pub fn init_from_config(config: &scribe_core::Config, verbose: bool, json_logs: bool) {
    init(&LogOptions::resolve(config, verbose, json_logs));
}
