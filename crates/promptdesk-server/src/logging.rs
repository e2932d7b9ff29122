//! Logging configuration and initialization.
//!
//! Log targets are namespaced under `promptdesk::` (`startup`, `shutdown`,
//! `api`, `upstream`, `history`, `projects`). The level for each is picked
//! from a preset selected by CLI flags, adjusted by `--log TARGET=LEVEL`
//! overrides, and replaced wholesale by `RUST_LOG` when that is set.

use clap::{Args, ValueEnum};
use std::collections::BTreeMap;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const TARGET_PREFIX: &str = "promptdesk::";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging preset levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogPreset {
    /// Request summaries, upstream failures, storage warnings
    #[default]
    Production,
    Verbose,
    Debug,
    Trace,
    /// Warnings and errors only
    Quiet,
}

/// Logging flags shared by the server binary.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Enable verbose logging (INFO level for every target)
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Enable trace logging
    #[arg(long)]
    pub trace: bool,

    /// Quiet mode (WARN and ERROR only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Set log level for specific targets (e.g., "upstream=debug").
    /// Targets are prefixed with "promptdesk::" automatically.
    #[arg(long = "log", value_name = "TARGET=LEVEL")]
    pub overrides: Vec<String>,

    /// Log output format
    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Text)]
    pub format: LogFormat,
}

/// Resolved logging configuration.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub preset: LogPreset,
    pub overrides: BTreeMap<String, Level>,
    pub format: LogFormat,
}

impl From<&LogArgs> for LogConfig {
    fn from(args: &LogArgs) -> Self {
        // Quietest flag wins, then the most detailed one.
        let preset = if args.quiet {
            LogPreset::Quiet
        } else if args.trace {
            LogPreset::Trace
        } else if args.debug {
            LogPreset::Debug
        } else if args.verbose {
            LogPreset::Verbose
        } else {
            LogPreset::Production
        };

        let overrides = args
            .overrides
            .iter()
            .flat_map(|arg| arg.split(','))
            .filter_map(parse_override)
            .collect();

        Self {
            preset,
            overrides,
            format: args.format,
        }
    }
}

impl LogConfig {
    fn preset_directives(&self) -> &'static [&'static str] {
        match self.preset {
            LogPreset::Production => &[
                "promptdesk::startup=info",
                "promptdesk::shutdown=info",
                "promptdesk::api=info",
                "promptdesk::upstream=info",
                "promptdesk::history=info",
                "promptdesk::projects=info",
                "tower_http=warn",
            ],
            LogPreset::Verbose => &["promptdesk=info", "tower_http=info"],
            LogPreset::Debug => &["promptdesk=debug", "tower_http=debug"],
            LogPreset::Trace => &["promptdesk=trace", "tower_http=trace"],
            LogPreset::Quiet => &["promptdesk=warn", "tower_http=error"],
        }
    }

    /// The filter directive string for this configuration.
    pub fn directives(&self) -> String {
        let mut directives: Vec<String> = self
            .preset_directives()
            .iter()
            .map(|d| d.to_string())
            .collect();

        // Later directives win for the same target.
        directives.extend(
            self.overrides
                .iter()
                .map(|(target, level)| format!("{}={}", target, level.as_str().to_lowercase())),
        );

        directives.join(",")
    }

    /// Build an EnvFilter, preferring RUST_LOG when it is set.
    pub fn build_filter(&self) -> EnvFilter {
        if let Ok(env_filter) = EnvFilter::try_from_default_env() {
            return env_filter;
        }

        EnvFilter::try_new(self.directives()).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Parse `target=level`, normalising the target into the crate namespace.
fn parse_override(part: &str) -> Option<(String, Level)> {
    let (target, level) = part.split_once('=')?;
    let target = target.trim();
    let level: Level = level.trim().parse().ok()?;

    let full_target = if target.starts_with(TARGET_PREFIX) || target.starts_with("tower_http") {
        target.to_string()
    } else {
        format!("{TARGET_PREFIX}{target}")
    };

    Some((full_target, level))
}

/// Initialize the tracing subscriber with the given configuration.
pub fn init(config: &LogConfig) {
    let filter = config.build_filter();

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true).with_thread_ids(false))
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .init();
        }
    }
}
