//! Command line options and initialisation for the tracing subscriber.
use clap::{Args, ValueEnum};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, util::SubscriberInitExt};

/// Determines how log lines are rendered.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum LogFormat {
    /// The default multi-field format, including span context.
    #[default]
    Full,
    /// A shorter format which is easier to read on narrow terminals.
    Compact,
}

/// [clap] derived options that control logging, shared by all components.
#[derive(Clone, Debug, Args)]
pub struct LoggingOpts {
    /// Filter directive for log output, e.g. "info" or "trip_speeds=debug".
    /// If not given, `RUST_LOG` is used, and failing that "info".
    #[clap(long, env)]
    pub log_filter: Option<String>,

    /// Format in which log lines are written to stderr
    #[clap(long, env, default_value = "full")]
    pub log_format: LogFormat,
}

#[derive(Debug, Error)]
pub enum TracingError {
    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("Cannot install tracing subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Installs the global tracing subscriber. Logs are written to stderr so that
/// stdout remains free for data output.
pub fn init_tracing(opts: &LoggingOpts) -> Result<(), TracingError> {
    let filter = match &opts.log_filter {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match opts.log_format {
        LogFormat::Full => builder.finish().try_init()?,
        LogFormat::Compact => builder.compact().finish().try_init()?,
    }
    Ok(())
}
