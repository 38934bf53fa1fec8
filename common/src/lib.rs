//! Types and utilities shared by the transit components.
pub mod logging;

pub use logging::{LogFormat, LoggingOpts, TracingError, init_tracing};

/// Identifies the vehicle which reported a record.
pub type VehicleId = u32;
/// Identifies the route pattern a vehicle is executing.
pub type PatternId = u32;
/// Linear distance, in feet, travelled into the current pattern.
pub type Distance = i64;
/// Vehicle speed in miles per hour.
pub type Speed = f64;

/// Expands to the version string reported by the components' `--version` flag.
///
/// Callers must depend on `git-version`.
#[macro_export]
macro_rules! version {
    () => {
        git_version::git_version!(
            args = ["--tags", "--always", "--dirty=-modified"],
            fallback = "unknown"
        )
    };
}
