//! Shared setup for the launcher binaries.

use harness_runner::LaunchError;

/// Exit status for command-line mistakes.
pub const USAGE_EXIT_CODE: i32 = 2;

/// Structured logs go to stderr so stdout stays the report channel.
/// `RUST_LOG` overrides the default `warn` filter.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Process exit status for a launcher error.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<LaunchError>() {
        Some(e) if e.is_usage() => USAGE_EXIT_CODE,
        _ => 1,
    }
}
