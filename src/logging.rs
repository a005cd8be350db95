use std::env;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

/// Filter directive from `INTERVIEW_LOG`, then `RUST_LOG`, then `warn`.
fn filter_directive() -> String {
    env::var("INTERVIEW_LOG")
        .or_else(|_| env::var("RUST_LOG"))
        .unwrap_or_else(|_| DEFAULT_FILTER.to_string())
}

/// Events go to stderr so they never mix with REPL output.
pub fn init() {
    let filter = EnvFilter::try_new(filter_directive())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
