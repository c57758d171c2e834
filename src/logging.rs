use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Verbosity comes from `RUST_LOG`;
/// warnings only by default so command output stays clean.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
