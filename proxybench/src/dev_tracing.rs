/// Initialize the global tracing subscriber.
///
/// Log lines go to stderr so the per-request echo on stdout stays clean.
/// `RUST_LOG` selects the filter; without it everything at `info` and above
/// is shown. This is a no-op when a global subscriber is already installed.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Best-effort: tests may install their own subscriber first.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
