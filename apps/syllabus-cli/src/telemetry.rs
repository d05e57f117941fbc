use tracing_subscriber::EnvFilter;

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Human-readable logs on stderr, so stdout stays clean for results.
pub fn init_cli(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Structured JSON logs for the HTTP server. `RUST_LOG` overrides the filter.
pub fn init_server(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_target(false)
        .with_thread_ids(true)
        .json()
        .init();
}
