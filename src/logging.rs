use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,video_grabber_lib=info";

/// Initialize stderr logging; `RUST_LOG` overrides the default filter.
///
/// Calling it twice is harmless, the second call is ignored.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("info,video_grabber_lib=debug")
        } else {
            EnvFilter::new(DEFAULT_FILTER)
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
