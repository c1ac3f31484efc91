//! Tracing subscriber setup
//!
//! `TracingSink` only produces output once a subscriber is installed.
//! Binaries call [`init_tracing`] early in `main()`.

/// Install a compact fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects trace-level output
/// and the default is info. Installing twice is a no-op.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = if verbose { "trace" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(filter)
        .try_init();
}
