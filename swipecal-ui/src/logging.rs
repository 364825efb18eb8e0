//! Tracing setup for hosts and demos.

const DEFAULT_DIRECTIVES: &str = "error,swipecal_components=info";

/// Installs a formatted `tracing` subscriber.
///
/// The filter comes from `RUST_LOG` when set and parseable, otherwise
/// `error,swipecal_components=info`. Calling this more than once, or after
/// the host installed its own subscriber, leaves the existing one in place.
pub fn init_tracing() {
    init_tracing_with(DEFAULT_DIRECTIVES);
}

/// Like [`init_tracing`], with the directives used when `RUST_LOG` is unset.
pub fn init_tracing_with(default_directives: &str) {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new(default_directives) {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
