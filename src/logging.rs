//! Log output setup for the `gcs` binary using `tracing_subscriber`.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber filtered by `RUST_LOG`, falling back to
/// `directives`. Logs are JSON unless `pretty` is set.
pub fn setup_logging(directives: &str, pretty: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    if pretty {
        let main_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(main_layer)
            .init()
    } else {
        let main_layer = tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_line_number(true)
            .with_file(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(main_layer)
            .init()
    }
}
