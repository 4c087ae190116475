use tracing_appender::{non_blocking, rolling};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    fmt, fmt::time::OffsetTime, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

/// Installs the global subscriber. Logs go to stderr so they never
/// interleave with the prediction output on stdout; a daily-rolling file
/// under `logs/` is added only when `log_file` is given.
pub fn init_logger(
    log_level: &str,
    log_file: Option<&str>,
) -> anyhow::Result<Option<non_blocking::WorkerGuard>> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("prediction_client={}", log_level.to_lowercase()).parse()?);

    let formatting_layer = fmt::layer()
        .pretty()
        .with_timer(OffsetTime::local_rfc_3339()?)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(log_file) => {
            let file_appender = rolling::daily("logs/", log_file);
            let (non_blocking_appender, guard) = non_blocking(file_appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking_appender)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    Registry::default()
        .with(filter)
        .with(ErrorLayer::default())
        .with(formatting_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
