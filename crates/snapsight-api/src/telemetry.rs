use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize tracing. `log_format` is `json` for one JSON object per event, anything else for
/// compact console output.
pub fn init_telemetry(log_format: &str) -> Result<(), anyhow::Error> {
    let json = log_format == "json";

    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json());
    let console_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .event_format(Format::default().compact().with_target(false))
    });

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snapsight=debug,tower_http=debug".into()),
        )
        .with(json_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!(log_format = %log_format, "Tracing initialized");
    Ok(())
}
