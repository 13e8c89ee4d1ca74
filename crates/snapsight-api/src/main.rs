use snapsight_core::Config;

// Use mimalloc as the global allocator for better performance and lower fragmentation,
// especially when running on musl-based systems inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (clients, worker, routes)
    let app = snapsight_api::setup::initialize_app(config.clone()).await?;

    // Start the server; the worker is stopped once the server has drained
    snapsight_api::setup::server::start_server(&config, app.router).await?;

    if let Some(consumer) = app.consumer {
        consumer.shutdown().await;
    }

    Ok(())
}
