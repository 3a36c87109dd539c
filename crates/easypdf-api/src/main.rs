use easypdf_core::Config;

// Use mimalloc as the global allocator; codec buffers churn through large
// short-lived allocations.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (storage, codecs, routes)
    let (_state, router) = easypdf_api::setup::initialize_app(config.clone()).await?;

    easypdf_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
