use mimalloc::MiMalloc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = pgprovision::Config::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.log_level.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        host = %cfg.server.host,
        port = cfg.server.port,
        admin = %cfg.admin.username,
        select_db = %cfg.select_db,
        app_user = %cfg.app.username,
        app_db = %cfg.app_db,
        "provisioning application user"
    );

    pgprovision::provision::provision(&cfg).await?;
    info!("provisioning complete");
    Ok(())
}
