use anyhow::Context;
use tracing_subscriber::EnvFilter;

use boardrelay::{db, http, Config};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env().context("invalid configuration")?;
    let pool = db::create_pool(&config.database_url).context("invalid database target")?;

    http::run_server(pool, config).await
}
