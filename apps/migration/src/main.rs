//! Schema migration CLI: `migration up`, `migration down`, `migration status`.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("info,sea_orm_migration=info"))
        .init();

    cli::run_cli(migration::Migrator).await;
}
