use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use catalog_orders::catalog::{self, NewCategory, NewProduct};
use catalog_orders::{order, storage, Config, Result};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run(Config::from_env()).await {
        error!(error = %err, "startup failed");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<()> {
    let db = storage::connect(&config).await?;
    seed(&db).await?;

    let categories = catalog::list_categories(&db).await?;
    let products = catalog::list_products(&db).await?;
    let orders = order::count_orders(&db).await?;
    info!(
        categories = categories.len(),
        products = products.len(),
        orders,
        "catalog loaded"
    );
    Ok(())
}

/// Starter catalog for a fresh database. Tables that already hold data are left alone.
async fn seed(db: &DatabaseConnection) -> Result<()> {
    if catalog::list_categories(db).await?.is_empty() {
        catalog::add_category(db, NewCategory::root("Books")).await?;
        catalog::add_category(db, NewCategory::root("Movies")).await?;
        info!("seeded categories");
    }

    if catalog::list_products(db).await?.is_empty() {
        let Some(first) = catalog::list_categories(db).await?.into_iter().next() else {
            return Ok(());
        };
        catalog::add_product(db, NewProduct::new("Hammer", Decimal::from(249), first.id)).await?;
        catalog::add_product(db, NewProduct::new("Shirt", Decimal::from(130), first.id)).await?;
        info!("seeded products");
    }
    Ok(())
}
