use dotenvy::dotenv;
use gestion_ecommerce::config::{catalog, database};
use gestion_ecommerce::core::articulo::seed_articulos;
use gestion_ecommerce::errors::Result;
use gestion_ecommerce::shell::Shell;
use sea_orm::DatabaseConnection;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing; stdout belongs to the menu
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file, non-fatal
    dotenv().ok();

    // 3. Connect
    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database connected."))
        .inspect_err(|e| error!("Failed to connect to the database: {}", e))?;

    // 4. Run, then always close the connection
    let outcome = run(&db).await;
    db.close().await?;
    outcome
}

async fn run(db: &DatabaseConnection) -> Result<()> {
    database::create_tables(db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    let catalogo = catalog::load_default_config()
        .inspect_err(|e| error!("Failed to load the article catalogue: {}", e))?;
    seed_articulos(db, &catalogo.articulos)
        .await
        .inspect(|added| info!("{} catalogue articles seeded.", added))
        .inspect_err(|e| error!("Failed to seed articles: {}", e))?;

    let mut shell = Shell::new(db.clone(), std::io::stdin().lock(), std::io::stdout());
    shell.run().await
}
