//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        articulo,
        cliente::{self, ClienteCompleto},
        compra::{self, CompraConLineas},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test article with the given id and price.
///
/// # Defaults
/// * `nombre`: `"Articulo {id}"`
/// * `descripcion`: `"Articulo de prueba"`
/// * `stock`: 10
pub async fn create_test_articulo(
    db: &DatabaseConnection,
    id: i32,
    precio_actual: f64,
) -> Result<entities::articulo::Model> {
    articulo::create_articulo(
        db,
        entities::articulo::Model::new(
            id,
            &format!("Articulo {id}"),
            "Articulo de prueba",
            precio_actual,
            10,
        ),
    )
    .await
}

/// Creates a test client with fiscal info.
///
/// # Defaults
/// * `nombre_completo`: `"Cliente {nif_cif}"`
/// * `email`: `"cliente@example.com"`
/// * `telefono`: `"600111222"`
/// * `direccion`: `"C/ Demo 1"`
pub async fn create_test_cliente(
    db: &DatabaseConnection,
    nif_cif: &str,
) -> Result<ClienteCompleto> {
    let nombre = format!("Cliente {nif_cif}");
    let datos = entities::cliente::Model::new(nif_cif, &nombre, "cliente@example.com");
    let mut nuevo = ClienteCompleto::new(datos);
    let info = entities::informacion_fiscal::Model::new(nif_cif, "600111222", "C/ Demo 1");
    nuevo.set_informacion_fiscal(info);
    cliente::create_cliente(db, nuevo).await
}

/// Creates an empty purchase (no lines, total 0) with a fixed id.
pub async fn create_test_compra(
    db: &DatabaseConnection,
    id: i32,
    nif_cif: &str,
) -> Result<entities::compra::Model> {
    let nueva = entities::compra::Model::new(id, nif_cif, None, None, "C/ Demo 1", 0.0);
    let pedido = CompraConLineas::new(nueva);
    Ok(compra::create_compra(db, pedido).await?.compra)
}

/// Sets up a complete test environment with one client.
/// Returns (db, cliente) for common test scenarios.
pub async fn setup_with_cliente() -> Result<(DatabaseConnection, entities::cliente::Model)> {
    let db = setup_test_db().await?;
    let cliente = create_test_cliente(&db, "99999999Z").await?.cliente;
    Ok((db, cliente))
}
