//! Article business logic - Handles all article-related operations.
//!
//! Provides functions for creating, retrieving, updating and deleting articles.
//! Deleting an article also deletes the purchase lines that reference it and
//! recomputes the totals of the purchases that lost a line.

use crate::{
    config::catalog::ArticuloConfig,
    entities::{Articulo, ArticuloCompra, articulo, articulo_compra},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument, warn};

/// Field changes for [`update_articulo`]. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ArticuloChanges {
    /// New name
    pub nombre: Option<String>,
    /// New description
    pub descripcion: Option<String>,
    /// New unit price (clamped to 0 if negative)
    pub precio_actual: Option<f64>,
    /// New stock (clamped to 0 if negative)
    pub stock: Option<i32>,
}

impl ArticuloChanges {
    /// Whether no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nombre.is_none()
            && self.descripcion.is_none()
            && self.precio_actual.is_none()
            && self.stock.is_none()
    }
}

/// Finds an article by its id.
pub async fn get_articulo_by_id<C>(db: &C, id: i32) -> Result<Option<articulo::Model>>
where
    C: ConnectionTrait,
{
    Articulo::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Lists every article, ordered by id.
pub async fn list_articulos<C>(db: &C) -> Result<Vec<articulo::Model>>
where
    C: ConnectionTrait,
{
    Articulo::find()
        .order_by_asc(articulo::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Stores a new article.
///
/// The model is expected to come from [`articulo::Model::new`], so text is trimmed and
/// numbers are already clamped. An id of 0 (the constructor's answer to a non-positive
/// id) is refused, as is an id that is already taken.
#[instrument(skip(db))]
pub async fn create_articulo<C>(db: &C, articulo: articulo::Model) -> Result<articulo::Model>
where
    C: ConnectionTrait,
{
    if articulo.id <= 0 {
        return Err(Error::Validation {
            message: "El id del artículo debe ser un entero positivo".to_string(),
        });
    }

    if get_articulo_by_id(db, articulo.id).await?.is_some() {
        return Err(Error::ArticuloDuplicado { id: articulo.id });
    }

    let created = articulo::ActiveModel::from(articulo)
        .reset_all()
        .insert(db)
        .await?;
    info!("Created articulo {}", created.id);
    Ok(created)
}

/// Applies field changes to an existing article and writes it back.
///
/// Changes go through the entity setters, so the same trimming and clamping rules
/// apply as on creation.
#[instrument(skip(db))]
pub async fn update_articulo<C>(
    db: &C,
    id: i32,
    changes: ArticuloChanges,
) -> Result<articulo::Model>
where
    C: ConnectionTrait,
{
    let mut articulo = get_articulo_by_id(db, id)
        .await?
        .ok_or(Error::ArticuloNotFound { id })?;

    if let Some(nombre) = &changes.nombre {
        articulo.set_nombre(nombre);
    }
    if let Some(descripcion) = &changes.descripcion {
        articulo.set_descripcion(descripcion);
    }
    if let Some(precio_actual) = changes.precio_actual {
        articulo.set_precio_actual(precio_actual);
    }
    if let Some(stock) = changes.stock {
        articulo.set_stock(stock);
    }

    let updated = articulo::ActiveModel::from(articulo)
        .reset_all()
        .update(db)
        .await?;
    debug!("Updated articulo {}: {:?}", id, updated);
    Ok(updated)
}

/// Deletes an article together with every purchase line that references it.
///
/// The purchases that lose a line get their stored total recomputed in the same
/// transaction. Returns the number of lines removed.
#[instrument(skip(db))]
pub async fn delete_articulo<C>(db: &C, id: i32) -> Result<u64>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let articulo = Articulo::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(Error::ArticuloNotFound { id })?;

    let lineas = articulo.find_related(ArticuloCompra).all(&txn).await?;

    let removed = ArticuloCompra::delete_many()
        .filter(articulo_compra::Column::IdArticulo.eq(id))
        .exec(&txn)
        .await?
        .rows_affected;

    for linea in &lineas {
        crate::core::compra::recalculate_total(&txn, linea.id_compra).await?;
    }

    articulo.delete(&txn).await?;
    txn.commit().await?;

    info!("Deleted articulo {} and {} purchase lines", id, removed);
    Ok(removed)
}

/// Inserts every catalogue entry whose id is not stored yet.
///
/// Existing articles are left untouched, so running the seed twice is harmless.
/// Returns how many articles were inserted.
#[instrument(skip(db, catalogo))]
pub async fn seed_articulos<C>(db: &C, catalogo: &[ArticuloConfig]) -> Result<usize>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let mut inserted = 0;

    for entry in catalogo {
        let articulo = entry.to_model();
        if articulo.id <= 0 {
            warn!(
                "Skipping catalogue entry '{}' with invalid id",
                entry.nombre
            );
            continue;
        }
        if get_articulo_by_id(&txn, articulo.id).await?.is_some() {
            debug!("Articulo {} already present, not seeding", articulo.id);
            continue;
        }
        articulo::ActiveModel::from(articulo)
            .reset_all()
            .insert(&txn)
            .await?;
        inserted += 1;
    }

    txn.commit().await?;
    info!("Seeded {} articulos from catalogue", inserted);
    Ok(inserted)
}
