//! Purchase business logic - Handles all purchase-related operations.
//!
//! A purchase is handled as an aggregate, [`CompraConLineas`], that keeps the
//! purchase and its lines consistent in memory: adding a line writes the line's
//! back-reference, removing one detaches it. When the aggregate is stored, the
//! total is computed from the lines; no caller ever supplies `precio_total`.
//!
//! Purchase ids are allocated as `max(id) + 1`. Two sessions creating purchases at
//! the same time could pick the same id; the primary key makes the second insert
//! fail rather than overwrite anything.

use crate::{
    core::articulo::get_articulo_by_id,
    core::cliente::get_cliente_by_nif,
    entities::{ArticuloCompra, Compra, EstadoCompra, articulo_compra, compra},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument, warn};

/// A purchase together with its lines.
#[derive(Debug, Clone, PartialEq)]
pub struct CompraConLineas {
    /// The purchase row
    pub compra: compra::Model,
    /// Its lines, at most one per article
    pub lineas: Vec<articulo_compra::Model>,
}

impl CompraConLineas {
    /// Wraps a purchase with no lines yet.
    #[must_use]
    pub const fn new(compra: compra::Model) -> Self {
        Self {
            compra,
            lineas: Vec::new(),
        }
    }

    /// Adds a line, pointing it at this purchase.
    ///
    /// Returns `false` and leaves the aggregate unchanged if the purchase already has a
    /// line for the same article.
    pub fn add_linea(&mut self, mut linea: articulo_compra::Model) -> bool {
        if self.linea(linea.id_articulo).is_some() {
            return false;
        }
        linea.id_compra = self.compra.id;
        self.lineas.push(linea);
        true
    }

    /// Removes the line for an article and returns it detached from this purchase.
    pub fn remove_linea(&mut self, id_articulo: i32) -> Option<articulo_compra::Model> {
        let index = self
            .lineas
            .iter()
            .position(|l| l.id_articulo == id_articulo)?;
        let mut linea = self.lineas.remove(index);
        linea.set_id_compra(0);
        Some(linea)
    }

    /// The line for an article, if any.
    #[must_use]
    pub fn linea(&self, id_articulo: i32) -> Option<&articulo_compra::Model> {
        self.lineas.iter().find(|l| l.id_articulo == id_articulo)
    }

    /// Changes the purchase id and re-points every line at it.
    pub fn set_id(&mut self, id: i32) {
        self.compra.set_id(id);
        for linea in &mut self.lineas {
            linea.id_compra = self.compra.id;
        }
    }

    /// Sum of the line subtotals.
    #[must_use]
    pub fn total(&self) -> f64 {
        total_de_lineas(&self.lineas)
    }
}

/// Sum of `unidades × precio_compra` over the given lines.
#[must_use]
pub fn total_de_lineas(lineas: &[articulo_compra::Model]) -> f64 {
    lineas.iter().map(articulo_compra::Model::subtotal).sum()
}

/// Next free purchase id: the highest stored id plus one, or 1 if there are none.
pub async fn next_compra_id<C>(db: &C) -> Result<i32>
where
    C: ConnectionTrait,
{
    let max_id: Option<i32> = Compra::find()
        .select_only()
        .column_as(compra::Column::Id.max(), "max_id")
        .into_tuple::<Option<i32>>()
        .one(db)
        .await?
        .flatten();

    match max_id {
        None => Ok(1),
        Some(id) => id.checked_add(1).ok_or_else(|| Error::Validation {
            message: "No quedan ids de compra disponibles".to_string(),
        }),
    }
}

/// Finds a purchase by its id, without lines.
pub async fn get_compra_by_id<C>(db: &C, id: i32) -> Result<Option<compra::Model>>
where
    C: ConnectionTrait,
{
    Compra::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Finds a purchase by its id, with its lines ordered by article id.
pub async fn get_compra_con_lineas<C>(db: &C, id: i32) -> Result<Option<CompraConLineas>>
where
    C: ConnectionTrait,
{
    let Some(compra) = get_compra_by_id(db, id).await? else {
        return Ok(None);
    };
    let lineas = compra
        .find_related(ArticuloCompra)
        .order_by_asc(articulo_compra::Column::IdArticulo)
        .all(db)
        .await?;
    Ok(Some(CompraConLineas { compra, lineas }))
}

/// Lists every purchase with its lines, ordered by id.
pub async fn list_compras<C>(db: &C) -> Result<Vec<CompraConLineas>>
where
    C: ConnectionTrait,
{
    let rows = Compra::find()
        .order_by_asc(compra::Column::Id)
        .find_with_related(ArticuloCompra)
        .all(db)
        .await?;

    let compras = rows
        .into_iter()
        .map(|(compra, lineas)| CompraConLineas { compra, lineas })
        .collect();
    Ok(compras)
}

/// Builds a detached line for an article, snapshotting its current price.
///
/// The returned line has `id_compra = 0` until it is added to a purchase.
pub async fn build_linea<C>(
    db: &C,
    id_articulo: i32,
    unidades: i32,
) -> Result<articulo_compra::Model>
where
    C: ConnectionTrait,
{
    let articulo = get_articulo_by_id(db, id_articulo)
        .await?
        .ok_or(Error::ArticuloNotFound { id: id_articulo })?;
    let linea = articulo_compra::Model::new(0, articulo.id, unidades, articulo.precio_actual);
    Ok(linea)
}

/// Stores a purchase and its lines in one transaction.
///
/// The client and every article must exist. A purchase id of 0 is replaced with
/// [`next_compra_id`]. The stored total is the sum of the lines, whatever the
/// aggregate carried. Returns the aggregate as stored.
#[instrument(skip(db, pedido), fields(cliente = %pedido.compra.id_cliente))]
pub async fn create_compra<C>(db: &C, pedido: CompraConLineas) -> Result<CompraConLineas>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let stored = insert_compra(&txn, pedido).await?;
    txn.commit().await?;
    info!(
        "Created compra {} with {} lines, total {:.2}",
        stored.compra.id,
        stored.lineas.len(),
        stored.compra.precio_total
    );
    Ok(stored)
}

/// Insert path shared by [`create_compra`] and client creation; expects an open transaction.
pub(crate) async fn insert_compra<C>(
    txn: &C,
    mut pedido: CompraConLineas,
) -> Result<CompraConLineas>
where
    C: ConnectionTrait,
{
    if get_cliente_by_nif(txn, &pedido.compra.id_cliente)
        .await?
        .is_none()
    {
        return Err(Error::ClienteNotFound {
            nif_cif: pedido.compra.id_cliente.clone(),
        });
    }

    for linea in &pedido.lineas {
        if get_articulo_by_id(txn, linea.id_articulo).await?.is_none() {
            return Err(Error::ArticuloNotFound {
                id: linea.id_articulo,
            });
        }
    }

    if pedido.compra.id == 0 {
        let id = next_compra_id(txn).await?;
        debug!("Allocated compra id {}", id);
        pedido.set_id(id);
    } else {
        pedido.set_id(pedido.compra.id);
    }
    let total = pedido.total();
    pedido.compra.set_precio_total(total);

    let compra = compra::ActiveModel::from(pedido.compra)
        .reset_all()
        .insert(txn)
        .await?;

    let mut lineas = Vec::with_capacity(pedido.lineas.len());
    for linea in pedido.lineas {
        let linea = articulo_compra::ActiveModel::from(linea)
            .reset_all()
            .insert(txn)
            .await?;
        lineas.push(linea);
    }

    Ok(CompraConLineas { compra, lineas })
}

/// Changes the status of a purchase from user-typed text.
///
/// The text is parsed inside the transaction; an unrecognised status aborts it, so the
/// stored status is left exactly as it was.
#[instrument(skip(db))]
pub async fn update_estado_compra<C>(db: &C, id: i32, estado: &str) -> Result<compra::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let mut compra = get_compra_by_id(&txn, id)
        .await?
        .ok_or(Error::CompraNotFound { id })?;

    let nuevo = estado.parse::<EstadoCompra>().inspect_err(|_| {
        warn!(
            "Rejected estado '{}' for compra {}, rolling back",
            estado, id
        );
    })?;
    compra.set_estado(Some(nuevo));

    let updated = compra::ActiveModel::from(compra)
        .reset_all()
        .update(&txn)
        .await?;
    txn.commit().await?;

    info!("Compra {} is now {}", id, updated.estado);
    Ok(updated)
}

/// Changes the shipping address of a purchase.
#[instrument(skip(db))]
pub async fn update_direccion_compra<C>(db: &C, id: i32, direccion: &str) -> Result<compra::Model>
where
    C: ConnectionTrait,
{
    let mut compra = get_compra_by_id(db, id)
        .await?
        .ok_or(Error::CompraNotFound { id })?;
    compra.set_direccion(direccion);

    compra::ActiveModel::from(compra)
        .reset_all()
        .update(db)
        .await
        .map_err(Into::into)
}

/// Deletes a purchase and its lines. Articles and the client are not touched.
///
/// Returns the number of lines removed.
#[instrument(skip(db))]
pub async fn delete_compra<C>(db: &C, id: i32) -> Result<u64>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let compra = get_compra_by_id(&txn, id)
        .await?
        .ok_or(Error::CompraNotFound { id })?;

    let removed = ArticuloCompra::delete_many()
        .filter(articulo_compra::Column::IdCompra.eq(id))
        .exec(&txn)
        .await?
        .rows_affected;
    compra.delete(&txn).await?;

    txn.commit().await?;
    info!("Deleted compra {} and {} lines", id, removed);
    Ok(removed)
}

/// Recomputes and stores the total of a purchase from its current lines.
pub async fn recalculate_total<C>(db: &C, id: i32) -> Result<compra::Model>
where
    C: ConnectionTrait,
{
    let mut compra = get_compra_by_id(db, id)
        .await?
        .ok_or(Error::CompraNotFound { id })?;
    let lineas = compra.find_related(ArticuloCompra).all(db).await?;
    compra.set_precio_total(total_de_lineas(&lineas));

    compra::ActiveModel::from(compra)
        .reset_all()
        .update(db)
        .await
        .map_err(Into::into)
}

/// Adds a line for an article to a stored purchase and refreshes the total.
///
/// The unit price is taken from the article as it is now.
#[instrument(skip(db))]
pub async fn add_linea_to_compra<C>(
    db: &C,
    id_compra: i32,
    id_articulo: i32,
    unidades: i32,
) -> Result<CompraConLineas>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let mut pedido = get_compra_con_lineas(&txn, id_compra)
        .await?
        .ok_or(Error::CompraNotFound { id: id_compra })?;
    if !pedido.add_linea(build_linea(&txn, id_articulo, unidades).await?) {
        return Err(Error::Validation {
            message: format!(
                "La compra {id_compra} ya contiene el artículo {id_articulo}"
            ),
        });
    }
    if let Some(linea) = pedido.linea(id_articulo) {
        articulo_compra::ActiveModel::from(linea.clone())
            .reset_all()
            .insert(&txn)
            .await?;
    }
    recalculate_total(&txn, id_compra).await?;

    let stored = get_compra_con_lineas(&txn, id_compra)
        .await?
        .ok_or(Error::CompraNotFound { id: id_compra })?;
    txn.commit().await?;
    Ok(stored)
}

/// Changes the units of one line and refreshes the total. The snapshot price is kept.
#[instrument(skip(db))]
pub async fn update_linea_unidades<C>(
    db: &C,
    id_compra: i32,
    id_articulo: i32,
    unidades: i32,
) -> Result<CompraConLineas>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let mut linea = ArticuloCompra::find_by_id((id_compra, id_articulo))
        .one(&txn)
        .await?
        .ok_or(Error::LineaNotFound {
            id_compra,
            id_articulo,
        })?;
    linea.set_unidades(unidades);
    articulo_compra::ActiveModel::from(linea)
        .reset_all()
        .update(&txn)
        .await?;
    recalculate_total(&txn, id_compra).await?;

    let stored = get_compra_con_lineas(&txn, id_compra)
        .await?
        .ok_or(Error::CompraNotFound { id: id_compra })?;
    txn.commit().await?;
    Ok(stored)
}

/// Removes one line from a stored purchase and refreshes the total.
#[instrument(skip(db))]
pub async fn remove_linea_from_compra<C>(
    db: &C,
    id_compra: i32,
    id_articulo: i32,
) -> Result<CompraConLineas>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let linea = ArticuloCompra::find_by_id((id_compra, id_articulo))
        .one(&txn)
        .await?
        .ok_or(Error::LineaNotFound {
            id_compra,
            id_articulo,
        })?;
    linea.delete(&txn).await?;
    recalculate_total(&txn, id_compra).await?;

    let stored = get_compra_con_lineas(&txn, id_compra)
        .await?
        .ok_or(Error::CompraNotFound { id: id_compra })?;
    txn.commit().await?;
    Ok(stored)
}
