//! Client business logic - Handles all client-related operations.
//!
//! A client is stored together with the rows it owns: exactly one fiscal info row
//! and any number of purchases. [`ClienteCompleto`] is the in-memory aggregate that
//! keeps the shared NIF/CIF consistent across all of them before anything is written.

use crate::{
    core::compra::{CompraConLineas, insert_compra},
    entities::{
        ArticuloCompra, Cliente, ClienteKey, Compra, InformacionFiscal, articulo_compra, cliente,
        compra, informacion_fiscal,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// A client with its fiscal info and purchases.
#[derive(Debug, Clone, PartialEq)]
pub struct ClienteCompleto {
    /// The client row
    pub cliente: cliente::Model,
    /// Its fiscal info
    pub informacion_fiscal: Option<informacion_fiscal::Model>,
    /// Its purchases, with lines
    pub compras: Vec<CompraConLineas>,
}

impl ClienteCompleto {
    /// Wraps a client with no fiscal info and no purchases.
    #[must_use]
    pub const fn new(cliente: cliente::Model) -> Self {
        Self {
            cliente,
            informacion_fiscal: None,
            compras: Vec::new(),
        }
    }

    /// Attaches fiscal info, copying the client's NIF/CIF onto it.
    pub fn set_informacion_fiscal(&mut self, mut info: informacion_fiscal::Model) {
        info.attach_to(&self.cliente);
        self.informacion_fiscal = Some(info);
    }

    /// Adds a purchase, pointing it at this client.
    ///
    /// Returns `false` if a purchase with the same non-zero id is already attached.
    pub fn add_compra(&mut self, mut pedido: CompraConLineas) -> bool {
        let id = pedido.compra.id;
        if id != 0 && self.compras.iter().any(|p| p.compra.id == id) {
            return false;
        }
        pedido.compra.set_cliente(&self.cliente);
        self.compras.push(pedido);
        true
    }

    /// Removes a purchase by id and returns it detached from this client.
    pub fn remove_compra(&mut self, id: i32) -> Option<CompraConLineas> {
        let index = self.compras.iter().position(|p| p.compra.id == id)?;
        let mut pedido = self.compras.remove(index);
        pedido.compra.id_cliente.clear();
        Some(pedido)
    }
}

/// Field changes for [`update_cliente`]. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ClienteChanges {
    /// New full name
    pub nombre_completo: Option<String>,
    /// New e-mail
    pub email: Option<String>,
    /// New fiscal phone
    pub telefono: Option<String>,
    /// New fiscal address
    pub direccion: Option<String>,
}

/// Finds a client by NIF/CIF. Surrounding whitespace in the argument is ignored.
pub async fn get_cliente_by_nif<C>(db: &C, nif_cif: &str) -> Result<Option<cliente::Model>>
where
    C: ConnectionTrait,
{
    let ClienteKey::Assigned(nif_cif) = ClienteKey::from_raw(nif_cif) else {
        return Ok(None);
    };
    Cliente::find_by_id(nif_cif)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads a client with its fiscal info and every purchase (with lines).
pub async fn get_cliente_completo<C>(db: &C, nif_cif: &str) -> Result<Option<ClienteCompleto>>
where
    C: ConnectionTrait,
{
    let Some(cliente) = get_cliente_by_nif(db, nif_cif).await? else {
        return Ok(None);
    };

    let informacion_fiscal = cliente.find_related(InformacionFiscal).one(db).await?;
    let compras = cliente
        .find_related(Compra)
        .order_by_asc(compra::Column::Id)
        .find_with_related(ArticuloCompra)
        .all(db)
        .await?
        .into_iter()
        .map(|(compra, lineas)| CompraConLineas { compra, lineas })
        .collect();

    Ok(Some(ClienteCompleto {
        cliente,
        informacion_fiscal,
        compras,
    }))
}

/// Lists every client with its fiscal info, ordered by NIF/CIF.
pub async fn list_clientes<C>(
    db: &C,
) -> Result<Vec<(cliente::Model, Option<informacion_fiscal::Model>)>>
where
    C: ConnectionTrait,
{
    Cliente::find()
        .order_by_asc(cliente::Column::NifCif)
        .find_also_related(InformacionFiscal)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Stores a client with its fiscal info and attached purchases in one transaction.
///
/// The NIF/CIF must be non-blank and unused. A client without fiscal info gets an
/// empty row so that every client owns exactly one. `fecha_creacion` is stamped by
/// the entity's save hook when absent.
#[instrument(skip(db, nuevo), fields(nif_cif = %nuevo.cliente.nif_cif))]
pub async fn create_cliente<C>(db: &C, nuevo: ClienteCompleto) -> Result<ClienteCompleto>
where
    C: ConnectionTrait + TransactionTrait,
{
    let ClienteKey::Assigned(nif_cif) = nuevo.cliente.key() else {
        return Err(Error::Validation {
            message: "El NIF/CIF del cliente no puede estar vacío".to_string(),
        });
    };

    let txn = db.begin().await?;

    if get_cliente_by_nif(&txn, &nif_cif).await?.is_some() {
        return Err(Error::ClienteDuplicado { nif_cif });
    }

    let ClienteCompleto {
        cliente,
        informacion_fiscal,
        compras,
    } = nuevo;

    let mut info =
        informacion_fiscal.unwrap_or_else(|| informacion_fiscal::Model::new(&nif_cif, "", ""));
    info.attach_to(&cliente);

    let cliente = cliente::ActiveModel::from(cliente)
        .reset_all()
        .insert(&txn)
        .await?;
    let info = informacion_fiscal::ActiveModel::from(info)
        .reset_all()
        .insert(&txn)
        .await?;

    let mut stored_compras = Vec::with_capacity(compras.len());
    for mut pedido in compras {
        pedido.compra.set_cliente(&cliente);
        stored_compras.push(insert_compra(&txn, pedido).await?);
    }

    txn.commit().await?;
    info!(
        "Created cliente {} with {} compras",
        cliente.nif_cif,
        stored_compras.len()
    );

    Ok(ClienteCompleto {
        cliente,
        informacion_fiscal: Some(info),
        compras: stored_compras,
    })
}

/// Applies field changes to a client and its fiscal info and writes them back.
///
/// `fecha_creacion` is never changed. If the client somehow has no fiscal info row,
/// one is created from the changes.
#[instrument(skip(db))]
pub async fn update_cliente<C>(
    db: &C,
    nif_cif: &str,
    changes: ClienteChanges,
) -> Result<ClienteCompleto>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let mut cliente = get_cliente_by_nif(&txn, nif_cif)
        .await?
        .ok_or_else(|| Error::ClienteNotFound {
            nif_cif: nif_cif.trim().to_string(),
        })?;

    if let Some(nombre_completo) = &changes.nombre_completo {
        cliente.set_nombre_completo(nombre_completo);
    }
    if let Some(email) = &changes.email {
        cliente.set_email(email);
    }
    cliente::ActiveModel::from(cliente.clone())
        .reset_all()
        .update(&txn)
        .await?;

    let existing = cliente.find_related(InformacionFiscal).one(&txn).await?;
    let is_new = existing.is_none();
    let mut info =
        existing.unwrap_or_else(|| informacion_fiscal::Model::new(&cliente.nif_cif, "", ""));
    if let Some(telefono) = &changes.telefono {
        info.set_telefono(telefono);
    }
    if let Some(direccion) = &changes.direccion {
        info.set_direccion(direccion);
    }
    let info = informacion_fiscal::ActiveModel::from(info).reset_all();
    if is_new {
        debug!(
            "Cliente {} had no fiscal info, creating it",
            cliente.nif_cif
        );
        info.insert(&txn).await?;
    } else {
        info.update(&txn).await?;
    }

    let stored = get_cliente_completo(&txn, &cliente.nif_cif)
        .await?
        .ok_or_else(|| Error::ClienteNotFound {
            nif_cif: cliente.nif_cif.clone(),
        })?;
    txn.commit().await?;
    Ok(stored)
}

/// Deletes a client and everything it owns: purchase lines, purchases, fiscal info.
///
/// Rows are removed children first inside one transaction. Articles are not touched.
/// Returns the number of purchases removed.
#[instrument(skip(db))]
pub async fn delete_cliente<C>(db: &C, nif_cif: &str) -> Result<u64>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let cliente = get_cliente_by_nif(&txn, nif_cif)
        .await?
        .ok_or_else(|| Error::ClienteNotFound {
            nif_cif: nif_cif.trim().to_string(),
        })?;

    let compra_ids: Vec<i32> = cliente
        .find_related(Compra)
        .all(&txn)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();

    if !compra_ids.is_empty() {
        ArticuloCompra::delete_many()
            .filter(articulo_compra::Column::IdCompra.is_in(compra_ids.clone()))
            .exec(&txn)
            .await?;
    }
    let compras = Compra::delete_many()
        .filter(compra::Column::IdCliente.eq(cliente.nif_cif.as_str()))
        .exec(&txn)
        .await?
        .rows_affected;
    InformacionFiscal::delete_by_id(cliente.nif_cif.clone())
        .exec(&txn)
        .await?;
    let nif_cif = cliente.nif_cif.clone();
    cliente.delete(&txn).await?;

    txn.commit().await?;
    info!("Deleted cliente {} and {} compras", nif_cif, compras);
    Ok(compras)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{articulo, compra as compra_core};
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_aggregate_syncs_keys() {
        let alumno = cliente::Model::new("99999999Z", "Alumno Demo", "a@example.com");
        let mut completo = ClienteCompleto::new(alumno);
        let info = informacion_fiscal::Model::new("", "600111222", "C/ Demo 1");
        completo.set_informacion_fiscal(info);
        assert_eq!(
            completo.informacion_fiscal.as_ref().unwrap().nif_cif,
            "99999999Z"
        );

        let pedido = CompraConLineas::new(compra::Model::new(5, "OTRO", None, None, "", 0.0));
        assert!(completo.add_compra(pedido.clone()));
        assert!(!completo.add_compra(pedido));
        assert_eq!(completo.compras[0].compra.id_cliente, "99999999Z");

        let removed = completo.remove_compra(5).unwrap();
        assert!(removed.compra.id_cliente.is_empty());
        assert!(completo.compras.is_empty());
    }

    #[tokio::test]
    async fn test_create_cliente_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_cliente(
            &db,
            ClienteCompleto::new(cliente::Model::new("   ", "Nadie", "n@example.com")),
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_then_lookup_returns_equal_cliente() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_test_cliente(&db, "12345678A").await?;
        let found = get_cliente_by_nif(&db, "12345678A").await?.unwrap();

        assert_eq!(found, created.cliente);
        assert!(found.same_identity(&created.cliente));
        assert_eq!(found.fecha_creacion, Some(chrono::Utc::now().date_naive()));

        // Whitespace around the key does not matter for lookups
        assert!(get_cliente_by_nif(&db, " 12345678A ").await?.is_some());
        assert!(get_cliente_by_nif(&db, "").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_cliente_gets_fiscal_info() -> Result<()> {
        let db = setup_test_db().await?;

        // No fiscal info supplied: an empty row is created
        let created = create_cliente(
            &db,
            ClienteCompleto::new(cliente::Model::new("B1", "Empresa", "e@example.com")),
        )
        .await?;
        let info = created.informacion_fiscal.unwrap();
        assert_eq!(info.nif_cif, "B1");
        assert!(info.telefono.is_empty());

        let loaded = get_cliente_completo(&db, "B1").await?.unwrap();
        assert_eq!(loaded.informacion_fiscal.unwrap().nif_cif, "B1");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_cliente_duplicate() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_cliente(&db, "12345678A").await?;

        let result = create_test_cliente(&db, "12345678A").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ClienteDuplicado { nif_cif } if nif_cif == "12345678A"
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_cliente_with_compras() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_articulo(&db, 1, 10.0).await?;

        let mut completo =
            ClienteCompleto::new(cliente::Model::new("C1", "Con Compra", "c@example.com"));
        let mut pedido = CompraConLineas::new(compra::Model::new(0, "", None, None, "x", 0.0));
        pedido.add_linea(compra_core::build_linea(&db, 1, 3).await?);
        completo.add_compra(pedido);

        let created = create_cliente(&db, completo).await?;
        assert_eq!(created.compras.len(), 1);
        assert_eq!(created.compras[0].compra.id_cliente, "C1");
        assert_eq!(created.compras[0].compra.precio_total, 30.0);

        let loaded = get_cliente_completo(&db, "C1").await?.unwrap();
        assert_eq!(loaded.compras.len(), 1);
        assert_eq!(loaded.compras[0].lineas.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_cliente_merges_and_keeps_fecha_creacion() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_cliente(&db, "12345678A").await?;
        let fecha = created.cliente.fecha_creacion;
        assert!(fecha.is_some());

        let updated = update_cliente(
            &db,
            "12345678A",
            ClienteChanges {
                email: Some(" nuevo@example.com ".to_string()),
                telefono: Some("699000000".to_string()),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.cliente.email, "nuevo@example.com");
        assert_eq!(
            updated.cliente.nombre_completo,
            created.cliente.nombre_completo
        );
        assert_eq!(updated.cliente.fecha_creacion, fecha);
        assert_eq!(updated.informacion_fiscal.unwrap().telefono, "699000000");

        Ok(())
    }

    #[tokio::test]
    async fn test_fecha_creacion_cannot_be_overwritten() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_cliente(&db, "12345678A").await?;
        let original = created.cliente.fecha_creacion;

        let mut tampered = created.cliente.clone();
        tampered.fecha_creacion = chrono::NaiveDate::from_ymd_opt(2000, 1, 1);
        cliente::ActiveModel::from(tampered)
            .reset_all()
            .update(&db)
            .await?;

        let stored = get_cliente_by_nif(&db, "12345678A").await?.unwrap();
        assert_eq!(stored.fecha_creacion, original);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_cliente_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = update_cliente(&db, "NADIE", ClienteChanges::default()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ClienteNotFound { nif_cif: _ }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_cliente_recreates_missing_fiscal_info() -> Result<()> {
        let (db, cliente) = setup_with_cliente().await?;
        InformacionFiscal::delete_by_id(cliente.nif_cif.clone())
            .exec(&db)
            .await?;

        let updated = update_cliente(
            &db,
            &cliente.nif_cif,
            ClienteChanges {
                telefono: Some("699000111".to_string()),
                ..Default::default()
            },
        )
        .await?;

        let info = updated.informacion_fiscal.unwrap();
        assert_eq!(info.nif_cif, cliente.nif_cif);
        assert_eq!(info.telefono, "699000111");
        assert!(info.direccion.is_empty());

        let stored = InformacionFiscal::find_by_id(cliente.nif_cif.clone())
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(stored, info);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_cliente_cascades() -> Result<()> {
        let (db, cliente) = setup_with_cliente().await?;
        create_test_articulo(&db, 1, 10.0).await?;
        create_test_compra(&db, 1, &cliente.nif_cif).await?;
        compra_core::add_linea_to_compra(&db, 1, 1, 2).await?;

        let removed = delete_cliente(&db, &cliente.nif_cif).await?;
        assert_eq!(removed, 1);

        assert!(get_cliente_by_nif(&db, &cliente.nif_cif).await?.is_none());
        let info = InformacionFiscal::find_by_id(cliente.nif_cif.clone())
            .one(&db)
            .await?;
        assert!(info.is_none());
        assert!(compra_core::list_compras(&db).await?.is_empty());
        assert!(ArticuloCompra::find().all(&db).await?.is_empty());
        assert!(articulo::get_articulo_by_id(&db, 1).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_clientes_with_info() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_cliente(&db, "B2").await?;
        create_test_cliente(&db, "A1").await?;

        let clientes = list_clientes(&db).await?;
        assert_eq!(clientes.len(), 2);
        assert_eq!(clientes[0].0.nif_cif, "A1");
        assert!(clientes.iter().all(|(_, info)| info.is_some()));
        Ok(())
    }
}
