//! Listing generation business logic.
//!
//! Gathers every article, client and purchase into one structured snapshot that the
//! shell formats for display. The snapshot also flags purchases whose stored total
//! no longer matches their lines, which can only happen if rows were edited outside
//! the access layer.

use crate::{
    core::{articulo, cliente, compra, compra::CompraConLineas},
    entities::{articulo as articulo_entity, cliente as cliente_entity, informacion_fiscal},
    errors::Result,
};
use sea_orm::ConnectionTrait;

/// Tolerance when comparing a stored total with the sum of its lines
const TOTAL_EPSILON: f64 = 0.005;

/// Everything stored, ready for display.
#[derive(Debug, Clone)]
pub struct Listing {
    /// Every article, by id
    pub articulos: Vec<articulo_entity::Model>,
    /// Every client with its fiscal info, by NIF/CIF
    pub clientes: Vec<(cliente_entity::Model, Option<informacion_fiscal::Model>)>,
    /// Every purchase with its lines, by id
    pub compras: Vec<CompraConLineas>,
    /// Purchases whose stored total differs from their lines
    pub inconsistencias: Vec<TotalMismatch>,
}

/// A purchase whose stored total disagrees with its lines.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalMismatch {
    /// Purchase id
    pub id_compra: i32,
    /// Total as stored
    pub stored: f64,
    /// Sum of the line subtotals
    pub expected: f64,
}

/// Collects the full listing.
pub async fn generate_listing<C>(db: &C) -> Result<Listing>
where
    C: ConnectionTrait,
{
    let articulos = articulo::list_articulos(db).await?;
    let clientes = cliente::list_clientes(db).await?;
    let compras = compra::list_compras(db).await?;
    let inconsistencias = find_total_mismatches(&compras);

    if !inconsistencias.is_empty() {
        tracing::warn!(
            "{} compras have a stored total that does not match their lines",
            inconsistencias.len()
        );
    }

    Ok(Listing {
        articulos,
        clientes,
        compras,
        inconsistencias,
    })
}

/// Compares each purchase's stored total with the sum of its lines.
#[must_use]
pub fn find_total_mismatches(compras: &[CompraConLineas]) -> Vec<TotalMismatch> {
    compras
        .iter()
        .filter_map(|pedido| {
            let expected = pedido.total();
            let stored = pedido.compra.precio_total;
            ((stored - expected).abs() > TOTAL_EPSILON).then_some(TotalMismatch {
                id_compra: pedido.compra.id,
                stored,
                expected,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::{articulo_compra, compra as compra_entity};
    use crate::test_utils::*;
    use sea_orm::{ActiveModelTrait, Set};

    #[test]
    fn test_find_total_mismatches() {
        let mut ok = CompraConLineas::new(compra_entity::Model::new(1, "A", None, None, "", 25.0));
        ok.add_linea(articulo_compra::Model::new(0, 1, 2, 10.0));
        ok.add_linea(articulo_compra::Model::new(0, 2, 1, 5.0));

        let mut bad = CompraConLineas::new(compra_entity::Model::new(2, "A", None, None, "", 3.0));
        bad.add_linea(articulo_compra::Model::new(0, 1, 1, 10.0));

        let mismatches = find_total_mismatches(&[ok, bad]);
        assert_eq!(
            mismatches,
            vec![TotalMismatch {
                id_compra: 2,
                stored: 3.0,
                expected: 10.0
            }]
        );
    }

    #[tokio::test]
    async fn test_generate_listing() -> Result<()> {
        let (db, cliente) = setup_with_cliente().await?;
        create_test_articulo(&db, 1, 10.0).await?;
        create_test_compra(&db, 1, &cliente.nif_cif).await?;
        compra::add_linea_to_compra(&db, 1, 1, 2).await?;

        let listing = generate_listing(&db).await?;
        assert_eq!(listing.articulos.len(), 1);
        assert_eq!(listing.clientes.len(), 1);
        assert_eq!(listing.compras.len(), 1);
        assert!(listing.inconsistencias.is_empty());

        // Tamper with the stored total behind the access layer's back
        let found = compra::get_compra_by_id(&db, 1).await?.unwrap();
        let mut stored: compra_entity::ActiveModel = found.into();
        stored.precio_total = Set(1.0);
        stored.update(&db).await?;

        let listing = generate_listing(&db).await?;
        assert_eq!(listing.inconsistencias.len(), 1);
        assert_eq!(listing.inconsistencias[0].expected, 20.0);
        Ok(())
    }
}
