//! `ArticuloCompra` entity - One line of a purchase.
//!
//! Identified by the (`id_compra`, `id_articulo`) pair. `precio_compra` is the unit price
//! copied from the article when the line was built and is never refreshed afterwards.

use super::{non_negative_f64, non_negative_i32, positive_id};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase line database model
///
/// The derived `PartialEq` compares every field. Two lines are the same line when
/// their [`Model::key`] pairs are equal, whatever their units or price.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "articulo_compra")]
pub struct Model {
    /// Purchase this line belongs to (0 while detached)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id_compra: i32,
    /// Article being bought
    #[sea_orm(primary_key, auto_increment = false)]
    pub id_articulo: i32,
    /// Units bought
    pub unidades: i32,
    /// Unit price at purchase time
    pub precio_compra: f64,
}

impl Model {
    /// Builds a line, zeroing bad ids and clamping negative amounts.
    #[must_use]
    pub fn new(id_compra: i32, id_articulo: i32, unidades: i32, precio_compra: f64) -> Self {
        Self {
            id_compra: positive_id(id_compra),
            id_articulo: positive_id(id_articulo),
            unidades: non_negative_i32(unidades),
            precio_compra: non_negative_f64(precio_compra),
        }
    }

    /// The (`id_compra`, `id_articulo`) identity of this line.
    #[must_use]
    pub const fn key(&self) -> (i32, i32) {
        (self.id_compra, self.id_articulo)
    }

    /// Whether both ends of the line point at something.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.id_compra > 0 && self.id_articulo > 0
    }

    /// Sets the owning purchase id; non-positive values detach the line.
    pub fn set_id_compra(&mut self, id_compra: i32) {
        self.id_compra = positive_id(id_compra);
    }

    /// Sets the units; negative values become 0.
    pub fn set_unidades(&mut self, unidades: i32) {
        self.unidades = non_negative_i32(unidades);
    }

    /// Sets the unit price; negative values become 0.
    pub fn set_precio_compra(&mut self, precio_compra: f64) {
        self.precio_compra = non_negative_f64(precio_compra);
    }

    /// `unidades × precio_compra`
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        f64::from(self.unidades) * self.precio_compra
    }
}

/// Defines relationships between `ArticuloCompra` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one purchase
    #[sea_orm(
        belongs_to = "super::compra::Entity",
        from = "Column::IdCompra",
        to = "super::compra::Column::Id",
        on_delete = "Cascade"
    )]
    Compra,
    /// Each line refers to one article
    #[sea_orm(
        belongs_to = "super::articulo::Entity",
        from = "Column::IdArticulo",
        to = "super::articulo::Column::Id",
        on_delete = "Cascade"
    )]
    Articulo,
}

impl Related<super::compra::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Compra.def()
    }
}

impl Related<super::articulo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Articulo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_clamps_amounts() {
        let linea = Model::new(1, 2, -3, -9.99);
        assert_eq!(linea.unidades, 0);
        assert_eq!(linea.precio_compra, 0.0);
        assert_eq!(linea.subtotal(), 0.0);
    }

    #[test]
    fn test_key_identifies_by_pair_only() {
        let a = Model::new(100, 11, 3, 12.0);
        let b = Model::new(100, 11, 1, 10.0);
        let c = Model::new(100, 10, 3, 12.0);

        let keys: HashSet<(i32, i32)> = [a.key(), b.key(), c.key()].into_iter().collect();
        assert_eq!(keys.len(), 2);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_detached_line() {
        let mut linea = Model::new(0, 11, 1, 5.0);
        assert!(!linea.is_attached());
        linea.set_id_compra(7);
        assert!(linea.is_attached());
        linea.set_id_compra(-1);
        assert_eq!(linea.id_compra, 0);
    }

    #[test]
    fn test_subtotal() {
        assert_eq!(Model::new(1, 1, 2, 10.0).subtotal(), 20.0);
        assert_eq!(Model::new(1, 2, 1, 5.0).subtotal(), 5.0);
    }
}
