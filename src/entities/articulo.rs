//! Articulo entity - Represents a catalogue article that can be purchased.
//!
//! Each article has a caller-chosen positive id, a name, a description, the current
//! unit price and the units in stock. Prices and stock are clamped to zero when a
//! negative value is supplied, both on construction and through the setters.

use super::{non_negative_f64, non_negative_i32, positive_id, trimmed};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Articulo database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "articulos")]
pub struct Model {
    /// Article id, chosen by whoever registers the article
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// Short name (e.g., "Pendrive")
    pub nombre: String,
    /// Free-text description
    pub descripcion: String,
    /// Current unit price
    pub precio_actual: f64,
    /// Units available
    pub stock: i32,
}

impl Model {
    /// Builds an article, trimming text and clamping out-of-range numbers.
    ///
    /// A non-positive `id` becomes 0, which the access layer refuses to persist.
    #[must_use]
    pub fn new(id: i32, nombre: &str, descripcion: &str, precio_actual: f64, stock: i32) -> Self {
        Self {
            id: positive_id(id),
            nombre: trimmed(nombre),
            descripcion: trimmed(descripcion),
            precio_actual: non_negative_f64(precio_actual),
            stock: non_negative_i32(stock),
        }
    }

    /// Sets the id; non-positive values become 0.
    pub fn set_id(&mut self, id: i32) {
        self.id = positive_id(id);
    }

    /// Sets the name, trimmed.
    pub fn set_nombre(&mut self, nombre: &str) {
        self.nombre = trimmed(nombre);
    }

    /// Sets the description, trimmed.
    pub fn set_descripcion(&mut self, descripcion: &str) {
        self.descripcion = trimmed(descripcion);
    }

    /// Sets the unit price; negative values become 0.
    pub fn set_precio_actual(&mut self, precio_actual: f64) {
        self.precio_actual = non_negative_f64(precio_actual);
    }

    /// Sets the stock; negative values become 0.
    pub fn set_stock(&mut self, stock: i32) {
        self.stock = non_negative_i32(stock);
    }
}

/// Defines relationships between Articulo and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One article appears in many purchase lines
    #[sea_orm(has_many = "super::articulo_compra::Entity")]
    ArticuloCompra,
}

impl Related<super::articulo_compra::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArticuloCompra.def()
    }
}

// Articles reach purchases through the articulo_compra join table
impl Related<super::compra::Entity> for Entity {
    fn to() -> RelationDef {
        super::articulo_compra::Relation::Compra.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::articulo_compra::Relation::Articulo.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_new_clamps_negative_price_and_stock() {
        let articulo = Model::new(1, "Libro", "Libro de Rust", -3.5, -7);
        assert_eq!(articulo.precio_actual, 0.0);
        assert_eq!(articulo.stock, 0);
    }

    #[test]
    fn test_new_trims_text_and_zeroes_bad_id() {
        let articulo = Model::new(-4, "  Pendrive ", "\t32GB  ", 12.0, 100);
        assert_eq!(articulo.id, 0);
        assert_eq!(articulo.nombre, "Pendrive");
        assert_eq!(articulo.descripcion, "32GB");
        assert_eq!(articulo.precio_actual, 12.0);
        assert_eq!(articulo.stock, 100);
    }

    #[test]
    fn test_setters_revalidate() {
        let mut articulo = Model::new(11, "Pendrive", "32GB", 12.0, 100);
        articulo.set_precio_actual(-1.0);
        articulo.set_stock(-10);
        articulo.set_nombre("  Pendrive USB  ");
        assert_eq!(articulo.precio_actual, 0.0);
        assert_eq!(articulo.stock, 0);
        assert_eq!(articulo.nombre, "Pendrive USB");

        articulo.set_precio_actual(10.0);
        articulo.set_stock(99);
        assert_eq!(articulo.precio_actual, 10.0);
        assert_eq!(articulo.stock, 99);
    }
}
