//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations,
//! plus constructors and setters that normalise scalar fields.

pub mod articulo;
pub mod articulo_compra;
pub mod cliente;
pub mod compra;
pub mod informacion_fiscal;

// Re-export specific types to avoid conflicts
pub use articulo::{Column as ArticuloColumn, Entity as Articulo, Model as ArticuloModel};
pub use articulo_compra::{
    Column as ArticuloCompraColumn, Entity as ArticuloCompra, Model as ArticuloCompraModel,
};
pub use cliente::{ClienteKey, Column as ClienteColumn, Entity as Cliente, Model as ClienteModel};
pub use compra::{Column as CompraColumn, Entity as Compra, EstadoCompra, Model as CompraModel};
pub use informacion_fiscal::{
    Column as InformacionFiscalColumn, Entity as InformacionFiscal, Model as InformacionFiscalModel,
};

/// Trims surrounding whitespace into an owned string.
pub(crate) fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

/// Ids must be positive; anything else collapses to 0 ("unassigned").
pub(crate) const fn positive_id(id: i32) -> i32 {
    if id > 0 { id } else { 0 }
}

pub(crate) const fn non_negative_i32(value: i32) -> i32 {
    if value >= 0 { value } else { 0 }
}

// NaN fails the comparison too and is stored as 0
pub(crate) fn non_negative_f64(value: f64) -> f64 {
    if value >= 0.0 { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_normalisation_helpers() {
        assert_eq!(positive_id(5), 5);
        assert_eq!(positive_id(0), 0);
        assert_eq!(positive_id(-3), 0);
        assert_eq!(non_negative_i32(-1), 0);
        assert_eq!(non_negative_f64(-0.01), 0.0);
        assert_eq!(non_negative_f64(f64::NAN), 0.0);
        assert_eq!(non_negative_f64(2.5), 2.5);
        assert_eq!(trimmed("  a b  "), "a b");
    }
}
