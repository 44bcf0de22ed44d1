//! `InformacionFiscal` entity - Fiscal contact data of a client.
//!
//! The row shares its primary key with the owning client: `nif_cif` is both the id
//! and the foreign key to `clientes`. It only exists alongside its client.

use super::trimmed;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fiscal info database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "informacion_fiscal")]
pub struct Model {
    /// NIF/CIF of the owning client
    #[sea_orm(primary_key, auto_increment = false)]
    pub nif_cif: String,
    /// Contact phone
    pub telefono: String,
    /// Fiscal address
    pub direccion: String,
}

impl Model {
    /// Builds fiscal info with trimmed fields.
    #[must_use]
    pub fn new(nif_cif: &str, telefono: &str, direccion: &str) -> Self {
        Self {
            nif_cif: trimmed(nif_cif),
            telefono: trimmed(telefono),
            direccion: trimmed(direccion),
        }
    }

    /// Points this row at a client, copying its NIF/CIF.
    pub fn attach_to(&mut self, cliente: &super::cliente::Model) {
        self.nif_cif.clone_from(&cliente.nif_cif);
    }

    /// Sets the phone, trimmed.
    pub fn set_telefono(&mut self, telefono: &str) {
        self.telefono = trimmed(telefono);
    }

    /// Sets the address, trimmed.
    pub fn set_direccion(&mut self, direccion: &str) {
        self.direccion = trimmed(direccion);
    }
}

/// Defines relationships between `InformacionFiscal` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each fiscal info row belongs to exactly one client
    #[sea_orm(
        belongs_to = "super::cliente::Entity",
        from = "Column::NifCif",
        to = "super::cliente::Column::NifCif",
        on_delete = "Cascade"
    )]
    Cliente,
}

impl Related<super::cliente::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cliente.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::cliente;

    #[test]
    fn test_attach_copies_client_key() {
        let cliente = cliente::Model::new("99999999Z", "Alumno Demo", "alumno@example.com");
        let mut info = Model::new("otro", " 600111222 ", " C/ Demo 1 ");
        info.attach_to(&cliente);
        assert_eq!(info.nif_cif, "99999999Z");
        assert_eq!(info.telefono, "600111222");
        assert_eq!(info.direccion, "C/ Demo 1");
    }
}
