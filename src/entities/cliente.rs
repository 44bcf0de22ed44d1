//! Cliente entity - A customer identified by their NIF/CIF.
//!
//! `fecha_creacion` is stamped by the save hook the first time the row is inserted
//! and is dropped from every later update, so it never changes once written.
//! Each client owns one [`super::informacion_fiscal`] row and any number of purchases.

use super::trimmed;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

/// Cliente database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clientes")]
pub struct Model {
    /// NIF/CIF, the natural primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub nif_cif: String,
    /// Full name
    pub nombre_completo: String,
    /// Contact e-mail
    pub email: String,
    /// Day the client was first stored
    pub fecha_creacion: Option<Date>,
}

/// Identity of a client.
///
/// A blank NIF/CIF is `Unassigned`. Unassigned keys are never equal to anything,
/// including each other; [`Model::same_identity`] falls back to reference identity
/// for such clients.
#[derive(Clone, Debug)]
pub enum ClienteKey {
    /// No NIF/CIF yet
    Unassigned,
    /// Trimmed, non-empty NIF/CIF
    Assigned(String),
}

impl ClienteKey {
    /// Classifies raw NIF/CIF text.
    #[must_use]
    pub fn from_raw(nif_cif: &str) -> Self {
        let nif_cif = nif_cif.trim();
        if nif_cif.is_empty() {
            Self::Unassigned
        } else {
            Self::Assigned(nif_cif.to_string())
        }
    }

    /// The NIF/CIF, if one is assigned.
    #[must_use]
    pub fn as_assigned(&self) -> Option<&str> {
        match self {
            Self::Assigned(nif_cif) => Some(nif_cif),
            Self::Unassigned => None,
        }
    }
}

impl PartialEq for ClienteKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Assigned(a), Self::Assigned(b)) => a == b,
            _ => false,
        }
    }
}

impl Model {
    /// Builds a client with trimmed fields and no creation date yet.
    #[must_use]
    pub fn new(nif_cif: &str, nombre_completo: &str, email: &str) -> Self {
        Self {
            nif_cif: trimmed(nif_cif),
            nombre_completo: trimmed(nombre_completo),
            email: trimmed(email),
            fecha_creacion: None,
        }
    }

    /// Identity of this client.
    #[must_use]
    pub fn key(&self) -> ClienteKey {
        ClienteKey::from_raw(&self.nif_cif)
    }

    /// Whether both values denote the same client.
    ///
    /// Clients with an assigned NIF/CIF compare by it; a client without one is only
    /// the same as itself.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || self.key() == other.key()
    }

    /// Sets the NIF/CIF, trimmed.
    pub fn set_nif_cif(&mut self, nif_cif: &str) {
        self.nif_cif = trimmed(nif_cif);
    }

    /// Sets the full name, trimmed.
    pub fn set_nombre_completo(&mut self, nombre_completo: &str) {
        self.nombre_completo = trimmed(nombre_completo);
    }

    /// Sets the e-mail, trimmed.
    pub fn set_email(&mut self, email: &str) {
        self.email = trimmed(email);
    }
}

/// Defines relationships between Cliente and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One client has exactly one fiscal info row
    #[sea_orm(has_one = "super::informacion_fiscal::Entity")]
    InformacionFiscal,
    /// One client has many purchases
    #[sea_orm(has_many = "super::compra::Entity")]
    Compras,
}

impl Related<super::informacion_fiscal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InformacionFiscal.def()
    }
}

impl Related<super::compra::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Compras.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            let missing = match &self.fecha_creacion {
                ActiveValue::Set(fecha) | ActiveValue::Unchanged(fecha) => fecha.is_none(),
                ActiveValue::NotSet => true,
            };
            if missing {
                self.fecha_creacion = Set(Some(chrono::Utc::now().date_naive()));
            }
        } else if self.fecha_creacion.is_set() {
            tracing::debug!("Ignoring change to fecha_creacion on update");
            self.fecha_creacion = ActiveValue::NotSet;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_fields() {
        let cliente = Model::new(" 99999999Z ", " Alumno Demo ", " alumno@example.com ");
        assert_eq!(cliente.nif_cif, "99999999Z");
        assert_eq!(cliente.nombre_completo, "Alumno Demo");
        assert_eq!(cliente.email, "alumno@example.com");
        assert!(cliente.fecha_creacion.is_none());
    }

    #[test]
    fn test_assigned_keys_compare_by_value() {
        let a = Model::new("12345678A", "Ana", "ana@example.com");
        let b = Model::new(" 12345678A", "Otra Ana", "otra@example.com");
        let c = Model::new("87654321B", "Ana", "ana@example.com");
        assert!(a.same_identity(&b));
        assert!(!a.same_identity(&c));
    }

    #[test]
    fn test_unassigned_keys_never_collide() {
        let a = Model::new("", "Ana", "ana@example.com");
        let b = Model::new("   ", "Ana", "ana@example.com");
        assert!(matches!(a.key(), ClienteKey::Unassigned));
        assert!(!a.same_identity(&b));
        assert!(!b.same_identity(&a));
        assert_ne!(ClienteKey::Unassigned, ClienteKey::Unassigned);
    }

    #[test]
    fn test_unassigned_client_is_itself() {
        let a = Model::new("", "Ana", "ana@example.com");
        let copia = a.clone();
        assert!(a.same_identity(&a));
        assert!(!a.same_identity(&copia));
    }

    #[test]
    fn test_key_as_assigned() {
        assert_eq!(ClienteKey::from_raw(" X1 ").as_assigned(), Some("X1"));
        assert_eq!(ClienteKey::from_raw("").as_assigned(), None);
    }
}
