//! Compra entity - A purchase made by a client.
//!
//! Each purchase has a caller- or sequence-assigned id, the owning client's NIF/CIF,
//! a timestamp, a shipping status, a shipping address and the total price. The total
//! is written by the access layer from the purchase lines; see `core::compra`.

use super::{non_negative_f64, positive_id, trimmed};
use crate::errors::Error;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Shipping status of a purchase, stored as its upper-case name
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum EstadoCompra {
    /// Placed, not shipped yet
    #[default]
    #[sea_orm(string_value = "PENDIENTE")]
    Pendiente,
    /// Handed to the carrier
    #[sea_orm(string_value = "ENVIADO")]
    Enviado,
    /// Received by the client
    #[sea_orm(string_value = "ENTREGADO")]
    Entregado,
}

impl EstadoCompra {
    /// Upper-case name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pendiente => "PENDIENTE",
            Self::Enviado => "ENVIADO",
            Self::Entregado => "ENTREGADO",
        }
    }
}

impl fmt::Display for EstadoCompra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstadoCompra {
    type Err = Error;

    /// Case-insensitive, surrounding whitespace ignored. Anything else is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDIENTE" => Ok(Self::Pendiente),
            "ENVIADO" => Ok(Self::Enviado),
            "ENTREGADO" => Ok(Self::Entregado),
            _ => Err(Error::InvalidEstado {
                value: s.to_string(),
            }),
        }
    }
}

/// Compra database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "compras")]
pub struct Model {
    /// Purchase id
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// NIF/CIF of the client who bought
    pub id_cliente: String,
    /// When the purchase was made
    pub fecha_compra: DateTimeUtc,
    /// Shipping status
    pub estado: EstadoCompra,
    /// Shipping address
    pub direccion: String,
    /// Sum of the line subtotals
    pub precio_total: f64,
}

impl Model {
    /// Builds a purchase; a missing date means now and a missing status means PENDIENTE.
    #[must_use]
    pub fn new(
        id: i32,
        id_cliente: &str,
        fecha_compra: Option<DateTimeUtc>,
        estado: Option<EstadoCompra>,
        direccion: &str,
        precio_total: f64,
    ) -> Self {
        Self {
            id: positive_id(id),
            id_cliente: trimmed(id_cliente),
            fecha_compra: fecha_compra.unwrap_or_else(chrono::Utc::now),
            estado: estado.unwrap_or_default(),
            direccion: trimmed(direccion),
            precio_total: non_negative_f64(precio_total),
        }
    }

    /// Sets the id; non-positive values become 0.
    pub fn set_id(&mut self, id: i32) {
        self.id = positive_id(id);
    }

    /// Points the purchase at a client.
    pub fn set_cliente(&mut self, cliente: &super::cliente::Model) {
        self.id_cliente.clone_from(&cliente.nif_cif);
    }

    /// Sets the date; `None` means now.
    pub fn set_fecha_compra(&mut self, fecha_compra: Option<DateTimeUtc>) {
        self.fecha_compra = fecha_compra.unwrap_or_else(chrono::Utc::now);
    }

    /// Sets the status; `None` means PENDIENTE.
    pub fn set_estado(&mut self, estado: Option<EstadoCompra>) {
        self.estado = estado.unwrap_or_default();
    }

    /// Sets the shipping address, trimmed.
    pub fn set_direccion(&mut self, direccion: &str) {
        self.direccion = trimmed(direccion);
    }

    /// Sets the total; negative values become 0.
    pub fn set_precio_total(&mut self, precio_total: f64) {
        self.precio_total = non_negative_f64(precio_total);
    }
}

/// Defines relationships between Compra and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each purchase belongs to one client
    #[sea_orm(
        belongs_to = "super::cliente::Entity",
        from = "Column::IdCliente",
        to = "super::cliente::Column::NifCif",
        on_delete = "Cascade"
    )]
    Cliente,
    /// One purchase has many lines
    #[sea_orm(has_many = "super::articulo_compra::Entity")]
    ArticuloCompra,
}

impl Related<super::cliente::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cliente.def()
    }
}

impl Related<super::articulo_compra::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArticuloCompra.def()
    }
}

impl Related<super::articulo::Entity> for Entity {
    fn to() -> RelationDef {
        super::articulo_compra::Relation::Articulo.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::articulo_compra::Relation::Compra.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
