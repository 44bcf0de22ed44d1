//! Unified error type for the access layer, configuration and shell.

use sea_orm::DbErr;
use thiserror::Error;

/// Every failure the application can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Persistence failure: constraint violation, connectivity, bad SQL
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// I/O error while talking to the console or the filesystem
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Text that should have been a number (or similar) was not
    #[error("Invalid value for {field}: '{value}'")]
    InvalidInput {
        /// Name of the field being read
        field: String,
        /// Raw text as typed
        value: String,
    },

    /// A value that passed parsing but cannot be stored
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description
        message: String,
    },

    /// No article with this id
    #[error("Artículo {id} no encontrado")]
    ArticuloNotFound {
        /// Requested id
        id: i32,
    },

    /// An article with this id already exists
    #[error("Ya existe un artículo con id {id}")]
    ArticuloDuplicado {
        /// Conflicting id
        id: i32,
    },

    /// No client with this NIF/CIF
    #[error("Cliente '{nif_cif}' no encontrado")]
    ClienteNotFound {
        /// Requested NIF/CIF
        nif_cif: String,
    },

    /// A client with this NIF/CIF already exists
    #[error("Ya existe un cliente con NIF/CIF '{nif_cif}'")]
    ClienteDuplicado {
        /// Conflicting NIF/CIF
        nif_cif: String,
    },

    /// No purchase with this id
    #[error("Compra {id} no encontrada")]
    CompraNotFound {
        /// Requested id
        id: i32,
    },

    /// The purchase has no line for this article
    #[error("La compra {id_compra} no contiene el artículo {id_articulo}")]
    LineaNotFound {
        /// Purchase id
        id_compra: i32,
        /// Article id
        id_articulo: i32,
    },

    /// Unrecognised purchase status text
    #[error(
        "Estado de compra no válido: '{value}' (use PENDIENTE, ENVIADO o ENTREGADO)"
    )]
    InvalidEstado {
        /// Raw text as typed
        value: String,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
