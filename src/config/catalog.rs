//! Article catalogue loading from config.toml
//!
//! The catalogue lists articles that should exist when the application starts.
//! Entries whose id is already stored are left alone, so editing the file never
//! overwrites prices or stock changed from the menu.

use crate::entities::articulo;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Catalogue used when `CATALOG_PATH` is not set
pub const DEFAULT_CATALOG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Articles to seed
    #[serde(default)]
    pub articulos: Vec<ArticuloConfig>,
}

/// Configuration for a single article
#[derive(Debug, Deserialize, Clone)]
pub struct ArticuloConfig {
    /// Article id (must be positive)
    pub id: i32,
    /// Name
    pub nombre: String,
    /// Description
    #[serde(default)]
    pub descripcion: String,
    /// Unit price
    pub precio_actual: f64,
    /// Initial stock
    #[serde(default)]
    pub stock: i32,
}

impl ArticuloConfig {
    /// Normalised article built from this entry.
    #[must_use]
    pub fn to_model(&self) -> articulo::Model {
        articulo::Model::new(
            self.id,
            &self.nombre,
            &self.descripcion,
            self.precio_actual,
            self.stock,
        )
    }
}

/// Loads the catalogue from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load catalogue from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read catalogue file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses catalogue TOML text.
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalogue: {e}"),
    })
}

/// Loads the catalogue named by `CATALOG_PATH` (default `./config.toml`).
///
/// A missing file is not an error and yields an empty catalogue; a file that exists
/// but cannot be parsed is.
pub fn load_default_config() -> Result<Config> {
    let path = std::env::var("CATALOG_PATH").unwrap_or_else(|_| DEFAULT_CATALOG_PATH.to_string());
    if !Path::new(&path).exists() {
        tracing::info!("No catalogue at {}, nothing to seed", path);
        return Ok(Config::default());
    }
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_catalog_config() {
        let toml_str = r#"
            [[articulos]]
            id = 10
            nombre = "Libro"
            descripcion = "Libro de Rust"
            precio_actual = 29.5
            stock = 20

            [[articulos]]
            id = 11
            nombre = "Pendrive"
            precio_actual = -12.0
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.articulos.len(), 2);
        assert_eq!(config.articulos[0].nombre, "Libro");
        assert_eq!(config.articulos[0].stock, 20);
        assert!(config.articulos[1].descripcion.is_empty());

        // Negative price is clamped when turned into a model
        let model = config.articulos[1].to_model();
        assert_eq!(model.precio_actual, 0.0);
        assert_eq!(model.stock, 0);
    }

    #[test]
    fn test_empty_file_is_empty_catalog() {
        let config = parse_config("").unwrap();
        assert!(config.articulos.is_empty());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = parse_config("[[articulos]]\nid = \"diez\"");
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = load_config("definitely/not/here.toml");
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
    }
}
