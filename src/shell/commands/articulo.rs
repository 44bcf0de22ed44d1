//! Article actions: create and update.

use crate::core::articulo::{ArticuloChanges, create_articulo, get_articulo_by_id, update_articulo};
use crate::entities::articulo;
use crate::errors::{Error, Result};
use crate::shell::{Shell, render};
use sea_orm::TransactionTrait;
use std::io::{BufRead, Write};
use tracing::{info, instrument};

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Asks for every field of a new article and stores it.
    #[instrument(skip(self))]
    pub(in crate::shell) async fn crear_articulo(&mut self) -> Result<()> {
        info!("Crear artículo requested");
        let id = self.read_i32("ID")?;
        let nombre = self.read_line("Nombre")?;
        let descripcion = self.read_line("Descripción")?;
        let precio_actual = self.read_f64("Precio")?;
        let stock = self.read_i32("Stock")?;

        let txn = self.database.begin().await?;
        let creado = create_articulo(
            &txn,
            articulo::Model::new(id, &nombre, &descripcion, precio_actual, stock),
        )
        .await?;
        txn.commit().await?;

        writeln!(
            self.output,
            "✅ Artículo creado: {}",
            render::articulo(&creado)
        )?;
        Ok(())
    }

    /// Shows an article and asks for replacement values; ENTER keeps each one.
    #[instrument(skip(self))]
    pub(in crate::shell) async fn actualizar_articulo(&mut self) -> Result<()> {
        info!("Actualizar artículo requested");
        let id = self.read_i32("ID del artículo")?;
        let actual = get_articulo_by_id(&self.database, id)
            .await?
            .ok_or(Error::ArticuloNotFound { id })?;
        writeln!(self.output, "{}", render::articulo(&actual))?;

        let changes = ArticuloChanges {
            nombre: self.read_optional("Nombre", &actual.nombre)?,
            descripcion: self.read_optional("Descripción", &actual.descripcion)?,
            precio_actual: self.read_optional_f64("Precio", actual.precio_actual)?,
            stock: self.read_optional_i32("Stock", actual.stock)?,
        };
        if changes.is_empty() {
            writeln!(self.output, "Sin cambios")?;
            return Ok(());
        }

        let txn = self.database.begin().await?;
        let actualizado = update_articulo(&txn, id, changes).await?;
        txn.commit().await?;

        writeln!(
            self.output,
            "✅ Artículo actualizado: {}",
            render::articulo(&actualizado)
        )?;
        Ok(())
    }
}
