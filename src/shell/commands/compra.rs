//! Purchase actions: create with lines, change estado, delete.

use crate::core::cliente::get_cliente_completo;
use crate::core::compra::{
    CompraConLineas, build_linea, create_compra, delete_compra, get_compra_by_id,
    update_estado_compra,
};
use crate::entities::{EstadoCompra, compra};
use crate::errors::{Error, Result};
use crate::shell::prompt::parse_i32;
use crate::shell::{Shell, render};
use sea_orm::TransactionTrait;
use std::io::{BufRead, Write};
use tracing::{info, instrument, warn};

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Builds a purchase for an existing client from article id / units pairs.
    ///
    /// An empty address falls back to the client's fiscal address, an empty estado to
    /// PENDIENTE. Lines are read until an empty article id.
    #[instrument(skip(self))]
    pub(in crate::shell) async fn crear_compra(&mut self) -> Result<()> {
        info!("Crear compra requested");
        let nif_cif = self.read_line("NIF/CIF del cliente")?;
        let cliente = get_cliente_completo(&self.database, &nif_cif)
            .await?
            .ok_or_else(|| Error::ClienteNotFound {
                nif_cif: nif_cif.clone(),
            })?;

        let direccion_fiscal = cliente
            .informacion_fiscal
            .as_ref()
            .map(|info| info.direccion.clone())
            .unwrap_or_default();
        let direccion = self
            .read_optional("Dirección de envío", &direccion_fiscal)?
            .unwrap_or(direccion_fiscal);
        let estado = match self.read_optional("Estado", EstadoCompra::default().as_str())? {
            Some(raw) => raw.parse::<EstadoCompra>()?,
            None => EstadoCompra::default(),
        };

        writeln!(self.output, "Añada artículos (ID vacío para terminar)")?;
        let mut pedidas = Vec::new();
        loop {
            let raw = self.read_line("ID artículo")?;
            if raw.is_empty() {
                break;
            }
            let id_articulo = parse_i32("ID artículo", &raw)?;
            let unidades = self.read_i32("Unidades")?;
            pedidas.push((id_articulo, unidades));
        }

        let txn = self.database.begin().await?;
        let nueva = compra::Model::new(
            0,
            &cliente.cliente.nif_cif,
            None,
            Some(estado),
            &direccion,
            0.0,
        );
        let mut pedido = CompraConLineas::new(nueva);
        for (id_articulo, unidades) in pedidas {
            let linea = build_linea(&txn, id_articulo, unidades).await?;
            if !pedido.add_linea(linea) {
                warn!("Artículo {} repeated in the same compra", id_articulo);
                writeln!(
                    self.output,
                    "⚠️ El artículo {id_articulo} ya está en la compra, se ignora la línea repetida"
                )?;
            }
        }
        let creada = create_compra(&txn, pedido).await?;
        txn.commit().await?;

        writeln!(self.output, "✅ Compra creada: {}", render::compra(&creada))?;
        Ok(())
    }

    /// Changes the estado of a purchase; an unknown estado leaves it untouched.
    #[instrument(skip(self))]
    pub(in crate::shell) async fn actualizar_estado_compra(&mut self) -> Result<()> {
        info!("Actualizar estado de compra requested");
        let id = self.read_i32("ID de la compra")?;
        let actual = get_compra_by_id(&self.database, id)
            .await?
            .ok_or(Error::CompraNotFound { id })?;
        writeln!(self.output, "Estado actual: {}", actual.estado)?;
        let estado = self.read_line("Nuevo estado (PENDIENTE, ENVIADO, ENTREGADO)")?;

        let txn = self.database.begin().await?;
        let actualizada = update_estado_compra(&txn, id, &estado).await?;
        txn.commit().await?;

        writeln!(
            self.output,
            "✅ Estado actualizado: compra {} ahora {}",
            actualizada.id, actualizada.estado
        )?;
        Ok(())
    }

    /// Deletes a purchase and its lines.
    #[instrument(skip(self))]
    pub(in crate::shell) async fn borrar_compra(&mut self) -> Result<()> {
        info!("Borrar compra requested");
        let id = self.read_i32("ID de la compra")?;

        let txn = self.database.begin().await?;
        let lineas = delete_compra(&txn, id).await?;
        txn.commit().await?;

        writeln!(self.output, "✅ Compra {id} borrada ({lineas} líneas)")?;
        Ok(())
    }
}
