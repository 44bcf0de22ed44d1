//! Client actions: create with fiscal info, and update.

use crate::core::cliente::{
    ClienteChanges, ClienteCompleto, create_cliente, get_cliente_completo, update_cliente,
};
use crate::entities::{cliente, informacion_fiscal};
use crate::errors::{Error, Result};
use crate::shell::{Shell, render};
use sea_orm::TransactionTrait;
use std::io::{BufRead, Write};
use tracing::{info, instrument};

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Asks for a new client and its fiscal info and stores both.
    #[instrument(skip(self))]
    pub(in crate::shell) async fn crear_cliente(&mut self) -> Result<()> {
        info!("Crear cliente requested");
        let nif_cif = self.read_line("NIF/CIF")?;
        let nombre_completo = self.read_line("Nombre completo")?;
        let email = self.read_line("Email")?;
        let telefono = self.read_line("Teléfono")?;
        let direccion = self.read_line("Dirección fiscal")?;

        let datos = cliente::Model::new(&nif_cif, &nombre_completo, &email);
        let mut nuevo = ClienteCompleto::new(datos);
        let info = informacion_fiscal::Model::new(&nif_cif, &telefono, &direccion);
        nuevo.set_informacion_fiscal(info);

        let txn = self.database.begin().await?;
        let creado = create_cliente(&txn, nuevo).await?;
        txn.commit().await?;

        writeln!(
            self.output,
            "✅ Cliente creado: {}",
            render::cliente(&creado.cliente, creado.informacion_fiscal.as_ref())
        )?;
        Ok(())
    }

    /// Shows a client and asks for replacement values; ENTER keeps each one.
    #[instrument(skip(self))]
    pub(in crate::shell) async fn actualizar_cliente(&mut self) -> Result<()> {
        info!("Actualizar cliente requested");
        let nif_cif = self.read_line("NIF/CIF del cliente")?;
        let actual = get_cliente_completo(&self.database, &nif_cif)
            .await?
            .ok_or_else(|| Error::ClienteNotFound {
                nif_cif: nif_cif.clone(),
            })?;
        writeln!(
            self.output,
            "{}",
            render::cliente(&actual.cliente, actual.informacion_fiscal.as_ref())
        )?;

        let (telefono, direccion) = actual
            .informacion_fiscal
            .as_ref()
            .map(|info| (info.telefono.as_str(), info.direccion.as_str()))
            .unwrap_or_default();

        let datos = &actual.cliente;
        let changes = ClienteChanges {
            nombre_completo: self.read_optional("Nombre completo", &datos.nombre_completo)?,
            email: self.read_optional("Email", &datos.email)?,
            telefono: self.read_optional("Teléfono", telefono)?,
            direccion: self.read_optional("Dirección fiscal", direccion)?,
        };

        let txn = self.database.begin().await?;
        let actualizado = update_cliente(&txn, &datos.nif_cif, changes).await?;
        txn.commit().await?;

        let info = actualizado.informacion_fiscal.as_ref();
        writeln!(
            self.output,
            "✅ Cliente actualizado: {}",
            render::cliente(&actualizado.cliente, info)
        )?;
        Ok(())
    }
}
