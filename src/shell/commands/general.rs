//! Full listing.

use crate::core::report::generate_listing;
use crate::errors::Result;
use crate::shell::{Shell, render};
use sea_orm::TransactionTrait;
use std::io::{BufRead, Write};
use tracing::{info, instrument};

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Prints every article, client and purchase.
    #[instrument(skip(self))]
    pub(in crate::shell) async fn listar_todo(&mut self) -> Result<()> {
        info!("Listar todo requested");
        let txn = self.database.begin().await?;
        let listing = generate_listing(&txn).await?;
        txn.commit().await?;

        write!(self.output, "{}", render::listing(&listing))?;
        Ok(())
    }
}
