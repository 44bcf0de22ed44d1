//! Text formatting of entities and listings.

use crate::core::compra::CompraConLineas;
use crate::core::report::Listing;
use crate::entities::{articulo, cliente, informacion_fiscal};

/// One-line article summary.
#[must_use]
pub fn articulo(articulo: &articulo::Model) -> String {
    format!(
        "[{}] {} - {} | {:.2} € | stock: {}",
        articulo.id, articulo.nombre, articulo.descripcion, articulo.precio_actual, articulo.stock
    )
}

/// Client summary with its fiscal info when present.
#[must_use]
pub fn cliente(cliente: &cliente::Model, info: Option<&informacion_fiscal::Model>) -> String {
    let alta = match cliente.fecha_creacion {
        Some(fecha) => fecha.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    };
    let mut line = format!(
        "[{}] {} <{}> | alta: {}",
        cliente.nif_cif, cliente.nombre_completo, cliente.email, alta
    );
    if let Some(info) = info {
        let fiscal = format!(" | tel: {} | dir: {}", info.telefono, info.direccion);
        line.push_str(&fiscal);
    }
    line
}

/// Purchase header followed by one indented line per article.
#[must_use]
pub fn compra(pedido: &CompraConLineas) -> String {
    let compra = &pedido.compra;
    let mut text = format!(
        "Compra {} | cliente: {} | {} | {} | envío: {} | total: {:.2} €",
        compra.id,
        compra.id_cliente,
        compra.fecha_compra.format("%Y-%m-%d %H:%M"),
        compra.estado,
        compra.direccion,
        compra.precio_total
    );
    for linea in &pedido.lineas {
        text.push_str(&format!(
            "\n    - artículo {} x{} a {:.2} € = {:.2} €",
            linea.id_articulo,
            linea.unidades,
            linea.precio_compra,
            linea.subtotal()
        ));
    }
    text
}

/// Full dump of the store, section by section.
#[must_use]
pub fn listing(listing: &Listing) -> String {
    let mut lines = Vec::new();

    lines.push(format!("=== Artículos ({}) ===", listing.articulos.len()));
    lines.extend(listing.articulos.iter().map(articulo));

    lines.push(format!("=== Clientes ({}) ===", listing.clientes.len()));
    for (c, info) in &listing.clientes {
        lines.push(cliente(c, info.as_ref()));
    }

    lines.push(format!("=== Compras ({}) ===", listing.compras.len()));
    lines.extend(listing.compras.iter().map(compra));

    for mismatch in &listing.inconsistencias {
        lines.push(format!(
            "⚠️ Compra {}: total guardado {:.2} € no coincide con sus líneas ({:.2} €)",
            mismatch.id_compra, mismatch.stored, mismatch.expected
        ));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
