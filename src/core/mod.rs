//! Core business logic - framework-agnostic article, client and purchase operations.
//!
//! Every operation takes a SeaORM connection, so it can run on its own or inside a
//! transaction opened by the caller. Operations that touch several rows open a nested
//! transaction themselves, so a failure halfway leaves nothing behind.

/// Article lookups, creation, merge updates and cascading delete
pub mod articulo;
/// Client aggregate, lookups, merge updates and cascading delete
pub mod cliente;
/// Purchase aggregate, id allocation, line maintenance and totals
pub mod compra;
/// Full listing with consistency checks, for display
pub mod report;
