//! Menu actions.
//!
//! Every action gathers its input first and only then opens a transaction, runs the
//! access-layer call on it and commits. Returning early with an error drops the
//! transaction, which rolls it back.

mod articulo;
mod cliente;
mod compra;
mod general;
