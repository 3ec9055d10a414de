//! Domain primitives shared by every MagicStream crate.
//!
//! Nothing in here performs I/O: the error taxonomy, id aliases, role and
//! ranking constants, and request validation helpers.

pub mod error;
pub mod ranking;
pub mod roles;
pub mod types;
pub mod validation;
