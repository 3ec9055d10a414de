//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching the
//! database row and, where the entity is written through the API, a
//! `Deserialize` create DTO.

pub mod genre;
pub mod movie;
pub mod ranking;
pub mod user;
