//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches, where the entity is editable

pub mod chapter;
pub mod favorite;
pub mod fiction;
pub mod genre;
pub mod user;
