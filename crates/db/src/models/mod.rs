//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row plus `Deserialize` DTOs for inserts and patches.

pub mod monster;
