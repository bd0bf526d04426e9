//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Serialize` response struct safe for API output
//! - Create/update DTOs for inserts and patches

pub mod creator;
