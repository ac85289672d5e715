//! Row structs and insert DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` struct matching the
//! table row and, where rows are written from Rust values, an input DTO.

pub mod document;
pub mod earned_badge;
