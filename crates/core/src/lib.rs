//! Domain logic for the stride athlete self-tracking backend.
//!
//! Everything here is free of database access: document schema migration,
//! the entry model, streak and badge evaluation, and the award orchestrator
//! that talks to persistence only through the traits in [`store`].

pub mod awards;
pub mod badges;
pub mod entries;
pub mod error;
pub mod memory_store;
pub mod metrics;
pub mod migration;
pub mod profile;
pub mod sports;
pub mod store;
pub mod streaks;
pub mod types;
