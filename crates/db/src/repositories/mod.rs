//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod document_repo;
pub mod earned_badge_repo;

pub use document_repo::DocumentRepo;
pub use earned_badge_repo::EarnedBadgeRepo;
