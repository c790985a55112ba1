//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or an open transaction) as the first argument.

pub mod item_repo;
pub mod point_repo;

pub use item_repo::ItemRepo;
pub use point_repo::PointRepo;
