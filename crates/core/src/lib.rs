//! Domain logic for the collection point registry.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` and
//! `api` crates build on these types and checks.

pub mod discovery;
pub mod error;
pub mod image_url;
pub mod item_ids;
pub mod registration;
pub mod types;
pub mod upload;
