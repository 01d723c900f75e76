//! Top2000 Core - enrichment engine, domain types and store traits.
//!
//! This crate fills missing catalog attributes (track ids, artist photos,
//! album images) on local song and artist records. It is database-agnostic:
//! the record store is a trait implemented by the `storage-sqlite` crate, and
//! the external catalog is reached through `top2000-catalog`.

pub mod enrichment;
pub mod errors;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
