//! SQLite storage implementation for the Top2000 catalog.
//!
//! The only crate with Diesel dependencies. It implements the record-store
//! trait from `top2000-core`:
//! - connection pooling and the single writer actor
//! - embedded Diesel migrations
//! - candidate selection and the transactional mutation flush
//!
//! ```text
//! core (EnrichmentStore)
//!          │
//!          ▼
//!  storage-sqlite (this crate)
//!          │
//!          ▼
//!      SQLite DB
//! ```

pub mod catalog;
pub mod db;
pub mod errors;
pub mod schema;

pub use catalog::CatalogRepository;

pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

pub use errors::{IntoCore, StorageError};

pub use top2000_core::errors::{DatabaseError, Error, Result};
