//! # georeg-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `georeg-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `georeg-app` (for port traits) and `georeg-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod geoapp_repo;
pub mod pool;
pub mod service_repo;

pub use geoapp_repo::SqliteGeoAppRepository;
pub use pool::{Config, Database};
pub use service_repo::SqliteServiceRepository;
