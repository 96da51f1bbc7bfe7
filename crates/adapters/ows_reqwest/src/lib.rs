//! # georeg-adapter-ows-reqwest
//!
//! Remote service handlers speaking OGC (WMS, WFS, CSW) and ArcGIS REST,
//! built on [reqwest](https://docs.rs/reqwest).
//!
//! ## Responsibilities
//! - Implement `ServiceHandlerFactory` from `georeg-app::ports::handler`
//! - Detect the protocol of an endpoint when the declared type is `AUTO`
//!   or `OWS`
//! - Read title, abstract, keywords and extent from capabilities documents
//!   and ArcGIS descriptors
//!
//! ## Dependency rule
//! Depends on `georeg-app` (for port traits) and `georeg-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod arcgis;
pub mod capabilities;
pub mod error;
pub mod factory;
pub mod handler;

pub use factory::{Config, OwsHandlerFactory};
pub use handler::OwsHandler;
