//! # georeg-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ServiceRepository`: CRUD for registered remote services
//!   - `GeoAppRepository`: CRUD for geoapps
//!   - `ServiceHandlerFactory`: resolve and probe remote endpoints
//! - Define **driving/inbound ports** as use-case structs:
//!   - `ServiceCatalog`: register, edit, list, get, delete services
//!   - `GeoAppService`: create, list, get, patch, replace geoapps
//!   - `validate_registration`: the registration checks on their own
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `georeg-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
