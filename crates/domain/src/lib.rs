//! # georeg-domain
//!
//! Pure domain model for the georeg remote-service registry.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Geometry helpers: bounding boxes, spherical-Mercator reprojection,
//!   bounding-box string encoding, ArcGIS descriptor parsing
//! - Define **Service types** and the static provider table that declares them
//! - Define **Services** (registered remote map servers) and their form rules
//! - Define **GeoApps** (stored client applications) and listing filters
//! - Define **Execution request actions**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod bbox;
pub mod esri;
pub mod geometry;
pub mod projection;

pub mod execution_request;
pub mod geoapp;
pub mod service;
pub mod service_type;
