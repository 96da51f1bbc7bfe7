//! # georeg-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** for programmatic access
//!   (`/api/service-types`, `/api/services`, `/api/geoapps`, …)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and errors into HTTP responses
//! - Identify the caller from the `X-Remote-User` header set by the
//!   authenticating reverse proxy
//!
//! ## Dependency rule
//! Depends on `georeg-app` (for port traits and services) and `georeg-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod auth;
pub mod error;
pub mod router;
pub mod state;
