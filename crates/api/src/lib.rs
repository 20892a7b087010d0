//! HTTP surface for the monster catalog.
//!
//! Exposes upload, catalog reads, the three enrichment stage triggers, and
//! the info-edit path. Transport-level concerns (status mapping, response
//! envelope, middleware) live here; all decision logic is in the domain
//! crates.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
