//! Pure domain logic shared across the workspace.
//!
//! No I/O lives here: the level classification engine, the enrichment
//! state machine, shared ID/timestamp aliases, and the domain error type.

pub mod error;
pub mod level;
pub mod stage;
pub mod types;
