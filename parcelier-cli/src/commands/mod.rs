//! CLI command implementations.
//!
//! - [`fetch`] - Cover a boundary with tiles and download its parcels

pub mod fetch;
