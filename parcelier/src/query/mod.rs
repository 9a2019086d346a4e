//! Remote feature-service queries
//!
//! [`QueryParams`] builds the envelope query for a tile and [`QueryClient`]
//! sends it. [`ReqwestQueryClient`] is the production client.
//!
//! ```ignore
//! use parcelier::query::{QueryClient, QueryParams, ReqwestQueryClient};
//!
//! let client = ReqwestQueryClient::from_config(&config)?;
//! let body = client.query(&QueryParams::for_tile(&tile, &config)).await?;
//! ```

mod client;
mod params;

pub use client::{QueryClient, ReqwestQueryClient};
pub use params::{QueryParams, ResponseFormat, UnknownFormat};
