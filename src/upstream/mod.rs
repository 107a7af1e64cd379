//! Diplicity API plumbing.
//!
//! Raw record types, the adapters that normalize them into board types,
//! and the async client that fetches them.

pub mod adapter;
pub mod client;
pub mod types;

pub use adapter::{game_adapter, order_adapter, orders_adapter, phase_adapter, variant_adapter, AdaptError};
pub use client::{resolve_phase_id, FetchError, RenderInputs, UpstreamClient, UpstreamConfig, LATEST_PHASE};
