//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod events;
pub mod generation;
pub mod retrieval;
pub mod session_store;
