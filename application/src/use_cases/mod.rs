//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod assemble_context;
pub mod discussion;
pub mod interview;
