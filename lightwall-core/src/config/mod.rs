//! Configuration types
//!
//! Board capabilities are fixed at compile time. Each firmware role
//! declares one `const` [`BoardProfile`] and the shared core adapts to it.

pub mod board;

pub use board::*;
