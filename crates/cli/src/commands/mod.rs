//! CLI command implementations.

pub mod business;
pub mod seed;
