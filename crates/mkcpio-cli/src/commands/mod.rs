//! Command implementations.

pub mod create;
