//! # trialmatch (library half)
//!
//! File-facing pieces of the binary, exposed for integration tests.

pub mod cli;
pub mod config;
pub mod reference;
