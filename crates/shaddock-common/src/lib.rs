//! # shaddock-common
//!
//! Shared types, error definitions, resolution options, and constants
//! used across the Shaddock workspace.
//!
//! This crate is the leaf of the dependency graph. It depends on no other
//! internal crate and holds the primitives that both the model engine and
//! the CLI agree on.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
