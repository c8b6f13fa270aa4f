//! Core types and the incident clustering engine for Driftline.
//!
//! This crate is free of HTTP and database dependencies. It owns
//! the domain model (articles, incidents, mappings), the similarity predicate,
//! the leader-based cluster builder, incident synthesis, and the rebuild
//! coordinator. Storage backends plug in through the traits in [`store`].

pub mod article;
pub mod cluster;
pub mod config;
pub mod error;
pub mod incident;
pub mod rebuild;
pub mod similarity;
pub mod store;
pub mod synthesize;

#[cfg(test)]
mod memory;

pub use error::{Error, Phase, Result, StoreError};
