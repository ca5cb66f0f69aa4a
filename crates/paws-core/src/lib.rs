//! Core types, ranking engine, and trait definitions for the Paws discovery
//! service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; storage backends implement
//! [`store::DiscoveryStore`] and the [`service::Discovery`] service drives the
//! engine against them.

// `DiscoveryStore` spells out `Send` bounds on its futures itself.
#![allow(async_fn_in_trait)]

pub mod candidate;
pub mod config;
pub mod diversify;
pub mod error;
pub mod filter;
pub mod preference;
pub mod queue;
pub mod rank;
pub mod score;
pub mod service;
pub mod stats;
pub mod store;
pub mod swipe;
pub mod validate;

pub use error::{Error, Result};
