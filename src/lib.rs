//! # Speech client library
//!
//! Calls a remote speech service (text-to-speech and speech-to-text) with a
//! short-lived IAM bearer token, obtained from an identity service and kept
//! in a self-refreshing cache.
//!
//! Modules:
//! - `cache`: single-slot token cache with on-demand and background refresh
//! - `sources`: credential sources (OAuth passport, service account JWT)
//! - `speech`: synthesis and recognition clients and their options
//! - `iam`: service account and key management
//! - `config`: YAML configuration
//! - `kit`: wiring of all of the above from a configuration

pub mod cache;
pub mod config;
pub mod error;
pub mod helpers;
pub mod iam;
pub mod kit;
pub mod observability;
pub mod sources;
pub mod speech;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::cache::{CacheState, RefreshPolicy, TokenCache};
pub use crate::error::{Error, Result};
pub use crate::kit::SpeechKit;
pub use crate::sources::TokenSource;
