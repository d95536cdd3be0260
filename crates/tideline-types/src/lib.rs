//! Tideline Types - Core type definitions for the Tideline governance strategy.
//!
//! This crate provides the primitives the governance engine computes over:
//! - Addresses (20-byte, Bech32m encoded)
//! - Power figures and block numbers
//! - Type-level errors

pub mod address;
pub mod error;

#[cfg(feature = "serde")]
mod serialization;

pub use address::Address;
pub use error::TypesError;

/// A governance power or supply figure.
///
/// Unit-compatible across token sources; combined by checked addition only.
/// Unsigned, so never negative; overflow past u128 is surfaced by callers,
/// never wrapped.
pub type Power = u128;

/// A historical point in chain history. All governance queries are read-only
/// snapshots at a block number.
pub type BlockNumber = u64;
