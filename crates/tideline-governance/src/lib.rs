//! Tideline Governance - Delegated power strategy and proposal validation.
//!
//! This crate provides:
//! - Block-indexed power snapshots with binary-search history queries
//! - Two-source power aggregation (primary token + staked derivative)
//! - Proposal passage rules: quorum, vote differential, proposition threshold

pub mod error;
pub mod registry;
pub mod snapshot;
pub mod strategy;
pub mod validator;

pub use error::GovernanceError;
pub use registry::{ProposalRegistry, ProposalView};
pub use snapshot::{PowerChannel, PowerSource, Snapshot, SnapshotLedger};
pub use strategy::GovernanceStrategy;
pub use validator::{ProposalValidator, ValidationRules};
