//! Consumed interface to the external proposal registry.
//!
//! The registry owns proposal lifecycle and vote storage; this crate only
//! reads tallies and timing metadata through it.

use tideline_types::{Address, BlockNumber, Power};

use crate::error::GovernanceError;

/// Read model of a proposal held by an external registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProposalView {
    /// Unique proposal ID
    pub id: u64,
    /// Account that created the proposal
    pub creator: Address,
    /// For votes (weighted)
    pub for_votes: Power,
    /// Against votes (weighted)
    pub against_votes: Power,
    /// Block when voting starts
    pub start_block: BlockNumber,
    /// Block when voting ends
    pub end_block: BlockNumber,
    /// Block supply and power figures are evaluated at
    pub snapshot_block: BlockNumber,
}

/// External governance registry, queried by proposal ID.
///
/// Implementations live outside this crate; validation never mutates a
/// proposal through this interface.
pub trait ProposalRegistry {
    /// Fetch the proposal identified by `id`.
    fn proposal(&self, id: u64) -> Result<ProposalView, GovernanceError>;
}
