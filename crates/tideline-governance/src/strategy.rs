//! Two-source governance power aggregation.
//!
//! Combined power for an account is the sum of the primary token source and
//! the staked-derivative source; each source is already net of delegation
//! within its own bookkeeping, so the two never overlap.

use tideline_types::{Address, BlockNumber, Power};
use tracing::trace;

use crate::error::GovernanceError;
use crate::snapshot::{PowerChannel, PowerSource};

/// Aggregates governance power across the primary token and its staked
/// derivative.
#[derive(Debug, Clone)]
pub struct GovernanceStrategy<P, S> {
    primary: P,
    staked: S,
}

impl<P: PowerSource, S: PowerSource> GovernanceStrategy<P, S> {
    /// Compose a strategy over the primary token source and the
    /// staked-derivative source.
    pub fn new(primary: P, staked: S) -> Self {
        Self { primary, staked }
    }

    /// Combined power for `account` on `channel` at `block`.
    ///
    /// Oracle failures propagate; a source with no data for the query is
    /// never treated as zero.
    pub fn power_at(
        &self,
        account: &Address,
        block: BlockNumber,
        channel: PowerChannel,
    ) -> Result<Power, GovernanceError> {
        let primary = self.primary.power_at(account, block, channel)?;
        let staked = self.staked.power_at(account, block, channel)?;
        let total = primary
            .checked_add(staked)
            .ok_or(GovernanceError::ArithmeticOverflow)?;
        trace!(account = %account, ?channel, block, primary, staked, "aggregated power");
        Ok(total)
    }

    /// Voting power for `account` at `block`.
    pub fn voting_power_at(
        &self,
        account: &Address,
        block: BlockNumber,
    ) -> Result<Power, GovernanceError> {
        self.power_at(account, block, PowerChannel::Voting)
    }

    /// Proposition power for `account` at `block`.
    pub fn proposition_power_at(
        &self,
        account: &Address,
        block: BlockNumber,
    ) -> Result<Power, GovernanceError> {
        self.power_at(account, block, PowerChannel::Proposition)
    }

    /// Total supply eligible to vote at `block`.
    ///
    /// The staked token's supply is backed 1:1 by primary tokens locked in
    /// staking, so primary + staked - locked collapses to the primary supply
    /// alone. Summing both supplies would double-count the locked backing.
    pub fn total_voting_supply_at(&self, block: BlockNumber) -> Result<Power, GovernanceError> {
        self.primary.total_supply_at(block)
    }

    /// Total supply eligible to back propositions at `block`.
    ///
    /// Identical to the voting supply: supply carries no per-channel policy,
    /// only per-account power does.
    pub fn total_proposition_supply_at(
        &self,
        block: BlockNumber,
    ) -> Result<Power, GovernanceError> {
        self.primary.total_supply_at(block)
    }
}
