//! Block-indexed power snapshots.
//!
//! Each token source keeps an append-only, sorted-by-block log of power per
//! (account, delegation channel) plus one log of total supply. Historical
//! queries resolve by binary search to the last snapshot at or before the
//! requested block.

use std::collections::HashMap;
use tideline_types::{Address, BlockNumber, Power};
use tracing::debug;

use crate::error::GovernanceError;

/// Delegation channel a power query reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PowerChannel {
    /// Power to create and sustain proposals
    Proposition,
    /// Power to vote on proposals
    Voting,
}

/// One recorded (block, value) point in a snapshot log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// Block the value was recorded at
    pub block: BlockNumber,
    /// Power or supply figure at that block
    pub value: Power,
}

/// Read-only capability every token source exposes to the strategy.
///
/// A source answers from its own delegation bookkeeping: power attributable
/// to an account (direct holdings plus inbound delegation, minus power
/// delegated away) and the source's outstanding supply, both at a historical
/// block.
pub trait PowerSource {
    /// Power held by `account` on `channel` at `block`.
    fn power_at(
        &self,
        account: &Address,
        block: BlockNumber,
        channel: PowerChannel,
    ) -> Result<Power, GovernanceError>;

    /// Outstanding supply of this source's token at `block`.
    fn total_supply_at(&self, block: BlockNumber) -> Result<Power, GovernanceError>;
}

/// In-memory snapshot store for a single token source.
///
/// Logs are append-only and sorted by block. A query for a block the source
/// has no data for (unknown account, or before the first recorded snapshot)
/// is `SnapshotUnavailable`, never a silent zero.
#[derive(Debug, Default)]
pub struct SnapshotLedger {
    proposition: HashMap<Address, Vec<Snapshot>>,
    voting: HashMap<Address, Vec<Snapshot>>,
    supply: Vec<Snapshot>,
}

impl SnapshotLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `account`'s power on `channel` at `block`.
    ///
    /// Recording at the latest block again overwrites that entry; recording
    /// behind the latest block violates the append-only log.
    pub fn record_power(
        &mut self,
        account: Address,
        channel: PowerChannel,
        block: BlockNumber,
        value: Power,
    ) -> Result<(), GovernanceError> {
        let log = match channel {
            PowerChannel::Proposition => self.proposition.entry(account).or_default(),
            PowerChannel::Voting => self.voting.entry(account).or_default(),
        };
        append(log, block, value)?;
        debug!(account = %account, ?channel, block, value, "recorded power snapshot");
        Ok(())
    }

    /// Record total supply at `block`. Same append-only rules as power.
    pub fn record_supply(
        &mut self,
        block: BlockNumber,
        value: Power,
    ) -> Result<(), GovernanceError> {
        append(&mut self.supply, block, value)?;
        debug!(block, value, "recorded supply snapshot");
        Ok(())
    }

    fn channel_log(&self, account: &Address, channel: PowerChannel) -> Option<&[Snapshot]> {
        let logs = match channel {
            PowerChannel::Proposition => &self.proposition,
            PowerChannel::Voting => &self.voting,
        };
        logs.get(account).map(Vec::as_slice)
    }
}

impl PowerSource for SnapshotLedger {
    fn power_at(
        &self,
        account: &Address,
        block: BlockNumber,
        channel: PowerChannel,
    ) -> Result<Power, GovernanceError> {
        let log = self
            .channel_log(account, channel)
            .ok_or(GovernanceError::SnapshotUnavailable { block })?;
        value_at(log, block)
    }

    fn total_supply_at(&self, block: BlockNumber) -> Result<Power, GovernanceError> {
        value_at(&self.supply, block)
    }
}

fn append(log: &mut Vec<Snapshot>, block: BlockNumber, value: Power) -> Result<(), GovernanceError> {
    match log.last_mut() {
        Some(last) if last.block == block => {
            last.value = value;
            Ok(())
        }
        Some(last) if last.block > block => Err(GovernanceError::SnapshotOutOfOrder {
            block,
            latest: last.block,
        }),
        _ => {
            log.push(Snapshot { block, value });
            Ok(())
        }
    }
}

/// Value of the last snapshot at or before `block`.
fn value_at(log: &[Snapshot], block: BlockNumber) -> Result<Power, GovernanceError> {
    let idx = log.partition_point(|s| s.block <= block);
    if idx == 0 {
        return Err(GovernanceError::SnapshotUnavailable { block });
    }
    Ok(log[idx - 1].value)
}
