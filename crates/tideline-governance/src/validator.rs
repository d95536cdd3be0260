//! Proposal passage rules.
//!
//! A proposal passes when it clears both the minimum quorum and the vote
//! differential, each expressed in basis points of the voting supply at the
//! proposal's snapshot block. The same rules object carries the proposition
//! threshold a creator must hold for a proposal to be created, and below
//! which a live proposal may be cancelled.

use tideline_types::{Address, BlockNumber, Power};
use tracing::debug;

use crate::error::GovernanceError;
use crate::registry::{ProposalRegistry, ProposalView};
use crate::snapshot::PowerSource;
use crate::strategy::GovernanceStrategy;

/// Immutable passage-rule constants, fixed at validator construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationRules {
    /// Length of the voting window, in blocks
    pub voting_duration: BlockNumber,
    /// Minimum (for - against) margin, in basis points of voting supply
    pub vote_differential: Power,
    /// Minimum "for" participation, in basis points of voting supply
    pub minimum_quorum: Power,
    /// Proposition power a creator must hold, in basis points of supply
    pub proposition_threshold: Power,
    /// Scale the basis-point figures are expressed against; must be non-zero
    pub precision: Power,
}

impl ValidationRules {
    /// Conventional basis-point scale: 10_000 = 100%.
    pub const STANDARD_PRECISION: Power = 10_000;
}

/// Decides proposal outcomes from aggregated supply and power figures.
///
/// Holds no mutable state; every method is a pure read against the registry
/// and strategy it is handed.
#[derive(Debug, Clone)]
pub struct ProposalValidator {
    rules: ValidationRules,
}

impl ProposalValidator {
    /// Create a validator with `rules` fixed for its lifetime.
    ///
    /// # Panics
    /// Panics if `rules.precision` is zero.
    pub fn new(rules: ValidationRules) -> Self {
        assert!(rules.precision > 0, "precision must be non-zero");
        Self { rules }
    }

    /// Length of the voting window, in blocks.
    pub fn voting_duration(&self) -> BlockNumber {
        self.rules.voting_duration
    }

    /// Minimum (for - against) margin, in basis points.
    pub fn vote_differential(&self) -> Power {
        self.rules.vote_differential
    }

    /// Minimum "for" participation, in basis points.
    pub fn minimum_quorum(&self) -> Power {
        self.rules.minimum_quorum
    }

    /// Proposition power a creator must hold, in basis points.
    pub fn proposition_threshold(&self) -> Power {
        self.rules.proposition_threshold
    }

    /// Scale the basis-point figures are expressed against.
    pub fn precision(&self) -> Power {
        self.rules.precision
    }

    /// Block the voting window closes at for a proposal starting at
    /// `start_block`.
    pub fn voting_closes_at(&self, start_block: BlockNumber) -> BlockNumber {
        start_block + self.rules.voting_duration
    }

    /// A proposal passed iff quorum and vote differential both hold.
    ///
    /// The registry's lifecycle enforces that the voting window has concluded
    /// before tallies are final; this predicate composes exactly the two
    /// power checks.
    pub fn is_proposal_passed<R, P, S>(
        &self,
        registry: &R,
        strategy: &GovernanceStrategy<P, S>,
        proposal_id: u64,
    ) -> Result<bool, GovernanceError>
    where
        R: ProposalRegistry,
        P: PowerSource,
        S: PowerSource,
    {
        let proposal = registry.proposal(proposal_id)?;
        let supply = strategy.total_voting_supply_at(proposal.snapshot_block)?;
        let quorum = self.quorum_reached(&proposal, supply)?;
        let differential = self.differential_reached(&proposal, supply)?;
        debug!(proposal_id, supply, quorum, differential, "evaluated proposal passage");
        Ok(quorum && differential)
    }

    /// Whether the proposal's "for" votes reach the minimum quorum.
    pub fn is_quorum_valid<R, P, S>(
        &self,
        registry: &R,
        strategy: &GovernanceStrategy<P, S>,
        proposal_id: u64,
    ) -> Result<bool, GovernanceError>
    where
        R: ProposalRegistry,
        P: PowerSource,
        S: PowerSource,
    {
        let proposal = registry.proposal(proposal_id)?;
        let supply = strategy.total_voting_supply_at(proposal.snapshot_block)?;
        self.quorum_reached(&proposal, supply)
    }

    /// Whether the proposal's margin over "against" votes clears the
    /// differential.
    pub fn is_vote_differential_valid<R, P, S>(
        &self,
        registry: &R,
        strategy: &GovernanceStrategy<P, S>,
        proposal_id: u64,
    ) -> Result<bool, GovernanceError>
    where
        R: ProposalRegistry,
        P: PowerSource,
        S: PowerSource,
    {
        let proposal = registry.proposal(proposal_id)?;
        let supply = strategy.total_voting_supply_at(proposal.snapshot_block)?;
        self.differential_reached(&proposal, supply)
    }

    /// Minimum "for" power required against `voting_supply` to reach quorum.
    pub fn minimum_voting_power_needed(
        &self,
        voting_supply: Power,
    ) -> Result<Power, GovernanceError> {
        self.share_of(voting_supply, self.rules.minimum_quorum)
    }

    /// Minimum proposition power a creator must hold at `block`.
    pub fn minimum_proposition_power_needed<P, S>(
        &self,
        strategy: &GovernanceStrategy<P, S>,
        block: BlockNumber,
    ) -> Result<Power, GovernanceError>
    where
        P: PowerSource,
        S: PowerSource,
    {
        let supply = strategy.total_proposition_supply_at(block)?;
        self.share_of(supply, self.rules.proposition_threshold)
    }

    /// Whether `creator` holds at least the proposition threshold at `block`.
    pub fn is_proposition_power_enough<P, S>(
        &self,
        strategy: &GovernanceStrategy<P, S>,
        creator: &Address,
        block: BlockNumber,
    ) -> Result<bool, GovernanceError>
    where
        P: PowerSource,
        S: PowerSource,
    {
        let power = strategy.proposition_power_at(creator, block)?;
        let needed = self.minimum_proposition_power_needed(strategy, block)?;
        Ok(power >= needed)
    }

    /// A proposal may be created iff the creator clears the proposition
    /// threshold.
    pub fn validate_creation<P, S>(
        &self,
        strategy: &GovernanceStrategy<P, S>,
        creator: &Address,
        block: BlockNumber,
    ) -> Result<bool, GovernanceError>
    where
        P: PowerSource,
        S: PowerSource,
    {
        self.is_proposition_power_enough(strategy, creator, block)
    }

    /// A live proposal may be cancelled iff its creator has dropped below
    /// the proposition threshold.
    pub fn validate_cancellation<P, S>(
        &self,
        strategy: &GovernanceStrategy<P, S>,
        creator: &Address,
        block: BlockNumber,
    ) -> Result<bool, GovernanceError>
    where
        P: PowerSource,
        S: PowerSource,
    {
        Ok(!self.is_proposition_power_enough(strategy, creator, block)?)
    }

    fn quorum_reached(
        &self,
        proposal: &ProposalView,
        supply: Power,
    ) -> Result<bool, GovernanceError> {
        // An empty supply can never reach quorum; the floor minimum would be
        // zero and let any tally through.
        if supply == 0 {
            return Ok(false);
        }
        let needed = self.minimum_voting_power_needed(supply)?;
        Ok(proposal.for_votes >= needed)
    }

    fn differential_reached(
        &self,
        proposal: &ProposalView,
        supply: Power,
    ) -> Result<bool, GovernanceError> {
        if supply == 0 {
            return Ok(false);
        }
        let margin = match proposal.for_votes.checked_sub(proposal.against_votes) {
            Some(margin) => margin,
            // More against than for: the margin cannot clear any threshold.
            None => return Ok(false),
        };
        let scaled = margin
            .checked_mul(self.rules.precision)
            .ok_or(GovernanceError::ArithmeticOverflow)?
            / supply;
        Ok(scaled >= self.rules.vote_differential)
    }

    /// `bps` basis points of `amount`, floor-divided by the precision scale.
    fn share_of(&self, amount: Power, bps: Power) -> Result<Power, GovernanceError> {
        let scaled = amount
            .checked_mul(bps)
            .ok_or(GovernanceError::ArithmeticOverflow)?;
        Ok(scaled / self.rules.precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{PowerChannel, SnapshotLedger};
    use std::collections::HashMap;

    struct StaticRegistry(HashMap<u64, ProposalView>);

    impl StaticRegistry {
        fn with(proposal: ProposalView) -> Self {
            let mut proposals = HashMap::new();
            proposals.insert(proposal.id, proposal);
            Self(proposals)
        }
    }

    impl ProposalRegistry for StaticRegistry {
        fn proposal(&self, id: u64) -> Result<ProposalView, GovernanceError> {
            self.0.get(&id).copied().ok_or(GovernanceError::ProposalNotFound(id))
        }
    }

    fn test_address(n: u8) -> Address {
        let mut addr = [0u8; 20];
        addr[19] = n;
        Address::from_bytes(addr)
    }

    fn test_rules() -> ValidationRules {
        ValidationRules {
            voting_duration: 19_200,
            vote_differential: 500,      // 5%
            minimum_quorum: 2_000,       // 20%
            proposition_threshold: 100,  // 1%
            precision: ValidationRules::STANDARD_PRECISION,
        }
    }

    fn proposal(for_votes: Power, against_votes: Power) -> ProposalView {
        ProposalView {
            id: 1,
            creator: test_address(9),
            for_votes,
            against_votes,
            start_block: 100,
            end_block: 100 + 19_200,
            snapshot_block: 100,
        }
    }

    fn strategy_with_supply(supply: Power) -> GovernanceStrategy<SnapshotLedger, SnapshotLedger> {
        let mut primary = SnapshotLedger::new();
        primary.record_supply(100, supply).unwrap();
        let staked = SnapshotLedger::new();
        GovernanceStrategy::new(primary, staked)
    }

    #[test]
    fn test_minimum_voting_power_needed() {
        let validator = ProposalValidator::new(test_rules());
        // 20% of 1_000_000
        assert_eq!(validator.minimum_voting_power_needed(1_000_000).unwrap(), 200_000);
        // Floor division
        assert_eq!(validator.minimum_voting_power_needed(9).unwrap(), 1);
        assert_eq!(validator.minimum_voting_power_needed(0).unwrap(), 0);
    }

    #[test]
    fn test_minimum_voting_power_overflow() {
        let validator = ProposalValidator::new(test_rules());
        assert_eq!(
            validator.minimum_voting_power_needed(Power::MAX),
            Err(GovernanceError::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_quorum_invalid_below_minimum() {
        let validator = ProposalValidator::new(test_rules());
        let strategy = strategy_with_supply(1_000_000);
        let registry = StaticRegistry::with(proposal(150_000, 0));

        // Minimum needed is 200_000
        assert!(!validator.is_quorum_valid(&registry, &strategy, 1).unwrap());
    }

    #[test]
    fn test_quorum_valid_at_minimum() {
        let validator = ProposalValidator::new(test_rules());
        let strategy = strategy_with_supply(1_000_000);
        let registry = StaticRegistry::with(proposal(200_000, 0));

        assert!(validator.is_quorum_valid(&registry, &strategy, 1).unwrap());
    }

    #[test]
    fn test_quorum_invalid_on_empty_supply() {
        let validator = ProposalValidator::new(test_rules());
        let strategy = strategy_with_supply(0);
        let registry = StaticRegistry::with(proposal(1_000_000, 0));

        assert!(!validator.is_quorum_valid(&registry, &strategy, 1).unwrap());
    }

    #[test]
    fn test_differential_valid_on_wide_margin() {
        let validator = ProposalValidator::new(test_rules());
        let strategy = strategy_with_supply(1_000_000);
        // Margin is 200_000 = 20% of supply, needs 5%
        let registry = StaticRegistry::with(proposal(250_000, 50_000));

        assert!(validator.is_vote_differential_valid(&registry, &strategy, 1).unwrap());
    }

    #[test]
    fn test_differential_invalid_on_thin_margin() {
        let validator = ProposalValidator::new(test_rules());
        let strategy = strategy_with_supply(1_000_000);
        // Margin is 40_000 = 4% of supply, needs 5%
        let registry = StaticRegistry::with(proposal(270_000, 230_000));

        assert!(!validator.is_vote_differential_valid(&registry, &strategy, 1).unwrap());
    }

    #[test]
    fn test_differential_valid_at_exact_threshold() {
        let validator = ProposalValidator::new(test_rules());
        let strategy = strategy_with_supply(1_000_000);
        // Margin is exactly 5% of supply
        let registry = StaticRegistry::with(proposal(250_000, 200_000));

        assert!(validator.is_vote_differential_valid(&registry, &strategy, 1).unwrap());
    }

    #[test]
    fn test_differential_invalid_when_against_leads() {
        let validator = ProposalValidator::new(test_rules());
        let strategy = strategy_with_supply(1_000_000);
        let registry = StaticRegistry::with(proposal(50_000, 250_000));

        assert!(!validator.is_vote_differential_valid(&registry, &strategy, 1).unwrap());
    }

    #[test]
    fn test_differential_invalid_on_empty_supply() {
        let validator = ProposalValidator::new(test_rules());
        let strategy = strategy_with_supply(0);
        let registry = StaticRegistry::with(proposal(250_000, 50_000));

        assert!(!validator.is_vote_differential_valid(&registry, &strategy, 1).unwrap());
    }

    #[test]
    fn test_passage_requires_both_checks() {
        let validator = ProposalValidator::new(test_rules());
        let strategy = strategy_with_supply(1_000_000);

        // Quorum met, differential met
        let registry = StaticRegistry::with(proposal(250_000, 50_000));
        assert!(validator.is_proposal_passed(&registry, &strategy, 1).unwrap());

        // Quorum met, differential missed (margin 1% < 5%)
        let registry = StaticRegistry::with(proposal(255_000, 245_000));
        assert!(!validator.is_proposal_passed(&registry, &strategy, 1).unwrap());

        // Quorum missed, differential met
        let registry = StaticRegistry::with(proposal(150_000, 0));
        assert!(!validator.is_proposal_passed(&registry, &strategy, 1).unwrap());
    }

    #[test]
    fn test_unknown_proposal() {
        let validator = ProposalValidator::new(test_rules());
        let strategy = strategy_with_supply(1_000_000);
        let registry = StaticRegistry(HashMap::new());

        assert_eq!(
            validator.is_proposal_passed(&registry, &strategy, 7),
            Err(GovernanceError::ProposalNotFound(7))
        );
    }

    #[test]
    fn test_missing_supply_snapshot_propagates() {
        let validator = ProposalValidator::new(test_rules());
        let primary = SnapshotLedger::new();
        let staked = SnapshotLedger::new();
        let strategy = GovernanceStrategy::new(primary, staked);
        let registry = StaticRegistry::with(proposal(250_000, 50_000));

        assert_eq!(
            validator.is_proposal_passed(&registry, &strategy, 1),
            Err(GovernanceError::SnapshotUnavailable { block: 100 })
        );
    }

    #[test]
    fn test_proposition_threshold_at_boundary() {
        let validator = ProposalValidator::new(test_rules());
        let creator = test_address(9);

        // 1% of 1_000_000 supply = 10_000 needed
        let mut primary = SnapshotLedger::new();
        primary.record_supply(100, 1_000_000).unwrap();
        primary.record_power(creator, PowerChannel::Proposition, 100, 6_000).unwrap();
        let mut staked = SnapshotLedger::new();
        staked.record_power(creator, PowerChannel::Proposition, 100, 4_000).unwrap();
        let strategy = GovernanceStrategy::new(primary, staked);

        assert_eq!(validator.minimum_proposition_power_needed(&strategy, 100).unwrap(), 10_000);
        // Exactly at the threshold is enough
        assert!(validator.validate_creation(&strategy, &creator, 100).unwrap());
        assert!(!validator.validate_cancellation(&strategy, &creator, 100).unwrap());
    }

    #[test]
    fn test_proposition_power_below_threshold() {
        let validator = ProposalValidator::new(test_rules());
        let creator = test_address(9);

        let mut primary = SnapshotLedger::new();
        primary.record_supply(100, 1_000_000).unwrap();
        primary.record_power(creator, PowerChannel::Proposition, 100, 5_000).unwrap();
        let mut staked = SnapshotLedger::new();
        staked.record_power(creator, PowerChannel::Proposition, 100, 4_999).unwrap();
        let strategy = GovernanceStrategy::new(primary, staked);

        assert!(!validator.validate_creation(&strategy, &creator, 100).unwrap());
        assert!(validator.validate_cancellation(&strategy, &creator, 100).unwrap());
    }

    #[test]
    fn test_rule_accessors() {
        let rules = test_rules();
        let validator = ProposalValidator::new(rules);

        assert_eq!(validator.voting_duration(), 19_200);
        assert_eq!(validator.vote_differential(), 500);
        assert_eq!(validator.minimum_quorum(), 2_000);
        assert_eq!(validator.proposition_threshold(), 100);
        assert_eq!(validator.precision(), ValidationRules::STANDARD_PRECISION);
    }

    #[test]
    fn test_voting_closes_at() {
        let validator = ProposalValidator::new(test_rules());
        assert_eq!(validator.voting_closes_at(100), 19_300);
    }

    #[test]
    #[should_panic(expected = "precision must be non-zero")]
    fn test_zero_precision_rejected() {
        let mut rules = test_rules();
        rules.precision = 0;
        ProposalValidator::new(rules);
    }
}
