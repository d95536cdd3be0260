use thiserror::Error;
use tideline_types::BlockNumber;

/// Errors that can occur in governance power queries and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("No snapshot recorded at block {block}")]
    SnapshotUnavailable { block: BlockNumber },

    #[error("Snapshot at block {block} is behind the latest recorded block {latest}")]
    SnapshotOutOfOrder { block: BlockNumber, latest: BlockNumber },

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Proposal not found: {0}")]
    ProposalNotFound(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GovernanceError::SnapshotUnavailable { block: 42 };
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_out_of_order_display() {
        let err = GovernanceError::SnapshotOutOfOrder { block: 10, latest: 20 };
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("20"));
    }
}
