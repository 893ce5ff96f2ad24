use thiserror::Error;

/// Validation failures for operations on a sale draft. The mutation API
/// itself is tolerant (unknown ids ignored, zero quantities dropped);
/// these only surface when the draft is turned into a submission plan.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("a sale needs at least one line")]
    EmptySale,
    #[error("a sale needs a registered client or a walk-in name")]
    UnresolvedClient,
}
