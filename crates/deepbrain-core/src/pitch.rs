//! Evaluation criteria of the DeepBrain pitch.
//!
//! The hackathon jury grades each project on four criteria of equal weight.

/// `(criterion, weight)` pairs, in the order they are presented.
pub const EVALUATION_CRITERIA: [(&str, u32); 4] = [
    ("Pertinence", 25),
    ("Impact", 25),
    ("Faisabilité", 25),
    ("Scalabilité", 25),
];

/// Sum of all criterion weights.
pub fn total_weight() -> u32 {
    EVALUATION_CRITERIA.iter().map(|(_, weight)| weight).sum()
}

/// Weight of a criterion, matched case-insensitively.
pub fn weight_of(criterion: &str) -> Option<u32> {
    EVALUATION_CRITERIA
        .iter()
        .find(|(name, _)| name.to_lowercase() == criterion.trim().to_lowercase())
        .map(|(_, weight)| *weight)
}
