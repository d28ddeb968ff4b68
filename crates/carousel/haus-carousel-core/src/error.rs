//! Error types for the carousel engine.

use thiserror::Error;

/// Errors surfaced by the engine. Under normal operation none of these occur;
/// they signal either rejected measurements or a broken layout invariant.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CarouselError {
    /// The same item was placed twice in one positioning pass.
    #[error("item {index} was positioned twice in one layout pass")]
    DuplicatePlacement { index: usize },

    /// An item would advance the layout walk by zero or less.
    #[error("degenerate layout: stride {stride} at item {index} must be > 0")]
    DegenerateLayout { index: usize, stride: f64 },

    /// A measurement was NaN or infinite.
    #[error("non-finite measurement: {what}")]
    NonFiniteMeasurement { what: String },
}
