use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum DisclosureError {
    #[error("unknown details index {index} (registered: {len})")]
    UnknownIndex { index: usize, len: usize },

    #[error("non-finite height: {what}")]
    NonFiniteHeight { what: &'static str },
}
