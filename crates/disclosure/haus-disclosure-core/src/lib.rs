//! Haus Disclosure Core (host-agnostic)
//!
//! State owner for a group of details/summary disclosures: which ones are
//! open, and the animated height transition of each. The root is passed to
//! callers explicitly; there is no shared global state.

pub mod error;
pub mod options;
pub mod root;
pub mod transition;

pub use error::DisclosureError;
pub use options::{AnimationOptions, Mode};
pub use root::{DetailsState, DisclosureEvent, DisclosureRoot};
pub use transition::{AnimationState, HeightTransition, Heights};
