//! Haus Carousel Core (host-agnostic)
//!
//! Interactive carousel engine: layout of a looping (or bounded) item strip,
//! pointer/wheel gesture tracking, and three mutually exclusive motion modes
//! (auto-scroll, eased snap, throw with exponential decay). The host measures,
//! forwards input, calls [`Carousel::update`] once per frame and applies the
//! returned [`Outputs`].

pub mod config;
pub mod easing;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod inputs;
pub mod layout;
pub mod math;
pub mod motion;
pub mod outputs;
pub mod snap;
pub mod tunables;
pub mod wheel;

// Re-exports for consumers (adapters)
pub use config::{Align, Config, Direction};
pub use easing::Easing;
pub use engine::{Carousel, CarouselState, WheelResponse};
pub use error::CarouselError;
pub use gesture::{DragSession, Release};
pub use inputs::{Measurements, MoveOptions, PointerInput, PointerType, TouchInput, WheelInput};
pub use layout::{ItemPosition, Layout, Placement};
pub use motion::MotionKind;
pub use outputs::{CarouselEvent, ItemChange, ListenerSet, Outputs};
pub use snap::{find_snap_distance, SnapTarget};
pub use tunables::Tunables;
