//! Target simulation module
//!
//! All gameplay logic lives here, free of rendering and platform code:
//! - `pool`: keeps the live population at the desired count
//! - `motion`: delta-time integration with wall reflection
//! - `lifetime`: expiry marking and clock resets
//! - `parts`: clickable regions and hit testing
//!
//! Within a tick the order is fixed: move everything, then remove the
//! expired, then refill.

pub mod lifetime;
pub mod motion;
pub mod parts;
pub mod pool;
pub mod state;

pub use parts::{Part, PartRegion, hit_test, pick};
pub use state::{SessionPhase, SessionState, Target, TargetId};
