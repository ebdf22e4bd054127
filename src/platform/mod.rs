//! Platform abstraction layer
//!
//! The simulation never touches the browser directly. Everything it needs
//! from the outside world goes through [`Host`]:
//! - Time (monotonic milliseconds)
//! - Play-area geometry, sampled live
//! - Visual target handles
//! - Frame scheduling
//! - Score/status event delivery

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::HeadlessHost;
#[cfg(target_arch = "wasm32")]
pub use web::DomHost;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::session::SessionEvent;
use crate::settings::TargetKind;
use crate::sim::TargetId;

/// Opaque handle to a host-side visual (DOM element, sprite, record)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u32);

/// Everything the session needs from its surroundings
pub trait Host {
    /// Monotonic clock in milliseconds
    fn now_ms(&self) -> f64;

    /// Current play-area size in pixels (zero while not laid out)
    fn area_size(&self) -> Vec2;

    /// Create the visual for a new target, including its part regions
    fn create_target(&mut self, id: TargetId, kind: TargetKind, size: Vec2) -> VisualHandle;

    /// Move/resize a visual (top-left position)
    fn place_target(&mut self, handle: VisualHandle, pos: Vec2, size: Vec2);

    /// Destroy a visual; unknown handles are ignored
    fn destroy_target(&mut self, handle: VisualHandle);

    /// Ask for one `Session::on_tick` call on the next frame
    fn request_frame(&mut self);

    /// Drop any pending frame request
    fn cancel_frame(&mut self);

    /// Deliver a session event to the UI
    fn emit(&mut self, event: SessionEvent);
}
