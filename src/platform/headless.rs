//! In-memory host
//!
//! Drives a session without a browser: the clock and area are plain fields,
//! visuals are records, and every event is kept for inspection. Used by the
//! native demo and by tests.

use std::collections::BTreeMap;

use glam::Vec2;

use super::{Host, VisualHandle};
use crate::session::SessionEvent;
use crate::settings::TargetKind;
use crate::sim::TargetId;

/// Host-side record of a target visual
#[derive(Debug, Clone, PartialEq)]
pub struct VisualRecord {
    pub target: TargetId,
    pub kind: TargetKind,
    pub pos: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    /// Current time (ms)
    pub now: f64,
    /// Play-area size
    pub area: Vec2,
    /// A frame has been requested and not yet cancelled/consumed
    pub frame_pending: bool,
    /// Total frame requests
    pub frames_requested: u32,
    visuals: BTreeMap<VisualHandle, VisualRecord>,
    destroyed: Vec<VisualHandle>,
    events: Vec<SessionEvent>,
    next_handle: u32,
}

impl HeadlessHost {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            area: Vec2::new(width, height),
            ..Default::default()
        }
    }

    /// Advance the clock
    pub fn advance(&mut self, ms: f64) {
        self.now += ms;
    }

    /// Consume the pending frame, if any (what a frame callback does first)
    pub fn take_frame(&mut self) -> bool {
        std::mem::take(&mut self.frame_pending)
    }

    pub fn visual(&self, handle: VisualHandle) -> Option<&VisualRecord> {
        self.visuals.get(&handle)
    }

    pub fn live_visuals(&self) -> usize {
        self.visuals.len()
    }

    /// Total visuals ever created
    pub fn created(&self) -> usize {
        self.next_handle as usize
    }

    pub fn destroyed(&self) -> &[VisualHandle] {
        &self.destroyed
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Most recent status message
    pub fn last_status(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            SessionEvent::StatusChanged(msg) => Some(msg.as_str()),
            _ => None,
        })
    }

    /// Most recent score reported to the UI
    pub fn last_score(&self) -> Option<i64> {
        self.events.iter().rev().find_map(|e| match e {
            SessionEvent::ScoreChanged(score) => Some(*score),
            _ => None,
        })
    }
}

impl Host for HeadlessHost {
    fn now_ms(&self) -> f64 {
        self.now
    }

    fn area_size(&self) -> Vec2 {
        self.area
    }

    fn create_target(&mut self, id: TargetId, kind: TargetKind, size: Vec2) -> VisualHandle {
        self.next_handle += 1;
        let handle = VisualHandle(self.next_handle);
        self.visuals.insert(
            handle,
            VisualRecord {
                target: id,
                kind,
                pos: Vec2::ZERO,
                size,
            },
        );
        handle
    }

    fn place_target(&mut self, handle: VisualHandle, pos: Vec2, size: Vec2) {
        if let Some(record) = self.visuals.get_mut(&handle) {
            record.pos = pos;
            record.size = size;
        }
    }

    fn destroy_target(&mut self, handle: VisualHandle) {
        if self.visuals.remove(&handle).is_some() {
            self.destroyed.push(handle);
        }
    }

    fn request_frame(&mut self) {
        self.frame_pending = true;
        self.frames_requested += 1;
    }

    fn cancel_frame(&mut self) {
        self.frame_pending = false;
    }

    fn emit(&mut self, event: SessionEvent) {
        self.events.push(event);
    }
}
