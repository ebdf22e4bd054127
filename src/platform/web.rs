//! Browser host backed by the DOM
//!
//! Each target is an absolutely positioned `div.target` inside the play area;
//! humanoid targets get one `div.part.part-<key>` child per region so the
//! stylesheet can draw head, torso and limbs. Clicks are resolved in Rust
//! (see `Session::on_click`), so the elements carry no listeners of their own.

use std::collections::HashMap;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, Window};

use super::{Host, VisualHandle};
use crate::session::SessionEvent;
use crate::settings::TargetKind;
use crate::sim::{TargetId, parts};

pub struct DomHost {
    window: Window,
    document: Document,
    play_area: HtmlElement,
    score_el: Option<Element>,
    status_el: Option<Element>,
    start_button: Option<HtmlButtonElement>,
    radios: Vec<HtmlInputElement>,
    elements: HashMap<VisualHandle, HtmlElement>,
    next_handle: u32,
    /// The session asked for a frame that has not been scheduled yet
    wants_frame: bool,
    /// `requestAnimationFrame` id of the scheduled frame
    pending_frame: Option<i32>,
}

impl DomHost {
    pub fn new(window: Window, document: Document, play_area: HtmlElement) -> Self {
        let start_button = document
            .get_element_by_id("start-button")
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());
        // Disabled until a config is available
        if let Some(btn) = &start_button {
            btn.set_disabled(true);
        }

        let mut radios = Vec::new();
        if let Ok(list) = document.query_selector_all("input[name=\"difficulty\"]") {
            for i in 0..list.length() {
                if let Some(radio) = list.item(i).and_then(|n| n.dyn_into::<HtmlInputElement>().ok()) {
                    radios.push(radio);
                }
            }
        }

        let score_el = document.get_element_by_id("score-value");
        if let Some(el) = &score_el {
            el.set_text_content(Some("0"));
        }

        Self {
            status_el: document.get_element_by_id("status-text"),
            score_el,
            start_button,
            radios,
            window,
            document,
            play_area,
            elements: HashMap::new(),
            next_handle: 0,
            wants_frame: false,
            pending_frame: None,
        }
    }

    /// Consume an outstanding frame request that still needs scheduling
    pub fn take_frame_request(&mut self) -> bool {
        let wants = self.wants_frame && self.pending_frame.is_none();
        self.wants_frame = false;
        wants
    }

    /// Record (or clear, once it fired) the scheduled animation frame
    pub fn set_pending_frame(&mut self, id: Option<i32>) {
        self.pending_frame = id;
    }

    fn build_target(&self, id: TargetId, kind: TargetKind) -> Option<HtmlElement> {
        let el: HtmlElement = self.document.create_element("div").ok()?.dyn_into().ok()?;
        el.set_class_name(match kind {
            TargetKind::Circle => "target",
            TargetKind::Humanoid => "target humanoid",
        });
        let _ = el.set_attribute("data-target-id", &id.0.to_string());

        if kind == TargetKind::Humanoid {
            for region in parts::regions(kind) {
                let part: HtmlElement = self.document.create_element("div").ok()?.dyn_into().ok()?;
                part.set_class_name(&format!("part part-{}", region.part.key()));
                let style = part.style();
                let _ = style.set_property("left", &format!("{}%", region.min.x * 100.0));
                let _ = style.set_property("top", &format!("{}%", region.min.y * 100.0));
                let _ = style.set_property("width", &format!("{}%", region.extent.x * 100.0));
                let _ = style.set_property("height", &format!("{}%", region.extent.y * 100.0));
                let _ = el.append_child(&part);
            }
        }

        self.play_area.append_child(&el).ok()?;
        Some(el)
    }
}

impl Host for DomHost {
    fn now_ms(&self) -> f64 {
        self.window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn area_size(&self) -> Vec2 {
        Vec2::new(
            self.play_area.client_width() as f32,
            self.play_area.client_height() as f32,
        )
    }

    fn create_target(&mut self, id: TargetId, kind: TargetKind, _size: Vec2) -> VisualHandle {
        self.next_handle += 1;
        let handle = VisualHandle(self.next_handle);
        match self.build_target(id, kind) {
            Some(el) => {
                self.elements.insert(handle, el);
            }
            None => log::warn!("Failed to create element for target {:?}", id),
        }
        handle
    }

    fn place_target(&mut self, handle: VisualHandle, pos: Vec2, size: Vec2) {
        if let Some(el) = self.elements.get(&handle) {
            let style = el.style();
            let _ = style.set_property("left", &format!("{}px", pos.x));
            let _ = style.set_property("top", &format!("{}px", pos.y));
            let _ = style.set_property("width", &format!("{}px", size.x));
            let _ = style.set_property("height", &format!("{}px", size.y));
        }
    }

    fn destroy_target(&mut self, handle: VisualHandle) {
        if let Some(el) = self.elements.remove(&handle) {
            el.remove();
        }
    }

    fn request_frame(&mut self) {
        self.wants_frame = true;
    }

    fn cancel_frame(&mut self) {
        self.wants_frame = false;
        if let Some(id) = self.pending_frame.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::ScoreChanged(score) => {
                if let Some(el) = &self.score_el {
                    el.set_text_content(Some(&score.to_string()));
                }
            }
            SessionEvent::StatusChanged(message) => {
                if let Some(el) = &self.status_el {
                    el.set_text_content(Some(&message));
                }
            }
            SessionEvent::TargetHit { id, part, delta } => {
                log::debug!("Target {:?} hit on {} ({:+})", id, part.key(), delta);
            }
            SessionEvent::DifficultyChanged(key) => {
                for radio in &self.radios {
                    radio.set_checked(radio.value() == key);
                }
            }
            SessionEvent::StartAvailable(available) => {
                if let Some(btn) = &self.start_button {
                    btn.set_disabled(!available);
                }
            }
        }
    }
}
