//! Aim Trainer entry point
//!
//! In the browser: fetches the difficulty config, wires the page controls to
//! the session and runs the animation-frame loop. Natively: plays a short
//! headless session and prints the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        Document, EventTarget, HtmlElement, HtmlInputElement, MouseEvent, RequestCache,
        RequestInit, Response, Window,
    };

    use aim_trainer::consts::CONFIG_PATH;
    use aim_trainer::platform::DomHost;
    use aim_trainer::settings::TargetKind;
    use aim_trainer::{ConfigError, DifficultyRegistry, ManualSettings, Session};

    /// Game instance holding the session
    struct Game {
        session: Session<DomHost>,
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Aim Trainer starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let play_area: HtmlElement = document
            .get_element_by_id("play-area")
            .expect("no play area")
            .dyn_into()
            .expect("play area is not an HTML element");

        // Variant is chosen by the page
        let kind = play_area
            .get_attribute("data-target-kind")
            .and_then(|s| TargetKind::from_str(&s))
            .unwrap_or_default();
        let manual = play_area.get_attribute("data-variant").as_deref() == Some("manual");

        let seed = js_sys::Date::now() as u64;
        let host = DomHost::new(window.clone(), document.clone(), play_area.clone());
        let session = if manual {
            Session::manual(host, kind, seed)
        } else {
            Session::new(host, kind, seed)
        };
        log::info!(
            "Session created ({} targets, {}, seed {})",
            kind.as_str(),
            if manual { "manual" } else { "presets" },
            seed
        );

        let game = Rc::new(RefCell::new(Game { session }));
        setup_controls(&window, &document, &play_area, game.clone());

        if !manual {
            let result = fetch_registry(&window).await;
            game.borrow_mut().session.load_registry(result);
        }

        log::info!("Aim Trainer ready!");
    }

    /// Fetch and parse the difficulty document
    async fn fetch_registry(window: &Window) -> Result<DifficultyRegistry, ConfigError> {
        let opts = RequestInit::new();
        opts.set_cache(RequestCache::NoStore);

        let response = JsFuture::from(window.fetch_with_str_and_init(CONFIG_PATH, &opts))
            .await
            .map_err(js_error)?;
        let response: Response = response.dyn_into().map_err(js_error)?;
        if !response.ok() {
            return Err(ConfigError::HttpStatus(response.status()));
        }

        let body = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        let text = body
            .as_string()
            .ok_or_else(|| ConfigError::Fetch("response body is not text".to_string()))?;
        DifficultyRegistry::from_json(&text)
    }

    fn js_error(e: JsValue) -> ConfigError {
        ConfigError::Fetch(format!("{:?}", e))
    }

    fn listen(target: &EventTarget, event: &str, handler: impl FnMut(web_sys::Event) + 'static) {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_controls(
        window: &Window,
        document: &Document,
        play_area: &HtmlElement,
        game: Rc<RefCell<Game>>,
    ) {
        // Start
        if let Some(btn) = document.get_element_by_id("start-button") {
            let game = game.clone();
            listen(&btn, "click", move |_event| {
                game.borrow_mut().session.start();
                pump(&game);
            });
        }

        // Stop
        if let Some(btn) = document.get_element_by_id("stop-button") {
            let game = game.clone();
            listen(&btn, "click", move |_event| {
                game.borrow_mut().session.stop(true);
            });
        }

        // Difficulty radios
        if let Ok(list) = document.query_selector_all("input[name=\"difficulty\"]") {
            for i in 0..list.length() {
                let Some(radio) = list.item(i).and_then(|n| n.dyn_into::<HtmlInputElement>().ok())
                else {
                    continue;
                };
                let game = game.clone();
                let radio_clone = radio.clone();
                listen(&radio, "change", move |_event| {
                    if radio_clone.checked() {
                        game.borrow_mut().session.select_difficulty(&radio_clone.value());
                        pump(&game);
                    }
                });
            }
        }

        // Manual tuning panel
        if let Some(btn) = document.get_element_by_id("manual-apply") {
            let game = game.clone();
            let document = document.clone();
            listen(&btn, "click", move |_event| {
                let settings = ManualSettings {
                    speed: read_number(&document, "manual-speed"),
                    lifetime: read_number(&document, "manual-lifetime"),
                    size: read_number(&document, "manual-size"),
                    count: read_number(&document, "manual-count"),
                    head: read_number(&document, "manual-head"),
                    body: read_number(&document, "manual-body"),
                    limb: read_number(&document, "manual-limb"),
                };
                game.borrow_mut().session.apply_manual_settings(&settings);
                pump(&game);
            });
        }

        // Clicks on targets
        {
            let game = game.clone();
            let area = play_area.clone();
            listen(play_area, "mousedown", move |event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let rect = area.get_bounding_client_rect();
                let point = Vec2::new(
                    (f64::from(mouse.client_x()) - rect.left()) as f32,
                    (f64::from(mouse.client_y()) - rect.top()) as f32,
                );
                if game.borrow_mut().session.on_click(point) {
                    event.prevent_default();
                }
            });
        }

        // Layout changes can make a zero-size play area usable
        listen(window, "resize", move |_event| {
            game.borrow_mut().session.ensure_count();
        });
    }

    /// Value of a numeric input, if it parses
    fn read_number(document: &Document, id: &str) -> Option<f64> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .and_then(|input| input.value().trim().parse::<f64>().ok())
    }

    /// Schedule a frame if the session asked for one
    fn pump(game: &Rc<RefCell<Game>>) {
        let wants = game.borrow_mut().session.host_mut().take_frame_request();
        if wants {
            request_animation_frame(game.clone());
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback_game = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(callback_game, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => game.borrow_mut().session.host_mut().set_pending_frame(Some(id)),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.session.host_mut().set_pending_frame(None);
            g.session.on_tick(time);
        }

        pump(&game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Aim Trainer (native) starting...");
    log::info!("The game itself runs in the browser - use `trunk serve` for the web version");

    run_headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play ten simulated seconds against the shipped presets
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo() {
    use aim_trainer::platform::HeadlessHost;
    use aim_trainer::settings::TargetKind;
    use aim_trainer::{DifficultyRegistry, Session};
    use glam::Vec2;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    let mut session = Session::new(HeadlessHost::new(800.0, 600.0), TargetKind::Humanoid, 2024);
    session.load_registry(DifficultyRegistry::from_json(include_str!(
        "../assets/config.json"
    )));
    if !session.start() {
        println!("Could not start: {:?}", session.host().last_status());
        return;
    }

    let mut hits = 0;
    for frame in 0..600u32 {
        session.host_mut().advance(FRAME_MS);
        let now = session.host().now;
        if session.host_mut().take_frame() {
            session.on_tick(now);
        }

        // Aim for the newest target's head twice a second
        if frame % 30 == 29 {
            let aim = session
                .targets()
                .last()
                .map(|t| t.pos + t.size * Vec2::new(0.5, 0.1));
            if let Some(point) = aim {
                if session.on_click(point) {
                    hits += 1;
                }
            }
        }

        if frame == 300 {
            session.select_difficulty("hard");
        }
    }

    let config = session.config().clone();
    session.stop(true);

    println!("Hits: {}", hits);
    println!("Final score: {}", session.score());
    println!("Targets created: {}", session.host().created());
    if let Some(status) = session.host().last_status() {
        println!("Status: {}", status);
    }
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("Last config:\n{}", json),
        Err(e) => log::warn!("Could not serialize config: {}", e),
    }
}
