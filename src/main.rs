//! Tactics Classic entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use tactics_classic::audio::{AudioManager, SoundEffect};
    use tactics_classic::platform::{Handled, InputAction, PlayerController};
    use tactics_classic::renderer::{Overlay, RenderState};
    use tactics_classic::sim::{Mission, StepOutcome, TurnPhase, generate_mission};
    use tactics_classic::{MissionStats, Rules, Settings};

    /// Game instance holding all state
    struct Game {
        mission: Mission,
        controller: PlayerController,
        render_state: Option<RenderState>,
        settings: Settings,
        stats: MissionStats,
        audio: AudioManager,
        /// Time of the last alien step (ms)
        last_alien_step: f64,
        /// Stats already written for this mission
        recorded: bool,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                mission: generate_mission(seed, Rules::default()),
                controller: PlayerController::new(),
                render_state: None,
                settings,
                stats: MissionStats::load(),
                audio,
                last_alien_step: 0.0,
                recorded: false,
            }
        }

        fn restart(&mut self, seed: u64) {
            self.mission = generate_mission(seed, Rules::default());
            self.controller = PlayerController::new();
            self.recorded = false;
            log::info!("New mission with seed: {}", seed);
        }

        fn handle(&mut self, action: InputAction) {
            self.audio.resume();
            match self.controller.handle(&mut self.mission, action) {
                Handled::NewMission => self.restart(js_sys::Date::now() as u64),
                Handled::ToggleMute => {
                    let muted = self.settings.toggle_mute();
                    self.audio.apply_settings(&self.settings);
                    self.settings.save();
                    log::info!("Sound {}", if muted { "off" } else { "on" });
                }
                // Refused orders have no effect
                Handled::Rejected(_) | Handled::Ignored | Handled::Selected | Handled::Applied => {}
            }
        }

        /// Pace alien playback and settle game over
        fn update(&mut self, time: f64) {
            if self.mission.phase == TurnPhase::Alien
                && time - self.last_alien_step >= f64::from(self.settings.alien_step_delay_ms)
            {
                self.last_alien_step = time;
                if let StepOutcome::TurnComplete = self.mission.step_alien() {
                    self.controller.sync(&self.mission);
                }
            }

            for event in self.mission.take_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
            }

            if self.mission.is_over() && !self.recorded {
                self.recorded = self.stats.record(&self.mission);
                self.stats.save();
            }
        }

        fn render(&mut self) {
            let overlay = Overlay {
                selected: self.controller.selected,
                show_move_preview: self.settings.show_move_preview,
            };
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.mission, &overlay) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let set = |selector: &str, text: &str| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(text));
                }
            };

            set("#hud-turn .hud-value", &self.mission.turn_number.to_string());
            set(
                "#hud-aliens .hud-value",
                &self.mission.visible_aliens().count().to_string(),
            );
            set("#hud-mode .hud-value", self.controller.fire_mode.as_str());
            let unit = self.controller.selected.and_then(|id| self.mission.unit(id));
            if let Some(unit) = unit {
                set("#hud-unit .hud-value", &unit.name);
                set(
                    "#hud-tu .hud-value",
                    &format!("{}/{}", unit.tu, unit.max_tu),
                );
                set(
                    "#hud-hp .hud-value",
                    &format!("{}/{}", unit.health.max(0), unit.max_health),
                );
                let ammo = unit
                    .weapon
                    .as_ref()
                    .map(|w| format!("{}/{}", w.ammo, w.capacity))
                    .unwrap_or_default();
                set("#hud-ammo .hud-value", &ammo);
            }

            let banner = match self.mission.phase {
                TurnPhase::Player => "",
                TurnPhase::Alien => "Alien activity",
                TurnPhase::Victory => "Mission accomplished",
                TurnPhase::Defeat => "Squad lost",
            };
            set("#banner", banner);
            if let Some(el) = document.get_element_by_id("game-over") {
                let class = if self.mission.is_over() { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
            set(
                "#stats-record",
                &format!(
                    "{} won / {} played ({:.0}%)",
                    self.stats.victories,
                    self.stats.games_played,
                    self.stats.win_rate() * 100.0
                ),
            );
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Tactics Classic starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);
        log::info!("Tactics Classic running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click - select, move or fire
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let Some(layout) = g.render_state.as_ref().map(|r| r.layout(&g.mission)) else {
                    return;
                };
                // offset is in CSS pixels; the layout is in backing pixels
                let scale_x =
                    canvas_clone.width() as f32 / canvas_clone.client_width().max(1) as f32;
                let scale_y =
                    canvas_clone.height() as f32 / canvas_clone.client_height().max(1) as f32;
                let px = event.offset_x() as f32 * scale_x;
                let py = event.offset_y() as f32 * scale_y;
                if let Some(tile) = layout.screen_to_tile(px, py) {
                    g.handle(InputAction::ClickTile(tile));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(action) = InputAction::from_key(&event.key()) {
                    event.prevent_default();
                    game.borrow_mut().handle(action);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().handle(InputAction::NewMission);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(err) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", err);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_arg<T: std::str::FromStr>(index: usize, default: impl FnOnce() -> T) -> T
where
    T::Err: std::fmt::Display,
{
    match std::env::args().nth(index) {
        Some(arg) => match arg.parse::<T>() {
            Ok(value) => value,
            Err(err) => {
                eprintln!("usage: tactics-classic [seed] [missions]  ({}: {})", arg, err);
                std::process::exit(2);
            }
        },
        None => default(),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tactics_classic::consts::AUTOPLAY_TURN_LIMIT;
    use tactics_classic::sim::generate_mission;
    use tactics_classic::{MissionStats, Rules};

    env_logger::init();

    let seed: u64 = parse_arg(1, || {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    });
    let missions: u64 = parse_arg(2, || 1).max(1);
    log::info!("Tactics Classic (native autoplay) seed {} x{}", seed, missions);

    let mut stats = MissionStats::new();
    for seed in seed..seed.saturating_add(missions) {
        let mut mission = generate_mission(seed, Rules::default());
        let outcome = mission.autoplay(AUTOPLAY_TURN_LIMIT);
        for event in mission.take_events() {
            log::debug!("{:?}", event);
        }

        match outcome {
            Some(phase) => println!("Seed {}: {:?} on turn {}", seed, phase, mission.turn_number),
            None => println!("Seed {}: no result after {} turns", seed, AUTOPLAY_TURN_LIMIT),
        }
        let kills: u32 = mission
            .units
            .iter()
            .filter(|u| u.is_soldier())
            .map(|u| u.kills)
            .sum();
        println!(
            "  Soldiers standing: {}/{}  Aliens killed: {}",
            mission.soldiers().count(),
            mission.rules.squad_size,
            kills
        );
        stats.record(&mission);
    }

    let best = stats
        .best_turns
        .map(|t| t.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "Played {}  Won {}  Lost {}  Win rate {:.0}%  Kills {}  Soldiers lost {}  Best {} turns",
        stats.games_played,
        stats.victories,
        stats.defeats,
        stats.win_rate() * 100.0,
        stats.kills,
        stats.soldiers_lost,
        best
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
