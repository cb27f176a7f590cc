//! Browser frontend (wasm32)
//!
//! Circles go through the WebGPU renderer, text goes into a DOM overlay laid
//! over the canvas, and `requestAnimationFrame` drives the loop one step at a
//! time, skipping callbacks that arrive before the next frame is due.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlCanvasElement};

use super::{Clock, InputEvent, InputSource, Surface, TextStyle};
use crate::color::Color;
use crate::consts::*;
use crate::error::{Error, Result};
use crate::game_loop::{GameLoop, LoopControl};
use crate::renderer::{CircleFrame, CircleRenderState, CircleShape};
use crate::settings::Settings;
use crate::sim::{Bounds, GameState};

fn missing(what: &str) -> Error {
    Error::Surface(format!("missing {what}"))
}

pub struct WebSurface {
    renderer: CircleRenderState,
    canvas: HtmlCanvasElement,
    hud: Element,
    document: Document,
    frame: CircleFrame,
    texts: Vec<(String, Vec2, TextStyle)>,
}

impl WebSurface {
    /// Fit the logical surface into the canvas the same way the shader does
    fn css_transform(&self) -> (f32, Vec2) {
        let client = Vec2::new(
            self.canvas.client_width() as f32,
            self.canvas.client_height() as f32,
        );
        let size = Vec2::new(self.frame.bounds.width, self.frame.bounds.height);
        let scale = (client.x / size.x).min(client.y / size.y);
        (scale, (client - size * scale) * 0.5)
    }

    fn sync_hud(&self) -> Result<()> {
        let (scale, offset) = self.css_transform();
        self.hud.set_inner_html("");
        for (text, position, style) in &self.texts {
            let span = self
                .document
                .create_element("span")
                .map_err(|_| missing("span element"))?;
            let at = offset + *position * scale;
            let css = format!(
                "position:absolute;left:{:.1}px;top:{:.1}px;font-size:{:.1}px;\
                 line-height:1;white-space:pre;color:{};background:{}",
                at.x,
                at.y,
                FONT_SIZE * scale,
                style.foreground.to_css(),
                style.background.to_css()
            );
            let _ = span.set_attribute("style", &css);
            span.set_text_content(Some(text));
            let _ = self.hud.append_child(&span);
        }
        Ok(())
    }
}

impl Surface for WebSurface {
    fn size(&self) -> Bounds {
        self.frame.bounds
    }

    fn font_height(&self) -> f32 {
        FONT_SIZE
    }

    fn clear(&mut self, background: Color) {
        self.frame.background = background;
        self.frame.circles.clear();
        self.texts.clear();
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.frame.circles.push(CircleShape {
            center,
            radius,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, position: Vec2, style: TextStyle) {
        self.texts.push((text.to_string(), position, style));
    }

    fn present(&mut self) -> Result<()> {
        match self.renderer.render(&self.frame) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost) => {
                let (w, h) = self.renderer.size;
                self.renderer.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(Error::Surface("GPU out of memory".to_string()));
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
        self.sync_hud()
    }
}

/// Milliseconds from `Date.now()`; pacing is left to `requestAnimationFrame`
pub struct WebClock {
    start_ms: f64,
}

impl WebClock {
    pub fn new() -> Self {
        Self {
            start_ms: js_sys::Date::now(),
        }
    }
}

impl Clock for WebClock {
    fn elapsed_seconds(&self) -> f64 {
        (js_sys::Date::now() - self.start_ms) / 1000.0
    }

    fn wait_for_next_frame(&mut self, _frame_rate: u32) {}
}

/// Events queued by DOM listeners between frames
#[derive(Clone, Default)]
pub struct WebInput {
    queue: Rc<RefCell<Vec<InputEvent>>>,
}

impl WebInput {
    fn push(&self, event: InputEvent) {
        self.queue.borrow_mut().push(event);
    }
}

impl InputSource for WebInput {
    fn poll_events(&mut self) -> Result<Vec<InputEvent>> {
        Ok(std::mem::take(&mut *self.queue.borrow_mut()))
    }
}

struct WebGame {
    game_loop: GameLoop,
    surface: WebSurface,
    clock: WebClock,
    input: WebInput,
    last_step_ms: Option<f64>,
}

impl WebGame {
    fn frame_due(&self, time: f64) -> bool {
        let frame_ms = self.game_loop.settings().frame_duration_secs() * 1000.0;
        self.last_step_ms.is_none_or(|last| time - last >= frame_ms)
    }
}

pub async fn run() -> Result<()> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info)
        .map_err(|e| Error::Surface(format!("failed to init logger: {e}")))?;

    log::info!("Poke the Dots starting...");

    let settings = Settings::load();
    let window = web_sys::window().ok_or_else(|| missing("window"))?;
    let document = window.document().ok_or_else(|| missing("document"))?;

    let canvas: HtmlCanvasElement = document
        .get_element_by_id("canvas")
        .ok_or_else(|| missing("#canvas"))?
        .dyn_into()
        .map_err(|_| missing("canvas element"))?;
    let hud = document
        .get_element_by_id("hud")
        .ok_or_else(|| missing("#hud"))?;

    let dpr = window.device_pixel_ratio();
    let width = (canvas.client_width() as f64 * dpr) as u32;
    let height = (canvas.client_height() as f64 * dpr) as u32;
    canvas.set_width(width);
    canvas.set_height(height);

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU,
        ..Default::default()
    });
    let gpu_surface = instance
        .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
        .map_err(|e| Error::Surface(format!("failed to create surface: {e}")))?;
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&gpu_surface),
            force_fallback_adapter: false,
        })
        .await
        .map_err(|e| Error::Surface(format!("failed to get adapter: {e}")))?;
    log::info!("Using adapter: {:?}", adapter.get_info().name);

    let renderer = CircleRenderState::new(gpu_surface, &adapter, width, height).await?;

    let bounds = Bounds::new(SURFACE_WIDTH, SURFACE_HEIGHT);
    let seed = settings.seed.unwrap_or(js_sys::Date::now() as u64);
    let state = GameState::new_game(bounds, seed)?;

    let input = WebInput::default();
    setup_input_handlers(&canvas, &window, &input);

    let game = Rc::new(RefCell::new(WebGame {
        game_loop: GameLoop::new(state, settings),
        surface: WebSurface {
            renderer,
            canvas,
            hud,
            document,
            frame: CircleFrame {
                bounds,
                background: Color::BLACK,
                circles: Vec::new(),
            },
            texts: Vec::new(),
        },
        clock: WebClock::new(),
        input,
        last_step_ms: None,
    }));

    log::info!("Game initialized with seed: {}", seed);
    request_animation_frame(game);
    Ok(())
}

fn setup_input_handlers(canvas: &HtmlCanvasElement, window: &web_sys::Window, input: &WebInput) {
    {
        let input = input.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            input.push(InputEvent::PointerReleased);
        });
        let _ =
            canvas.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    {
        let input = input.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            input.push(InputEvent::CloseRequested);
        });
        let _ =
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn request_animation_frame(game: Rc<RefCell<WebGame>>) {
    let Some(window) = web_sys::window() else {
        log::error!("No window; stopping game loop");
        return;
    };
    let closure = Closure::once(move |time: f64| {
        game_loop(game, time);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn game_loop(game: Rc<RefCell<WebGame>>, time: f64) {
    let control = {
        let mut g = game.borrow_mut();
        if g.frame_due(time) {
            g.last_step_ms = Some(time);
            let WebGame {
                game_loop,
                surface,
                clock,
                input,
                ..
            } = &mut *g;
            game_loop.step(surface, clock, input)
        } else {
            Ok(LoopControl::Continue)
        }
    };

    match control {
        Ok(LoopControl::Continue) => request_animation_frame(game),
        Ok(LoopControl::Exit) => {
            log::info!("Close requested, final score {}", game.borrow().game_loop.state().score());
        }
        Err(e) => log::error!("Game loop stopped: {}", e),
    }
}
