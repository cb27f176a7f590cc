//! Terminal frontend (native)
//!
//! Draws the logical surface onto a ratatui braille canvas stretched over the
//! whole terminal, reads mouse and keys through crossterm, and paces frames
//! with a blocking sleep.

use std::io::{Stdout, stdout};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use glam::Vec2;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Color as TermColor, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle};

use super::{Clock, InputEvent, InputSource, Surface, TextStyle};
use crate::color::Color;
use crate::error::Result;
use crate::sim::Bounds;

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb(color.r, color.g, color.b)
}

/// Cell holding the top-left corner of a text line drawn at `position`.
///
/// Rows are `height / rows` logical pixels tall, so a line placed at
/// `height - font_height` lands on the bottom row.
fn text_cell(position: Vec2, bounds: Bounds, area: Rect) -> (u16, u16) {
    let cols = area.width.max(1);
    let rows = area.height.max(1);
    let col = (position.x / bounds.width * cols as f32).floor().max(0.0) as u16;
    let row = (position.y / bounds.height * rows as f32).round().max(0.0) as u16;
    (area.x + col.min(cols - 1), area.y + row.min(rows - 1))
}

/// Queued drawing, flushed on `present`
#[derive(Debug, Clone)]
enum Shape {
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Text {
        text: String,
        position: Vec2,
        style: TextStyle,
    },
}

pub struct TerminalSurface {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    bounds: Bounds,
    background: Color,
    shapes: Vec<Shape>,
    /// Terminal rows at the last draw
    rows: u16,
    restored: bool,
}

impl TerminalSurface {
    /// Take over the terminal: raw mode, alternate screen, mouse capture.
    pub fn new(bounds: Bounds) -> Result<Self> {
        enable_raw_mode()?;
        let mut out = stdout();
        execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(out))?;
        terminal.hide_cursor()?;
        terminal.clear()?;
        let (_, rows) = crossterm::terminal::size()?;

        Ok(Self {
            terminal,
            bounds,
            background: Color::BLACK,
            shapes: Vec::new(),
            rows,
            restored: false,
        })
    }

    /// Give the terminal back. Safe to call more than once.
    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::error!("Failed to restore terminal: {}", e);
        }
    }
}

impl Surface for TerminalSurface {
    fn size(&self) -> Bounds {
        self.bounds
    }

    fn font_height(&self) -> f32 {
        self.bounds.height / self.rows.max(1) as f32
    }

    fn clear(&mut self, background: Color) {
        self.background = background;
        self.shapes.clear();
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.shapes.push(Shape::Circle {
            center,
            radius,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, position: Vec2, style: TextStyle) {
        self.shapes.push(Shape::Text {
            text: text.to_string(),
            position,
            style,
        });
    }

    fn present(&mut self) -> Result<()> {
        let shapes = std::mem::take(&mut self.shapes);
        let bounds = self.bounds;
        let background = term_color(self.background);
        let mut rows = self.rows;

        // Canvas y grows upward, the surface's grows downward
        let flip = |y: f32| (bounds.height - y) as f64;

        self.terminal.draw(|frame| {
            let area = frame.area();
            rows = area.height;

            let canvas = Canvas::default()
                .background_color(background)
                .marker(Marker::Braille)
                .x_bounds([0.0, bounds.width as f64])
                .y_bounds([0.0, bounds.height as f64])
                .paint(|ctx| {
                    for shape in &shapes {
                        if let Shape::Circle {
                            center,
                            radius,
                            color,
                        } = shape
                        {
                            ctx.draw(&Circle {
                                x: center.x as f64,
                                y: flip(center.y),
                                radius: *radius as f64,
                                color: term_color(*color),
                            });
                        }
                    }
                });
            frame.render_widget(canvas, area);

            // Text goes straight into cells on top of the canvas
            for shape in &shapes {
                if let Shape::Text {
                    text,
                    position,
                    style,
                } = shape
                {
                    let (x, y) = text_cell(*position, bounds, area);
                    let style = Style::default()
                        .fg(term_color(style.foreground))
                        .bg(term_color(style.background));
                    let line = Rect::new(x, y, area.right().saturating_sub(x), 1);
                    frame.render_widget(Line::from(Span::styled(text.clone(), style)), line);
                }
            }
        })?;

        self.rows = rows;
        Ok(())
    }
}

/// Map a crossterm event onto the game's input categories
pub fn translate_event(event: &Event) -> InputEvent {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            let ctrl_c =
                key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
            match key.code {
                _ if ctrl_c => InputEvent::CloseRequested,
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    InputEvent::CloseRequested
                }
                _ => InputEvent::Other,
            }
        }
        Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Up(_)) => {
            InputEvent::PointerReleased
        }
        _ => InputEvent::Other,
    }
}

/// Non-blocking reader of pending terminal events
#[derive(Debug, Default)]
pub struct TerminalInput;

impl TerminalInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for TerminalInput {
    fn poll_events(&mut self) -> Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            events.push(translate_event(&event::read()?));
        }
        Ok(events)
    }
}

/// Wall clock with sleep-based frame pacing
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
    last_frame: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed_seconds(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    fn wait_for_next_frame(&mut self, frame_rate: u32) {
        let frame = Duration::from_secs_f64(1.0 / frame_rate.max(1) as f64);
        let target = self.last_frame + frame;
        let now = Instant::now();
        if target > now {
            thread::sleep(target - now);
        }
        self.last_frame = Instant::now();
    }
}
