/// Terminal host shell for the FacetView core
///
/// Drives the core's drag interaction state machine from crossterm mouse
/// events and draws its primitives through the character rasterizer.
/// Rendering is strictly event-driven: one synchronous redraw per
/// qualifying input event, no animation loop.
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use facetview_core::{RenderMode, Viewer, Viewport};
use std::io::{self, stdout, Write};
use tracing::debug;

pub mod renderer;

pub use renderer::CharRaster;

/// Main application struct for the terminal viewer
pub struct TerminalApp {
    viewer: Viewer,
    mode: RenderMode,
    raster: CharRaster,
    viewport: Viewport,
    running: bool,
}

impl TerminalApp {
    pub fn new(viewer: Viewer) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            viewer,
            mode: RenderMode::Shaded,
            raster: CharRaster::new(width as usize, height as usize),
            viewport: Viewport::new(width as u32, height as u32),
            running: true,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        self.render()?;
        while self.running {
            // Block until input; redraw only on events that changed the view
            let redraw = self.handle_event(event::read()?);
            if redraw {
                self.render()?;
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, ev: Event) -> bool {
        match ev {
            Event::Key(KeyEvent { code, .. }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                    false
                }
                KeyCode::Char('m') | KeyCode::Char('M') => {
                    self.mode = match self.mode {
                        RenderMode::Wireframe => RenderMode::Shaded,
                        RenderMode::Shaded => RenderMode::Wireframe,
                    };
                    debug!(mode = ?self.mode, "mode toggled");
                    true
                }
                KeyCode::Char('0') => {
                    self.viewer.reset_orientation();
                    true
                }
                _ => false,
            },
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => {
                let pos = (column as f32, row as f32);
                match kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        self.viewer.on_drag_start(pos);
                        false
                    }
                    MouseEventKind::Drag(MouseButton::Left) => self.viewer.on_drag_move(pos),
                    MouseEventKind::Up(MouseButton::Left) => {
                        self.viewer.on_drag_end();
                        false
                    }
                    _ => false,
                }
            }
            Event::Resize(width, height) => {
                self.viewport = Viewport::new(width as u32, height as u32);
                self.raster.resize(width as usize, height as usize);
                true
            }
            _ => false,
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let primitives = self
            .viewer
            .render_frame(self.mode, self.viewport)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

        self.raster.clear();
        self.raster.draw_primitives(&primitives);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.raster.draw(&mut stdout)?;

        // Status line overlay
        let mode = match self.mode {
            RenderMode::Wireframe => "wireframe",
            RenderMode::Shaded => "shaded",
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "FacetView | Mode: {} | Drag=Rotate M=Mode 0=Reset Q=Quit",
                mode
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use facetview_core::Orientation;

    fn app() -> TerminalApp {
        TerminalApp {
            viewer: Viewer::default(),
            mode: RenderMode::Shaded,
            raster: CharRaster::new(10, 10),
            viewport: Viewport::new(10, 10),
            running: true,
        }
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn test_mode_toggle_accepts_both_cases() {
        let mut app = app();
        assert!(app.handle_event(key('m')));
        assert_eq!(app.mode, RenderMode::Wireframe);
        assert!(app.handle_event(key('M')));
        assert_eq!(app.mode, RenderMode::Shaded);
    }

    #[test]
    fn test_reset_key_restores_identity() {
        let mut app = app();
        app.viewer.on_drag_start((0.0, 0.0));
        app.viewer.on_drag_move((25.0, 10.0));
        app.viewer.on_drag_end();
        assert_ne!(app.viewer.orientation(), Orientation::identity());
        assert!(app.handle_event(key('0')));
        assert_eq!(app.viewer.orientation(), Orientation::identity());
    }
}
