//! App - event loop tying the terminal to the playground

use std::time::{Duration, Instant};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{layout::Rect, DefaultTerminal};

use gesture_synth::{dsp::Waveform, render::FrameRecorder, GestureEvent, Playground};

use super::{
    konami::KonamiDetector,
    ui::{self, to_point, Screen},
};

/// Roughly 60 frames per second.
const FRAME: Duration = Duration::from_millis(16);

pub struct App {
    playground: Playground,
    background: FrameRecorder,
    screen: Screen,
    konami: KonamiDetector,
    start: Instant,
    should_quit: bool,
}

impl App {
    pub fn new(playground: Playground) -> Self {
        Self {
            playground,
            background: FrameRecorder::new(),
            screen: Screen::default(),
            konami: KonamiDetector::new(),
            start: Instant::now(),
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            let size = terminal.size().wrap_err("failed to read terminal size")?;
            let screen = Screen::new(Rect::new(0, 0, size.width, size.height));
            if screen != self.screen {
                self.screen = screen;
                self.playground.layout(screen.surface_layout());
            }

            self.playground.tick(self.now(), &mut self.background);

            terminal
                .draw(|frame| ui::render(frame, &self.screen, &self.playground, self.background.last()))
                .wrap_err("failed to draw")?;

            // Drain input without blocking past the next frame
            if event::poll(FRAME)? {
                self.handle_event(event::read()?);
                while event::poll(Duration::ZERO)? {
                    self.handle_event(event::read()?);
                }
            }
        }
        Ok(())
    }

    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn handle_event(&mut self, event: Event) {
        let now = self.now();
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key.code, now),
            Event::Mouse(mouse) => {
                if let Some(gesture) = gesture(mouse) {
                    self.playground.handle(gesture, now);
                }
            }
            Event::FocusLost => self.playground.suspend(now),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyCode, now: Duration) {
        if self.konami.feed(key) {
            log::info!("konami code entered");
            self.playground.trigger_sequence(now);
            return;
        }
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => self.playground.toggle_synth(now),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.playground.select_waveform(Waveform::ALL[index]);
            }
            KeyCode::Char('f') | KeyCode::Char('F') => self.playground.freeze(now),
            _ => {}
        }
    }
}

/// Left button drives gestures; plain movement is hover.
fn gesture(mouse: MouseEvent) -> Option<GestureEvent> {
    let at = to_point(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(GestureEvent::Down(at)),
        MouseEventKind::Drag(MouseButton::Left) => Some(GestureEvent::Move(at)),
        MouseEventKind::Up(MouseButton::Left) => Some(GestureEvent::Up(at)),
        MouseEventKind::Moved => Some(GestureEvent::Hover(at)),
        _ => None,
    }
}
