//! TUI module for gesture-playground
//!
//! Terminal cells are mapped onto a surface of logical units so the library
//! sees the same coordinates a pixel host would: one cell is
//! `CELL_WIDTH × CELL_HEIGHT` units.

mod controls;
mod waveform;

use gesture_synth::{
    engine::EngineState,
    gesture::{Bounds, Point},
    render::FrameGeometry,
    Layout as SurfaceLayout, Playground,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use controls::{render_keyboard, render_pad, render_stem, render_synth};
use waveform::render_waveform;

pub const CELL_WIDTH: f32 = 8.0;
pub const CELL_HEIGHT: f32 = 16.0;

pub const ACCENT: Color = Color::Rgb(255, 107, 43);

/// Cell rectangles of everything on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Screen {
    pub area: Rect,
    pub header: Rect,
    pub keyboard: Rect,
    pub flower: Rect,
    pub mouth: Rect,
    pub stem: Rect,
    pub synth: Rect,
    pub play: Rect,
    pub waveforms: [Rect; 4],
    pub frequency_knob: Rect,
    pub volume_knob: Rect,
    pub pad: Rect,
    pub waveform: Rect,
    pub help: Rect,
}

impl Screen {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Header
                Constraint::Min(12),    // Controls
                Constraint::Length(10), // Waveform
                Constraint::Length(1),  // Help bar
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(rows[1]);

        let keyboard = framed(columns[0]);
        let flower = framed(columns[1]);
        let synth = framed(columns[2]);
        let pad = framed(columns[3]);

        let mouth_height = 3.min(flower.height);
        let mouth = centered(Rect { height: mouth_height, ..flower }, 9);
        let stem = centered(
            Rect {
                y: flower.y + mouth_height,
                height: flower.height.saturating_sub(mouth_height),
                ..flower
            },
            3,
        );

        let synth_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Play
                Constraint::Length(1),
                Constraint::Length(1), // Waveforms
                Constraint::Length(1),
                Constraint::Min(3), // Knobs
            ])
            .split(synth);
        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(synth_rows[2]);
        let knobs = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 2); 2])
            .split(synth_rows[4]);

        Self {
            area,
            header: rows[0],
            keyboard,
            flower,
            mouth,
            stem,
            synth,
            play: synth_rows[0],
            waveforms: [buttons[0], buttons[1], buttons[2], buttons[3]],
            frequency_knob: knobs[0],
            volume_knob: knobs[1],
            pad,
            waveform: rows[2],
            help: rows[3],
        }
    }

    /// The same layout in surface units.
    pub fn surface_layout(&self) -> SurfaceLayout {
        let background = units(framed(self.waveform));
        SurfaceLayout {
            width: background.width,
            height: background.height,
            scale: 1.0,
            keyboard: units(self.keyboard),
            stem: units(self.stem),
            mouth: units(self.mouth),
            pad: units(self.pad),
            synth: units(self.synth),
            frequency_knob: units(self.frequency_knob),
            volume_knob: units(self.volume_knob),
            play_button: units(self.play),
            waveform_buttons: self.waveforms.map(units),
            waveform: background,
        }
    }
}

/// Centre of a terminal cell in surface units.
pub fn to_point(column: u16, row: u16) -> Point {
    Point::new(
        (column as f32 + 0.5) * CELL_WIDTH,
        (row as f32 + 0.5) * CELL_HEIGHT,
    )
}

fn units(r: Rect) -> Bounds {
    Bounds::new(
        r.x as f32 * CELL_WIDTH,
        r.y as f32 * CELL_HEIGHT,
        r.width as f32 * CELL_WIDTH,
        r.height as f32 * CELL_HEIGHT,
    )
}

/// Inside of a bordered block.
fn framed(r: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(r)
}

fn centered(r: Rect, width: u16) -> Rect {
    let width = width.min(r.width);
    Rect {
        x: r.x + (r.width - width) / 2,
        width,
        ..r
    }
}

pub fn render(frame: &mut Frame, screen: &Screen, playground: &Playground, background: Option<&FrameGeometry>) {
    render_header(frame, screen.header, playground);

    render_keyboard(frame, screen, playground.keyboard());
    render_stem(frame, screen, playground.stem());
    render_synth(frame, screen, playground.synth());
    render_pad(frame, screen, playground.pad());

    render_waveform(frame, screen.waveform, background);

    let help = Paragraph::new(
        " [Mouse] Play  [Space] Synth on/off  [1-4] Waveform  [F] Freeze  [Q] Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, screen.help);
}

fn render_header(frame: &mut Frame, area: Rect, playground: &Playground) {
    let engine = playground.engine();
    let (status, color) = match engine.state() {
        _ if engine.is_silent() => ("silent", Color::Red),
        EngineState::Running => ("running", Color::Green),
        EngineState::Suspended => ("suspended", Color::Yellow),
        EngineState::Uninitialized => ("click to start audio", Color::DarkGray),
    };
    let rate = engine
        .sample_rate()
        .map_or_else(|| "--".to_string(), |sr| format!("{:.1}kHz", sr / 1000.0));
    let sounding = [
        playground.keyboard().voice().is_some(),
        playground.stem().voice().is_some(),
        playground.synth().voice().is_some(),
        playground.pad().voice().is_some(),
    ]
    .into_iter()
    .filter(|&v| v)
    .count()
        + playground.sequence().sounding();

    let line = Line::from(vec![
        Span::styled(format!(" Audio: {status}  "), Style::default().fg(color)),
        Span::styled(format!("{rate}  "), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("Voices: {sounding}  "), Style::default().fg(Color::Cyan)),
    ]);
    let block = Block::default().title(" gesture playground ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_do_not_overlap() {
        let screen = Screen::new(Rect::new(0, 0, 160, 40));
        let layout = screen.surface_layout();
        let regions = [layout.keyboard, layout.stem, layout.pad, layout.synth];
        for (i, a) in regions.iter().enumerate() {
            for b in &regions[i + 1..] {
                assert!(!a.contains(b.center()) && !b.contains(a.center()));
            }
        }
        assert!(layout.synth.contains(layout.frequency_knob.center()));
        assert!(layout.synth.contains(layout.play_button.center()));
    }

    #[test]
    fn cell_centres_land_inside_their_controls() {
        let screen = Screen::new(Rect::new(0, 0, 160, 40));
        let layout = screen.surface_layout();
        let k = screen.keyboard;
        assert!(layout.keyboard.contains(to_point(k.x, k.y)));
        assert!(layout.keyboard.contains(to_point(k.x + k.width - 1, k.y + k.height - 1)));
        assert!(!layout.keyboard.contains(to_point(k.x + k.width, k.y)));
    }

    #[test]
    fn only_the_waveform_pane_is_background() {
        let screen = Screen::new(Rect::new(0, 0, 160, 40));
        let layout = screen.surface_layout();
        let w = framed(screen.waveform);
        assert!(layout.waveform.contains(to_point(w.x, w.y)));
        assert!(!layout.waveform.contains(to_point(screen.header.x, screen.header.y)));
        assert!(!layout.waveform.contains(to_point(screen.help.x, screen.help.y)));
    }
}
