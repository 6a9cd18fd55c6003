//! Ambient waveform widget

use gesture_synth::render::{FrameGeometry, Rgb};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders,
    },
    Frame,
};

/// Render the background layers on a braille canvas
pub fn render_waveform(frame: &mut Frame, area: Rect, geometry: Option<&FrameGeometry>) {
    let frozen = geometry.is_some_and(FrameGeometry::is_frozen);
    let block = Block::default()
        .title(if frozen { " Waveform (frozen) " } else { " Waveform " })
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if frozen { Color::White } else { Color::DarkGray }));

    let Some(geometry) = geometry else {
        frame.render_widget(block, area);
        return;
    };
    let height = geometry.height as f64;

    let canvas = Canvas::default()
        .block(block)
        .marker(symbols::Marker::Braille)
        .x_bounds([0.0, geometry.width as f64])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for layer in &geometry.layers {
                let color = shade(layer.color, layer.opacity);
                for pair in layer.points.windows(2) {
                    let (x1, y1) = pair[0];
                    let (x2, y2) = pair[1];
                    // canvas y grows upward
                    ctx.draw(&CanvasLine {
                        x1: x1 as f64,
                        y1: height - y1 as f64,
                        x2: x2 as f64,
                        y2: height - y2 as f64,
                        color,
                    });
                }
                ctx.layer();
            }
        });

    frame.render_widget(canvas, area);
}

/// Blend against a black terminal. Faint layers are lifted so they stay
/// visible as braille dots.
fn shade(Rgb(r, g, b): Rgb, opacity: f32) -> Color {
    let alpha = 0.3 + 0.7 * opacity.clamp(0.0, 1.0);
    let c = |v: u8| (v as f32 * alpha).round() as u8;
    Color::Rgb(c(r), c(g), c(b))
}
