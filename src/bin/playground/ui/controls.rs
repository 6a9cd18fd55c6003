//! Control widgets: keyboard, flower, synth panel and pad

use gesture_synth::{
    controls::{
        keyboard::{black_keys, white_keys, BLACK_KEY_DEPTH, BLACK_KEY_WIDTH, KEYS},
        synth_panel::KnobId,
        Controller, KeyboardMapping, PadMapping, StemMapping, SynthPanel,
    },
    dsp::Waveform,
};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{Screen, ACCENT};

/// Bordered block around an inner rectangle from [`Screen`].
fn frame_around(frame: &mut Frame, inner: Rect, title: &str, lit: bool) {
    let outer = Rect {
        x: inner.x.saturating_sub(1),
        y: inner.y.saturating_sub(1),
        width: inner.width + 2,
        height: inner.height + 2,
    };
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if lit { ACCENT } else { Color::DarkGray }));
    frame.render_widget(block, outer);
}

fn fill(frame: &mut Frame, area: Rect, color: Color) {
    frame.render_widget(Block::default().style(Style::default().bg(color)), area);
}

pub fn render_keyboard(frame: &mut Frame, screen: &Screen, keyboard: &Controller<KeyboardMapping>) {
    let area = screen.keyboard;
    let pressed = keyboard.feedback().pressed;
    frame_around(frame, area, "Keyboard", pressed.is_some());
    if area.width < 8 || area.height < 2 {
        return;
    }

    // column edge of white key `i`, same proportions as the hit test
    let edge = |i: usize| area.x + (i as u32 * area.width as u32 / 8) as u16;

    for (column, index) in white_keys().enumerate() {
        let key = Rect {
            x: edge(column),
            width: edge(column + 1) - edge(column),
            ..area
        };
        let color = if pressed == Some(index) { ACCENT } else { Color::Gray };
        fill(frame, Rect { width: key.width.saturating_sub(1).max(1), ..key }, color);
        let label = Rect {
            y: key.y + key.height - 1,
            height: 1,
            ..key
        };
        frame.render_widget(
            Paragraph::new(&KEYS[index].name[..1])
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Black)),
            label,
        );
    }

    let white_width = area.width as f32 / 8.0;
    let width = (white_width * BLACK_KEY_WIDTH).round().max(1.0) as u16;
    let height = (area.height as f32 * BLACK_KEY_DEPTH).round().max(1.0) as u16;
    for (index, boundary) in black_keys() {
        let centre = area.x as f32 + boundary as f32 * white_width;
        let key = Rect {
            x: (centre - width as f32 / 2.0).round() as u16,
            y: area.y,
            width,
            height,
        };
        let color = if pressed == Some(index) { ACCENT } else { Color::Black };
        fill(frame, key, color);
    }
}

pub fn render_stem(frame: &mut Frame, screen: &Screen, stem: &Controller<StemMapping>) {
    let feedback = stem.feedback();
    frame_around(frame, screen.flower, "Flower", feedback.pressed);

    let mouth = match feedback.mouth_open {
        o if o < 0.05 => "‿",
        o if o < 0.5 => "o",
        _ => "O",
    };
    let petal = Style::default().fg(ACCENT);
    let face = vec![
        Line::styled(".-'''-.", petal),
        Line::from(vec![
            Span::styled("( ", petal),
            Span::styled(format!("• {mouth} •"), Style::default().fg(Color::White)),
            Span::styled(" )", petal),
        ]),
        Line::styled("'-...-'", petal),
    ];
    frame.render_widget(Paragraph::new(face).alignment(Alignment::Center), screen.mouth);

    let area = screen.stem;
    if area.height == 0 {
        return;
    }
    let indicator = ((1.0 - feedback.pitch) * (area.height - 1) as f32).round() as u16;
    let color = if feedback.pressed { ACCENT } else { Color::Green };
    let lines: Vec<Line> = (0..area.height)
        .map(|row| {
            if row == indicator {
                Line::styled("●", Style::default().fg(color).add_modifier(Modifier::BOLD))
            } else {
                Line::styled("┃", Style::default().fg(Color::Green))
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

pub fn render_synth(frame: &mut Frame, screen: &Screen, synth: &Controller<SynthPanel>) {
    let feedback = synth.feedback();
    frame_around(frame, screen.synth, "Synth", feedback.playing);

    let (label, style) = if feedback.playing {
        ("[ ■ STOP ]", Style::default().fg(Color::Black).bg(ACCENT))
    } else {
        ("[ ▶ PLAY ]", Style::default().fg(ACCENT))
    };
    frame.render_widget(
        Paragraph::new(label).alignment(Alignment::Center).style(style),
        screen.play,
    );

    for (area, waveform) in screen.waveforms.iter().zip(Waveform::ALL) {
        let style = if waveform == feedback.waveform {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        };
        frame.render_widget(
            Paragraph::new(waveform.glyph()).alignment(Alignment::Center).style(style),
            *area,
        );
    }

    let knobs = [
        (
            KnobId::Frequency,
            screen.frequency_knob,
            "FREQ",
            feedback.frequency_angle,
            format!("{:.0} Hz", feedback.frequency),
        ),
        (
            KnobId::Volume,
            screen.volume_knob,
            "VOL",
            feedback.volume_angle,
            format!("{:.0}%", feedback.volume * 100.0),
        ),
    ];
    for (id, area, name, angle, value) in knobs {
        let lit = feedback.dragging == Some(id);
        let style = Style::default().fg(if lit { ACCENT } else { Color::White });
        let lines = vec![
            Line::styled(name, Style::default().fg(Color::DarkGray)),
            Line::styled(format!("({})", pointer(angle)), style.add_modifier(Modifier::BOLD)),
            Line::styled(value, style),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }
}

/// Arrow for a knob indicator at `angle` degrees from straight up.
fn pointer(angle: f32) -> &'static str {
    const ARROWS: [&str; 7] = ["↙", "←", "↖", "↑", "↗", "→", "↘"];
    let step = ((angle + 135.0) / 45.0).round().clamp(0.0, 6.0) as usize;
    ARROWS[step]
}

pub fn render_pad(frame: &mut Frame, screen: &Screen, pad: &Controller<PadMapping>) {
    let area = screen.pad;
    let feedback = pad.feedback();
    frame_around(frame, area, "Pad", feedback.active);
    if area.width == 0 || area.height == 0 {
        return;
    }

    let dot = feedback.active.then(|| {
        (
            (feedback.x * (area.width - 1) as f32).round() as u16,
            ((1.0 - feedback.y) * (area.height - 1) as f32).round() as u16,
        )
    });
    let lines: Vec<Line> = (0..area.height)
        .map(|row| {
            let spans: Vec<Span> = (0..area.width)
                .map(|col| {
                    if dot == Some((col, row)) {
                        Span::styled("●", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
                    } else if col % 4 == 0 && row % 2 == 0 {
                        Span::styled("·", Style::default().fg(Color::DarkGray))
                    } else {
                        Span::raw(" ")
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knob_pointer_covers_the_sweep() {
        assert_eq!(pointer(-135.0), "↙");
        assert_eq!(pointer(0.0), "↑");
        assert_eq!(pointer(135.0), "↘");
        assert_eq!(pointer(500.0), "↘");
    }
}
