//! ↑ ↑ ↓ ↓ ← → ← → B A

use crossterm::event::KeyCode;

const CODE: [KeyCode; 10] = [
    KeyCode::Up,
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::Down,
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::Char('b'),
    KeyCode::Char('a'),
];

#[derive(Debug, Default)]
pub struct KonamiDetector {
    progress: usize,
}

impl KonamiDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key press. Returns `true` when it completes the code.
    pub fn feed(&mut self, key: KeyCode) -> bool {
        let key = match key {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        if key == CODE[self.progress] {
            self.progress += 1;
        } else {
            // a wrong key may still start a new attempt; ↑ ↑ ↑ keeps the last two
            self.progress = match key {
                KeyCode::Up if self.progress == 2 => 2,
                KeyCode::Up => 1,
                _ => 0,
            };
        }
        if self.progress == CODE.len() {
            self.progress = 0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(d: &mut KonamiDetector, keys: &[KeyCode]) -> bool {
        keys.iter().fold(false, |fired, &k| d.feed(k) || fired)
    }

    #[test]
    fn full_code_fires_once() {
        let mut d = KonamiDetector::new();
        assert!(feed_all(&mut d, &CODE));
        assert!(!d.feed(KeyCode::Char('a')));
    }

    #[test]
    fn uppercase_letters_count() {
        let mut d = KonamiDetector::new();
        let mut keys = CODE.to_vec();
        keys[8] = KeyCode::Char('B');
        keys[9] = KeyCode::Char('A');
        assert!(feed_all(&mut d, &keys));
    }

    #[test]
    fn extra_up_is_forgiven() {
        let mut d = KonamiDetector::new();
        let mut keys = vec![KeyCode::Up];
        keys.extend(CODE);
        assert!(feed_all(&mut d, &keys));
    }

    #[test]
    fn mistake_restarts() {
        let mut d = KonamiDetector::new();
        let mut keys = vec![KeyCode::Up, KeyCode::Up, KeyCode::Char('x')];
        keys.extend(CODE);
        assert!(feed_all(&mut d, &keys));

        let mut d = KonamiDetector::new();
        assert!(!feed_all(&mut d, &CODE[..9]));
        assert!(!d.feed(KeyCode::Char('q')));
        assert!(!d.feed(KeyCode::Char('a')));
    }
}
