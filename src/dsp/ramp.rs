/*
Gain Ramps
==========

A voice's loudness never jumps. Every gain change is a ramp: a number of
samples over which the current level moves toward a target. Two curves are
available.

  Linear        level += (target - level) / remaining
                Used for short smoothing of gesture-driven gain writes and
                for the attack/decay of plucked notes.

  Exponential   level *= (target / level) ^ (1 / remaining)
                Used for releases. Perceived loudness is logarithmic, so a
                constant ratio per sample sounds like an even fade, where a
                linear fade seems to hang and then drop off at the end.

An exponential curve can never reach zero, so releases aim at RAMP_FLOOR
(-60 dB) and the voice is torn down afterwards. A start or target level of
zero is lifted to the floor before the ratio is computed.

    level
      g ┐╲
        │ ╲
        │  ╲_
        │    ╲__
    .001└───────╲______→ time
          fade

A ramp may have one follow-up segment queued behind it. Plucked notes use
this: attack to the peak, then decay to silence, without the control thread
having to send a second command at the right moment.

Step sizes are computed when a segment becomes active, from the level at that
instant, so the segment always ends exactly on its target.
*/

/// Level that exponential ramps aim for instead of zero (-60 dB).
pub const RAMP_FLOOR: f32 = 0.001;

/// Shape of a gain transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampCurve {
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    target: f32,
    samples: u32,
    curve: RampCurve,
}

#[derive(Debug, Clone, Copy)]
struct ActiveSegment {
    target: f32,
    remaining: u32,
    step: f32,
    curve: RampCurve,
}

/// Per-sample gain with at most one running and one queued segment.
#[derive(Debug, Clone)]
pub struct GainRamp {
    level: f32,
    active: Option<ActiveSegment>,
    queued: Option<Segment>,
}

impl GainRamp {
    pub fn new(level: f32) -> Self {
        Self {
            level,
            active: None,
            queued: None,
        }
    }

    /// Jump to `level`, dropping any ramp in flight.
    pub fn set(&mut self, level: f32) {
        self.level = level;
        self.active = None;
        self.queued = None;
    }

    /// Start a ramp from the current level, replacing any ramp in flight.
    pub fn ramp_to(&mut self, target: f32, samples: u32, curve: RampCurve) {
        self.queued = None;
        self.begin(Segment {
            target,
            samples,
            curve,
        });
    }

    /// Queue a segment to run when the current one ends. With nothing in
    /// flight it starts immediately.
    pub fn then(&mut self, target: f32, samples: u32, curve: RampCurve) {
        let segment = Segment {
            target,
            samples,
            curve,
        };
        if self.active.is_some() {
            self.queued = Some(segment);
        } else {
            self.begin(segment);
        }
    }

    fn begin(&mut self, segment: Segment) {
        if segment.samples == 0 {
            self.level = segment.target;
            self.active = None;
            return;
        }

        let n = segment.samples as f32;
        let (target, step) = match segment.curve {
            RampCurve::Linear => (segment.target, (segment.target - self.level) / n),
            RampCurve::Exponential => {
                let target = segment.target.max(RAMP_FLOOR);
                self.level = self.level.max(RAMP_FLOOR);
                (target, (target / self.level).powf(1.0 / n))
            }
        };

        self.active = Some(ActiveSegment {
            target,
            remaining: segment.samples,
            step,
            curve: segment.curve,
        });
    }

    /// Advance by one sample and return the new level.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if let Some(seg) = self.active.as_mut() {
            match seg.curve {
                RampCurve::Linear => self.level += seg.step,
                RampCurve::Exponential => self.level *= seg.step,
            }
            seg.remaining -= 1;

            if seg.remaining == 0 {
                self.level = seg.target;
                self.active = None;
                if let Some(next) = self.queued.take() {
                    self.begin(next);
                }
            }
        }
        self.level
    }

    /// Multiply `block` in place by the ramped gain.
    pub fn apply(&mut self, block: &mut [f32]) {
        for sample in block.iter_mut() {
            *sample *= self.next_sample();
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_ramping(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(ramp: &mut GainRamp, samples: usize) {
        for _ in 0..samples {
            ramp.next_sample();
        }
    }

    #[test]
    fn linear_ramp_lands_on_target() {
        let mut ramp = GainRamp::new(0.0);
        ramp.ramp_to(0.3, 100, RampCurve::Linear);
        run(&mut ramp, 50);
        assert!((ramp.level() - 0.15).abs() < 1e-4);
        run(&mut ramp, 50);
        assert_eq!(ramp.level(), 0.3);
        assert!(!ramp.is_ramping());
    }

    #[test]
    fn exponential_release_decays_monotonically_to_floor() {
        let mut ramp = GainRamp::new(0.3);
        ramp.ramp_to(0.0, 4_800, RampCurve::Exponential);

        let mut previous = ramp.level();
        for _ in 0..4_800 {
            let level = ramp.next_sample();
            assert!(level <= previous + 1e-7);
            previous = level;
        }
        assert_eq!(ramp.level(), RAMP_FLOOR);
    }

    #[test]
    fn queued_segment_follows_the_first() {
        let mut ramp = GainRamp::new(0.0);
        ramp.ramp_to(0.15, 20, RampCurve::Linear);
        ramp.then(0.0, 280, RampCurve::Linear);

        run(&mut ramp, 20);
        assert!((ramp.level() - 0.15).abs() < 1e-6);
        assert!(ramp.is_ramping(), "decay should start right after the attack");

        run(&mut ramp, 280);
        assert!(ramp.level().abs() < 1e-6);
        assert!(!ramp.is_ramping());
    }

    #[test]
    fn set_cancels_everything() {
        let mut ramp = GainRamp::new(0.5);
        ramp.ramp_to(0.0, 100, RampCurve::Exponential);
        ramp.then(0.2, 10, RampCurve::Linear);
        ramp.set(0.25);
        run(&mut ramp, 200);
        assert_eq!(ramp.level(), 0.25);
    }
}
