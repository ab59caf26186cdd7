use crate::flow::VelocityField;
use crate::vec2::Vec2;

/// Frames for the arrow overlay to fade fully in or out.
pub const FADE_STEPS: i32 = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ArrowSample {
    pub pos: Vec2,
    /// Unit direction of the local velocity (zero where the flow stalls).
    pub dir: Vec2,
    pub speed: f64,
}

/// Coarse quiver of the velocity field.
///
/// An edit flips `fade` negative; the overlay then fades out, is resampled at
/// the moment `fade` reaches 0, and fades back in with the new field.
#[derive(Clone, Debug)]
pub struct ArrowField {
    samples: Vec<ArrowSample>,
    max_speed: f64,
    fade: i32,
}

fn sample_pos(x: usize, y: usize, cols: usize, rows: usize) -> Vec2 {
    let (c, r) = (cols as f64, rows as f64);
    Vec2::new(
        (x as f64 + 1.0) * (1.0 - 1.0 / c) / c,
        (y as f64 + 1.0) * (1.0 - 1.0 / r) / r,
    )
}

impl ArrowField {
    pub fn new(cols: usize, rows: usize) -> Self {
        let mut samples = Vec::with_capacity(cols * rows);
        for y in 0..rows {
            for x in 0..cols {
                samples.push(ArrowSample {
                    pos: sample_pos(x, y, cols, rows),
                    ..ArrowSample::default()
                });
            }
        }
        Self {
            samples,
            max_speed: 0.0,
            fade: FADE_STEPS,
        }
    }

    pub fn samples(&self) -> &[ArrowSample] {
        &self.samples
    }

    #[cfg(test)]
    pub fn fade(&self) -> i32 {
        self.fade
    }

    pub fn resample(&mut self, field: &VelocityField) {
        self.samples.iter_mut().for_each(|s| {
            let vel = field.evaluate(s.pos);
            let speed = vel.length();
            s.speed = speed;
            s.dir = if speed > 0.0 && speed.is_finite() {
                vel * (1.0 / speed)
            } else {
                Vec2::zero()
            };
        });
        self.max_speed = self
            .samples
            .iter()
            .map(|s| s.speed)
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max);
    }

    /// Start fading out. Repeated edits during a fade keep the current level.
    pub fn restart_fade(&mut self) {
        self.fade = -self.fade.abs();
    }

    /// Per-frame fade step. Returns true when the field was resampled.
    pub fn advance(&mut self, field: &VelocityField) -> bool {
        if self.fade < FADE_STEPS {
            self.fade += 1;
        }
        if self.fade == 0 {
            self.resample(field);
            return true;
        }
        false
    }

    /// Grey level of one arrow: faster arrows are brighter, scaled by fade.
    pub fn brightness(&self, sample: &ArrowSample) -> u8 {
        brightness(sample.speed, self.max_speed, self.fade)
    }

    #[cfg(test)]
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }
}

pub fn brightness(speed: f64, max_speed: f64, fade: i32) -> u8 {
    let ratio = if max_speed > 0.0 {
        (speed / max_speed).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let ratio = if ratio.is_nan() { 1.0 } else { ratio };
    let level = (ratio * 136.0 + 85.0) * (fade.abs() as f64 / FADE_STEPS as f64);
    level.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{ElementKind, ElementStore, FlowParams};

    #[test]
    fn test_sample_layout() {
        let arrows = ArrowField::new(15, 10);
        assert_eq!(arrows.samples().len(), 150);
        let first = arrows.samples()[0].pos;
        assert!((first.x - (1.0 - 1.0 / 15.0) / 15.0).abs() < 1e-12);
        assert!((first.y - 0.09).abs() < 1e-12);
        let last = arrows.samples()[149].pos;
        assert!(last.in_unit_square());
        assert!((last.x - (1.0 - 1.0 / 15.0)).abs() < 1e-12);
    }

    #[test]
    fn test_resample_uniform_stream() {
        let params = FlowParams::default();
        let store = ElementStore::new(4);
        let field = VelocityField::new(&store, &params);
        let mut arrows = ArrowField::new(4, 3);
        arrows.resample(&field);
        for s in arrows.samples() {
            assert_eq!(s.dir, Vec2::new(1.0, 0.0));
            assert_eq!(s.speed, 1.0);
        }
        assert_eq!(arrows.max_speed(), 1.0);
    }

    #[test]
    fn test_fade_cycle_resamples_once_at_zero() {
        let params = FlowParams::default();
        let mut store = ElementStore::new(4);
        let mut arrows = ArrowField::new(3, 3);
        {
            let field = VelocityField::new(&store, &params);
            arrows.resample(&field);
        }
        store.place(ElementKind::Vortex, Vec2::new(0.5, 0.5), 0.5);
        let field = VelocityField::new(&store, &params);
        arrows.restart_fade();
        assert_eq!(arrows.fade(), -FADE_STEPS);

        let mut resamples = 0;
        for _ in 0..(2 * FADE_STEPS + 5) {
            if arrows.advance(&field) {
                resamples += 1;
                assert_eq!(arrows.fade(), 0);
            }
        }
        assert_eq!(resamples, 1);
        assert_eq!(arrows.fade(), FADE_STEPS);
        assert!(arrows.samples().iter().any(|s| s.dir != Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn test_restart_fade_mid_fade_keeps_level() {
        let params = FlowParams::default();
        let store = ElementStore::new(1);
        let field = VelocityField::new(&store, &params);
        let mut arrows = ArrowField::new(2, 2);
        arrows.restart_fade();
        for _ in 0..4 {
            arrows.advance(&field);
        }
        assert_eq!(arrows.fade(), -6);
        arrows.restart_fade();
        assert_eq!(arrows.fade(), -6);
    }

    #[test]
    fn test_brightness_range() {
        assert_eq!(brightness(1.0, 1.0, FADE_STEPS), 221);
        assert_eq!(brightness(0.0, 1.0, FADE_STEPS), 85);
        assert_eq!(brightness(1.0, 1.0, 0), 0);
        assert_eq!(brightness(1.0, 0.0, FADE_STEPS), 85);
        assert_eq!(brightness(f64::INFINITY, 2.0, FADE_STEPS), 221);
    }
}
