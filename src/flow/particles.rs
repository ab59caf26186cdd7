use rayon::prelude::*;

use super::elements::{ElementKind, ElementStore};
use super::field::VelocityField;
use crate::vec2::Vec2;

/// Position of an inactive tracer. Far outside the unit square, so it is
/// never advected and clipped by any renderer.
pub const SENTINEL: Vec2 = Vec2::new(-100.0, -100.0);

/// Below this many particles the rayon split costs more than it saves.
const PAR_THRESHOLD: usize = 1024;
const PAR_MIN_WORK_PER_THREAD: usize = 256;

fn should_parallel(len: usize) -> bool {
    if len < PAR_THRESHOLD {
        return false;
    }
    let threads = rayon::current_num_threads().max(1);
    len / threads >= PAR_MIN_WORK_PER_THREAD
}

pub fn is_sentinel(pos: Vec2) -> bool {
    pos == SENTINEL
}

/// Capture radii around absorbing elements.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AbsorptionRadii {
    /// Around sources with negative strength.
    pub sink: f64,
    /// Around any occupied dipole, whatever its sign.
    pub dipole: f64,
}

impl Default for AbsorptionRadii {
    fn default() -> Self {
        Self { sink: 0.025, dipole: 0.05 }
    }
}

/// Whether `pos` sits inside a sink's or a dipole's capture radius.
pub fn is_absorbed(pos: Vec2, elements: &ElementStore, radii: AbsorptionRadii) -> bool {
    let near_sink = elements
        .slots(ElementKind::Source)
        .iter()
        .any(|e| e.strength < 0.0 && (pos - e.pos).length() < radii.sink);
    let near_dipole = elements
        .slots(ElementKind::Dipole)
        .iter()
        .any(|e| e.strength != 0.0 && (pos - e.pos).length() < radii.dipole);
    near_sink || near_dipole
}

/// One tracer's tick: integrate, drop on exit, then drop on capture.
#[inline]
fn step_particle(pos: &mut Vec2, field: &VelocityField, dt: f64, radii: AbsorptionRadii) {
    if is_sentinel(*pos) {
        return;
    }
    if pos.in_unit_square() {
        *pos += field.evaluate(*pos) * dt;
    }
    if !pos.in_unit_square() {
        *pos = SENTINEL;
        return;
    }
    if is_absorbed(*pos, field.elements(), radii) {
        *pos = SENTINEL;
    }
}

/// Fixed pool of tracer particles, reused in place.
#[derive(Clone, Debug)]
pub struct ParticleSystem {
    positions: Vec<Vec2>,
}

impl ParticleSystem {
    /// All `count` slots start inactive.
    pub fn new(count: usize) -> Self {
        Self {
            positions: vec![SENTINEL; count],
        }
    }

    /// Place one tracer at the centre of each `width × height` cell, filling
    /// the first slots. Slots beyond the grid are left untouched.
    pub fn seed_grid(&mut self, width: usize, height: usize) {
        for y in 0..height {
            for x in 0..width {
                if let Some(p) = self.positions.get_mut(x + y * width) {
                    *p = Vec2::new(
                        (x as f64 + 0.5) / width as f64,
                        (y as f64 + 0.5) / height as f64,
                    );
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Vec2] {
        &mut self.positions
    }

    pub fn live_count(&self) -> usize {
        self.positions.iter().filter(|p| !is_sentinel(**p)).count()
    }

    /// Advance every live tracer by one explicit Euler step.
    pub fn tick(&mut self, field: &VelocityField, dt: f64, radii: AbsorptionRadii) {
        if should_parallel(self.positions.len()) {
            self.positions
                .par_iter_mut()
                .for_each(|p| step_particle(p, field, dt, radii));
        } else {
            self.positions
                .iter_mut()
                .for_each(|p| step_particle(p, field, dt, radii));
        }
    }
}
