use std::f64::consts::PI;

use super::elements::{ElementKind, ElementStore};
use super::params::FlowParams;
use crate::vec2::Vec2;

/// Velocity induced at aspect-corrected offset `d` by one element.
/// Singular at `d == 0`; callers tolerate the non-finite result.
#[inline]
pub fn contribution(kind: ElementKind, d: Vec2, strength: f64) -> Vec2 {
    let r2 = d.length_sq();
    match kind {
        ElementKind::Source => d * (strength / (2.0 * PI * r2)),
        ElementKind::Vortex => Vec2::new(-d.y, d.x) * (strength / (2.0 * PI * r2)),
        ElementKind::Dipole => {
            Vec2::new(d.y * d.y - d.x * d.x, -2.0 * d.x * d.y) * (strength / (r2 * r2))
        }
    }
}

/// Superposition of the uniform stream and every occupied element slot.
/// Borrows the store, so it is rebuilt cheaply wherever it is needed.
#[derive(Clone, Copy)]
pub struct VelocityField<'a> {
    elements: &'a ElementStore,
    uniform: Vec2,
    aspect: f64,
}

impl<'a> VelocityField<'a> {
    pub fn new(elements: &'a ElementStore, params: &FlowParams) -> Self {
        Self {
            elements,
            uniform: params.uniform,
            aspect: params.aspect(),
        }
    }

    pub fn elements(&self) -> &'a ElementStore {
        self.elements
    }

    /// Velocity at `point`. Free slots contribute nothing.
    pub fn evaluate(&self, point: Vec2) -> Vec2 {
        self.uniform + self.induced(point)
    }

    /// Element-only part of [`evaluate`](Self::evaluate), without the stream.
    pub fn induced(&self, point: Vec2) -> Vec2 {
        let mut vel = Vec2::zero();
        for kind in ElementKind::ALL {
            for e in self.elements.slots(kind) {
                if !e.is_active() {
                    continue;
                }
                let offset = point - e.pos;
                let d = Vec2::new(offset.x * self.aspect, offset.y);
                vel += contribution(kind, d, e.strength);
            }
        }
        vel
    }
}
