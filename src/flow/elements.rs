use serde::Deserialize;

use crate::vec2::Vec2;

/// The three singular solutions that can be placed in the flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Source (q > 0) or sink (q < 0).
    Source,
    /// Point vortex with circulation q.
    Vortex,
    /// Doublet with moment m.
    Dipole,
}

impl ElementKind {
    pub const ALL: [ElementKind; 3] = [ElementKind::Source, ElementKind::Vortex, ElementKind::Dipole];

    /// Strength magnitude given to a freshly placed element.
    pub fn default_strength(self) -> f64 {
        match self {
            ElementKind::Source => 1.0,
            ElementKind::Vortex => 0.5,
            ElementKind::Dipole => 0.01,
        }
    }

    /// Magnitude change applied by one grow/shrink gesture.
    pub fn adjust_step(self) -> f64 {
        match self {
            ElementKind::Source => 0.5,
            ElementKind::Vortex => 0.1,
            ElementKind::Dipole => 0.001,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ElementKind::Source => "source",
            ElementKind::Vortex => "vortex",
            ElementKind::Dipole => "dipole",
        }
    }
}

/// One slot of the element pool. `strength == 0.0` marks a free slot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Element {
    pub pos: Vec2,
    pub strength: f64,
}

impl Element {
    pub fn is_active(&self) -> bool {
        self.strength != 0.0
    }
}

/// Fixed-capacity pools of sources, vortices and dipoles.
#[derive(Clone, Debug)]
pub struct ElementStore {
    sources: Vec<Element>,
    vortices: Vec<Element>,
    dipoles: Vec<Element>,
}

impl ElementStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            sources: vec![Element::default(); capacity],
            vortices: vec![Element::default(); capacity],
            dipoles: vec![Element::default(); capacity],
        }
    }

    /// All slots of one kind, free ones included.
    pub fn slots(&self, kind: ElementKind) -> &[Element] {
        match kind {
            ElementKind::Source => &self.sources,
            ElementKind::Vortex => &self.vortices,
            ElementKind::Dipole => &self.dipoles,
        }
    }

    fn slots_mut(&mut self, kind: ElementKind) -> &mut [Element] {
        match kind {
            ElementKind::Source => &mut self.sources,
            ElementKind::Vortex => &mut self.vortices,
            ElementKind::Dipole => &mut self.dipoles,
        }
    }

    /// Occupied slots of one kind with their slot index.
    pub fn active(&self, kind: ElementKind) -> impl Iterator<Item = (usize, &Element)> {
        self.slots(kind).iter().enumerate().filter(|(_, e)| e.is_active())
    }

    pub fn active_count(&self, kind: ElementKind) -> usize {
        self.active(kind).count()
    }

    /// Put an element into the first free slot of its kind.
    /// Returns the slot, or `None` when the pool is full or `strength` is zero.
    pub fn place(&mut self, kind: ElementKind, pos: Vec2, strength: f64) -> Option<usize> {
        if strength == 0.0 {
            return None;
        }
        let (slot, element) = self
            .slots_mut(kind)
            .iter_mut()
            .enumerate()
            .find(|(_, e)| !e.is_active())?;
        *element = Element { pos, strength };
        Some(slot)
    }

    /// Free every element (of any kind) within `radius` of `pos`.
    /// Returns how many slots were freed.
    pub fn remove_near(&mut self, pos: Vec2, radius: f64) -> usize {
        let mut removed = 0;
        for kind in ElementKind::ALL {
            for e in self.slots_mut(kind).iter_mut() {
                if e.is_active() && (e.pos - pos).length() < radius {
                    e.strength = 0.0;
                    removed += 1;
                }
            }
        }
        removed
    }

    /// Grow or shrink the strength magnitude of every element within `radius`
    /// of `pos` by its kind's step. The sign is kept; shrinking to zero frees
    /// the slot instead of flipping the sign. Returns how many were touched.
    pub fn adjust_near(&mut self, pos: Vec2, radius: f64, grow: bool) -> usize {
        let mut touched = 0;
        for kind in ElementKind::ALL {
            let step = kind.adjust_step();
            for e in self.slots_mut(kind).iter_mut() {
                if !e.is_active() || (e.pos - pos).length() >= radius {
                    continue;
                }
                let magnitude = e.strength.abs();
                let next = if grow { magnitude + step } else { magnitude - step };
                // float steps rarely land on exactly zero
                e.strength = if next <= step * 1e-6 {
                    0.0
                } else {
                    next.copysign(e.strength)
                };
                touched += 1;
            }
        }
        touched
    }

    #[cfg(test)]
    pub fn clear(&mut self) {
        for kind in ElementKind::ALL {
            self.slots_mut(kind).fill(Element::default());
        }
    }
}
