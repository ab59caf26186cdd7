use super::field::VelocityField;
use crate::vec2::Vec2;

/// Domain edge, numbered in the order the refill cursor uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left = 0,
    Bottom = 1,
    Right = 2,
    Top = 3,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Bottom, Side::Right, Side::Top];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Left/right run along y, bottom/top along x.
    pub fn is_vertical(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

/// Midpoint of boundary cell `index` on `side` in unit-domain coordinates.
pub fn boundary_point(side: Side, index: usize, width: usize, height: usize) -> Vec2 {
    match side {
        Side::Left => Vec2::new(0.0, (index as f64 + 0.5) / height as f64),
        Side::Bottom => Vec2::new((index as f64 + 0.5) / width as f64, 0.0),
        Side::Right => Vec2::new(1.0, (index as f64 + 0.5) / height as f64),
        Side::Top => Vec2::new((index as f64 + 0.5) / width as f64, 1.0),
    }
}

/// Velocity sampled at every boundary cell midpoint.
/// Stale between element edits and the next [`rebuild`](Self::rebuild).
#[derive(Clone, Debug)]
pub struct BoundaryVelocityCache {
    width: usize,
    height: usize,
    samples: [Vec<Vec2>; 4],
}

impl BoundaryVelocityCache {
    pub fn new(width: usize, height: usize) -> Self {
        let samples = Side::ALL.map(|side| {
            let extent = if side.is_vertical() { height } else { width };
            vec![Vec2::zero(); extent]
        });
        Self { width, height, samples }
    }

    #[cfg(test)]
    pub fn extent(&self, side: Side) -> usize {
        self.samples[side.index()].len()
    }

    pub fn point(&self, side: Side, index: usize) -> Vec2 {
        boundary_point(side, index, self.width, self.height)
    }

    /// Re-evaluate the field at every sample. Same elements, same result.
    /// A few dozen samples per side, so this stays serial.
    pub fn rebuild(&mut self, field: &VelocityField) {
        let (width, height) = (self.width, self.height);
        for side in Side::ALL {
            for (j, s) in self.samples[side.index()].iter_mut().enumerate() {
                *s = field.evaluate(boundary_point(side, j, width, height));
            }
        }
    }

    pub fn velocity(&self, side: Side, index: usize) -> Vec2 {
        self.samples[side.index()][index]
    }

    /// Signed velocity component pointing into the domain.
    pub fn inflow(&self, side: Side, index: usize) -> f64 {
        let v = self.velocity(side, index);
        match side {
            Side::Left => v.x,
            Side::Bottom => v.y,
            Side::Right => -v.x,
            Side::Top => -v.y,
        }
    }
}
