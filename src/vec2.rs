use std::ops::{Add, AddAssign, Mul, Sub};

/// Point or vector in the unit domain.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn length_sq(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f64 {
        self.length_sq().sqrt()
    }

    #[cfg(test)]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// True when both coordinates lie in `[0, 1]`. NaN is never inside.
    pub fn in_unit_square(self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_unit_square_edges() {
        assert!(Vec2::new(0.0, 0.0).in_unit_square());
        assert!(Vec2::new(1.0, 1.0).in_unit_square());
        assert!(!Vec2::new(-0.001, 0.5).in_unit_square());
        assert!(!Vec2::new(0.5, 1.001).in_unit_square());
    }

    #[test]
    fn test_nan_is_outside() {
        assert!(!Vec2::new(f64::NAN, 0.5).in_unit_square());
        assert!(!Vec2::new(0.5, f64::NAN).is_finite());
    }

    #[test]
    fn test_length() {
        assert!((Vec2::new(3.0, 4.0).length() - 5.0).abs() < 1e-12);
    }
}
