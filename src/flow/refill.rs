use super::boundary::{BoundaryVelocityCache, Side};
use super::particles::{is_sentinel, ParticleSystem};

/// Position of the shared boundary scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundaryCursor {
    pub side: Side,
    pub index: usize,
}

impl BoundaryCursor {
    pub const fn new(side: Side, index: usize) -> Self {
        Self { side, index }
    }

    /// One step of the traversal. Bottom and top alternate at the same column
    /// before the column advances; after the last column the right edge is
    /// swept by row, then the left edge, then back to bottom/top.
    pub fn advance(&mut self, width: usize, height: usize) {
        match self.side {
            Side::Left => {
                self.index += 1;
                if self.index >= height {
                    *self = Self::new(Side::Bottom, 0);
                }
            }
            Side::Right => {
                self.index += 1;
                if self.index >= height {
                    *self = Self::new(Side::Left, 0);
                }
            }
            Side::Bottom => self.side = Side::Top,
            Side::Top => {
                self.index += 1;
                self.side = Side::Bottom;
                if self.index >= width {
                    *self = Self::new(Side::Right, 0);
                }
            }
        }
    }
}

/// What one refill pass achieved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefillOutcome {
    pub placed: usize,
    /// The cursor came back to the previous pass's start before every empty
    /// slot was served.
    pub lap_completed: bool,
}

/// Decides where inactive tracers re-enter the domain.
///
/// The cursor persists across passes so successive passes spread new
/// particles around the whole boundary. `last_start` bounds one pass to at
/// most one lap. Must run single-threaded: the order of the scan is the
/// reseeding order.
#[derive(Clone, Debug)]
pub struct RefillScheduler {
    width: usize,
    height: usize,
    cursor: BoundaryCursor,
    last_start: BoundaryCursor,
}

impl RefillScheduler {
    pub fn new(width: usize, height: usize) -> Self {
        let origin = BoundaryCursor::new(Side::Left, 0);
        Self {
            width,
            height,
            cursor: origin,
            last_start: origin,
        }
    }

    pub fn cursor(&self) -> BoundaryCursor {
        self.cursor
    }

    #[cfg(test)]
    pub fn last_start(&self) -> BoundaryCursor {
        self.last_start
    }

    pub fn advance(&mut self) {
        self.cursor.advance(self.width, self.height);
    }

    /// Number of distinct cursor states in one lap.
    #[cfg(test)]
    pub fn lap_len(&self) -> usize {
        2 * self.width + 2 * self.height
    }

    /// Reseed sentinel particles at boundary cells whose inflow exceeds
    /// `threshold`, scanning from the current cursor.
    pub fn refill(
        &mut self,
        cache: &BoundaryVelocityCache,
        threshold: f64,
        particles: &mut ParticleSystem,
    ) -> RefillOutcome {
        let mut outcome = RefillOutcome::default();
        // the first advance of a pass is skipped so the cursor cell itself is tested
        let mut started = false;

        'slots: for pos in particles.positions_mut().iter_mut() {
            if !is_sentinel(*pos) {
                continue;
            }
            while self.cursor != self.last_start {
                if started {
                    self.advance();
                } else {
                    started = true;
                }
                let BoundaryCursor { side, index } = self.cursor;
                if cache.inflow(side, index) > threshold {
                    *pos = cache.point(side, index);
                    outcome.placed += 1;
                    continue 'slots;
                }
            }
            outcome.lap_completed = true;
            break;
        }

        self.last_start = self.cursor;
        self.advance();
        outcome
    }
}
