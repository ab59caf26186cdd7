use crate::vec2::Vec2;

/// Numerical parameters shared by every stage of a flow tick.
/// Read-only once the simulation is built.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowParams {
    /// Boundary sample resolution along x (bottom/top extent).
    pub width: usize,
    /// Boundary sample resolution along y (left/right extent).
    pub height: usize,
    /// Background velocity added everywhere.
    pub uniform: Vec2,
    pub dt: f64,
    /// Slot capacity per element kind.
    pub max_items: usize,
    /// Ticks between boundary rebuild + refill passes: a pass runs on every
    /// `refill_interval`-th tick, so the default 20 gives a 20-tick period.
    pub refill_interval: u64,
    /// Minimum inward-normal speed for a boundary cell to accept a particle.
    pub refill_threshold: f64,
    pub sink_radius: f64,
    pub dipole_radius: f64,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            width: 30,
            height: 20,
            uniform: Vec2::new(1.0, 0.0),
            dt: 0.002,
            max_items: 20,
            refill_interval: 20,
            refill_threshold: 0.1,
            sink_radius: 0.025,
            dipole_radius: 0.05,
        }
    }
}

impl FlowParams {
    /// Height-to-width ratio applied to horizontal offsets so the flow
    /// pattern stays round on a non-square domain.
    pub fn aspect(&self) -> f64 {
        self.height as f64 / self.width as f64
    }

    /// Two tracer slots per domain cell.
    pub fn particle_count(&self) -> usize {
        2 * self.width * self.height
    }
}
