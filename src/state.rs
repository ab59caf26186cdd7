use serde::Deserialize;

use crate::arrows::{ArrowField, ArrowSample};
use crate::flow::{
    AbsorptionRadii, BoundaryVelocityCache, Element, ElementKind, ElementStore, FlowParams,
    ParticleSystem, RefillOutcome, RefillScheduler, VelocityField,
};
use crate::input::Action;
use crate::vec2::Vec2;

/// One element of the start-up scene.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct SceneElement {
    pub kind: ElementKind,
    pub x: f64,
    pub y: f64,
    pub strength: f64,
}

impl SceneElement {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Dipole and counter-rotating vortex sharing the domain centre.
pub fn default_scene() -> Vec<SceneElement> {
    vec![
        SceneElement { kind: ElementKind::Dipole, x: 0.5, y: 0.5, strength: 0.01 },
        SceneElement { kind: ElementKind::Vortex, x: 0.5, y: 0.5, strength: -0.5 },
    ]
}

/// Everything the physics thread owns and mutates.
pub struct SimState {
    pub params: FlowParams,
    pub elements: ElementStore,
    pub particles: ParticleSystem,
    pub boundary: BoundaryVelocityCache,
    pub scheduler: RefillScheduler,
    pub arrows: ArrowField,
    pub tick: u64,
    /// Ticks since the last boundary rebuild + refill.
    since_refill: u64,
}

impl SimState {
    /// Build the scene, then prime the arrows and run the start-up refill pass.
    pub fn new(
        params: FlowParams,
        scene: &[SceneElement],
        seed_grid: bool,
        arrow_cols: usize,
        arrow_rows: usize,
    ) -> Self {
        let mut elements = ElementStore::new(params.max_items);
        for e in scene {
            if elements.place(e.kind, e.pos(), e.strength).is_none() {
                log::warn!("scene {} at ({}, {}) dropped: no free slot", e.kind.label(), e.x, e.y);
            }
        }
        let mut particles = ParticleSystem::new(params.particle_count());
        if seed_grid {
            particles.seed_grid(params.width, params.height);
        }

        let mut sim = Self {
            boundary: BoundaryVelocityCache::new(params.width, params.height),
            scheduler: RefillScheduler::new(params.width, params.height),
            arrows: ArrowField::new(arrow_cols, arrow_rows),
            params,
            elements,
            particles,
            tick: 0,
            since_refill: 0,
        };
        let field = VelocityField::new(&sim.elements, &sim.params);
        sim.arrows.resample(&field);
        sim.refill_pass();
        sim
    }

    pub fn radii(&self) -> AbsorptionRadii {
        AbsorptionRadii {
            sink: self.params.sink_radius,
            dipole: self.params.dipole_radius,
        }
    }

    /// Apply one user edit. Returns false when it changed nothing.
    pub fn apply(&mut self, action: &Action) -> bool {
        let changed = match *action {
            Action::Remove { at, radius } => {
                let n = self.elements.remove_near(at, radius);
                log::debug!("removed {n} element(s) near ({:.3}, {:.3})", at.x, at.y);
                n > 0
            }
            Action::Place { kind, at, strength } => match self.elements.place(kind, at, strength) {
                Some(slot) => {
                    log::debug!("placed {} #{slot} q={strength} at ({:.3}, {:.3})", kind.label(), at.x, at.y);
                    true
                }
                None => {
                    log::debug!("{} pool full, placement ignored", kind.label());
                    false
                }
            },
            Action::Adjust { at, radius, grow } => {
                let n = self.elements.adjust_near(at, radius, grow);
                log::debug!(
                    "{} {n} element(s) near ({:.3}, {:.3})",
                    if grow { "grew" } else { "shrank" },
                    at.x,
                    at.y
                );
                n > 0
            }
        };
        if changed {
            self.arrows.restart_fade();
        }
        changed
    }

    /// Rebuild the boundary cache from the current elements and reseed.
    pub fn refill_pass(&mut self) -> RefillOutcome {
        let field = VelocityField::new(&self.elements, &self.params);
        self.boundary.rebuild(&field);
        let outcome = self.scheduler.refill(&self.boundary, self.params.refill_threshold, &mut self.particles);
        log::debug!(
            "tick {}: refill placed {} (lap {}), cursor {:?}",
            self.tick,
            outcome.placed,
            outcome.lap_completed,
            self.scheduler.cursor()
        );
        outcome
    }

    /// One simulation tick: arrows, particles, then the refill cadence.
    pub fn step(&mut self) -> Option<RefillOutcome> {
        let radii = self.radii();
        let field = VelocityField::new(&self.elements, &self.params);
        self.arrows.advance(&field);
        self.particles.tick(&field, self.params.dt, radii);

        self.since_refill += 1;
        let outcome = if self.since_refill >= self.params.refill_interval {
            self.since_refill = 0;
            Some(self.refill_pass())
        } else {
            None
        };
        self.tick += 1;
        outcome
    }

    /// Copy current state into an existing FrameSnapshot, reusing its Vec allocations.
    pub fn snapshot_into(&self, dst: &mut FrameSnapshot) {
        dst.tick = self.tick;
        dst.dt = self.params.dt;
        dst.particles.clear();
        dst.particles.extend_from_slice(self.particles.positions());
        dst.live_particles = self.particles.live_count();

        dst.sources.clear();
        dst.sources.extend(self.elements.active(ElementKind::Source).map(|(_, e)| *e));
        dst.vortices.clear();
        dst.vortices.extend(self.elements.active(ElementKind::Vortex).map(|(_, e)| *e));
        dst.dipoles.clear();
        dst.dipoles.extend(self.elements.active(ElementKind::Dipole).map(|(_, e)| *e));

        dst.arrows.clear();
        dst.arrow_levels.clear();
        for s in self.arrows.samples() {
            dst.arrows.push(*s);
            dst.arrow_levels.push(self.arrows.brightness(s));
        }
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> FrameSnapshot {
        let mut snap = FrameSnapshot::new_empty(self.particles.len());
        self.snapshot_into(&mut snap);
        snap
    }
}

/// Read-only copy of what the renderer needs for one frame.
#[derive(Clone, Debug, Default)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub dt: f64,
    /// Every slot, sentinels included.
    pub particles: Vec<Vec2>,
    pub live_particles: usize,
    pub sources: Vec<Element>,
    pub vortices: Vec<Element>,
    pub dipoles: Vec<Element>,
    pub arrows: Vec<ArrowSample>,
    /// Grey level per arrow, already scaled by the fade.
    pub arrow_levels: Vec<u8>,
}

impl FrameSnapshot {
    pub fn new_empty(particle_count: usize) -> Self {
        Self {
            particles: Vec::with_capacity(particle_count),
            ..Self::default()
        }
    }
}
