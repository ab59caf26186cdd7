mod boundary;
mod elements;
mod field;
mod params;
mod particles;
mod refill;

// Re-export public API
pub use boundary::BoundaryVelocityCache;
pub use elements::{Element, ElementKind, ElementStore};
pub use field::VelocityField;
pub use params::FlowParams;
pub use particles::{AbsorptionRadii, ParticleSystem};
pub use refill::{RefillOutcome, RefillScheduler};

#[cfg(test)]
pub use boundary::Side;
#[cfg(test)]
pub use particles::{is_sentinel, SENTINEL};
