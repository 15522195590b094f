//! burnfx is a procedural burn and fire effects engine.
//!
//! One [`BurnEngine`] owns a scalar heat field driven by layered value noise and curl
//! advection, an ember/ash/smoke particle system, and a time-driven phase timeline that
//! paces both. Variants of the effect are [`BurnPreset`] values, not new code paths.
//!
//! # Per-tick pipeline
//!
//! 1. **Clock**: `tick(dt)` clamps `dt` to `[0, max_dt]` and accumulates elapsed time.
//! 2. **Timeline**: elapsed time resolves to a phase, its local progress and a stage intensity.
//! 3. **Front**: the burn line advances at the phase's speed, never past its stop limit.
//! 4. **Heat**: every grid cell is recomputed and colored through the [`ColorRamp`].
//! 5. **Particles**: live particles integrate and cull, new ones spawn along the front.
//!
//! The engine never renders. Hosts read an [`EngineSnapshot`] (heat bytes plus particle
//! draw commands) and draw it however they like.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: a preset seed pins the noise field and the particle stream.
//! - **Fails only at construction**: a running engine clamps instead of erroring.
#![forbid(unsafe_code)]

mod color;
mod engine;
mod foundation;
mod front;
mod heat;
mod noise;
mod particles;
mod timeline;

pub use color::ramp::{ColorRamp, RampStop};
pub use engine::burn::{BurnEngine, BurnObserver, COMPLETION_EPSILON, EngineSnapshot};
pub use engine::preset::{BurnPreset, MAX_PARTICLES, PhaseSpec};
pub use foundation::core::{Rect, Region, Rgba8, Vec2, Viewport};
pub use foundation::error::{BurnError, BurnResult};
pub use front::controller::{BurnFrontController, FrontConfig, FrontDirection};
pub use heat::buffer::HeatBuffer;
pub use heat::simulator::{HeatFieldSimulator, HeatInputs, HeatParams, MAX_GRID_DIM, MAX_OCTAVES};
pub use noise::field::{FBM_GAIN, FBM_LACUNARITY, NoiseField, hash2d};
pub use particles::profile::{
    BlendMode, ParticleKind, ParticleProfile, ParticleProfiles, RateMultipliers, Span,
};
pub use particles::rng::Rng64;
pub use particles::system::{
    ASH_SINK_AGE, Particle, ParticleDraw, ParticleStats, ParticleSystem, SpawnContext,
};
pub use timeline::ease::Ease;
pub use timeline::intensity::{IntensityCurve, IntensityEnvelope, MAX_STAGE_INTENSITY};
pub use timeline::phase::{Phase, PhasePosition, PhaseTimeline};
