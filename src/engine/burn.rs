use crate::engine::preset::BurnPreset;
use crate::foundation::core::{Rect, Region, Viewport};
use crate::foundation::error::{BurnError, BurnResult};
use crate::foundation::math::{finite_or_zero, mix64};
use crate::front::controller::BurnFrontController;
use crate::heat::buffer::HeatBuffer;
use crate::heat::simulator::{HeatFieldSimulator, HeatInputs};
use crate::noise::field::NoiseField;
use crate::particles::profile::RateMultipliers;
use crate::particles::rng::Rng64;
use crate::particles::system::{ParticleDraw, ParticleStats, ParticleSystem, SpawnContext};
use crate::timeline::intensity::IntensityCurve;
use crate::timeline::phase::{PhasePosition, PhaseTimeline};

/// Slack applied when comparing accumulated time with the run length, so that summing
/// `1/60` for 360 ticks still lands on the terminal phase.
pub const COMPLETION_EPSILON: f64 = 1e-9;

/// Host-side hooks for phase boundaries and completion.
///
/// Hooks run inside [`BurnEngine::tick`] and never see the engine itself.
pub trait BurnObserver: Send {
    /// Called once per run for every phase, in order, including phases a large step skipped.
    fn on_phase_enter(&mut self, _index: usize, _name: &str) {}

    /// Called once per run when elapsed time reaches the end of the timeline.
    fn on_complete(&mut self) {}
}

/// Read-only view of the engine after a tick.
#[derive(Clone, Copy, Debug)]
pub struct EngineSnapshot<'a> {
    /// Heat grid and its RGBA bytes at grid resolution.
    pub heat: &'a HeatBuffer,
    /// Viewport pixel rectangle the heat grid should be stretched over.
    pub heat_rect: Rect,
    /// Particle draw commands, back to front.
    pub particles: &'a [ParticleDraw],
    pub phase: &'a str,
    pub phase_index: usize,
    pub local_progress: f64,
    /// Progress through the whole run, `[0, 1]`.
    pub progress: f64,
    pub elapsed: f64,
    /// Burn-front position in region heights.
    pub front: f64,
    pub complete: bool,
}

/// Drives one burn: timeline, front, heat field and particles, advanced by `tick(dt)`.
pub struct BurnEngine<R = Rng64> {
    preset: BurnPreset,
    timeline: PhaseTimeline,
    intensity: IntensityCurve,
    rates: Vec<RateMultipliers>,
    front: BurnFrontController,
    heat: HeatFieldSimulator,
    particles: ParticleSystem<R>,
    elapsed: f64,
    position: PhasePosition,
    // Number of phases whose enter hook has fired this run.
    entered: usize,
    complete: bool,
    observer: Option<Box<dyn BurnObserver>>,
}

impl<R> std::fmt::Debug for BurnEngine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BurnEngine")
            .field("preset", &self.preset.name)
            .field("elapsed", &self.elapsed)
            .field("position", &self.position)
            .field("front", &self.front.position())
            .field("particles", &self.particles.len())
            .field("complete", &self.complete)
            .field("observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl BurnEngine {
    /// Build an engine with the default particle RNG seeded from `preset.seed`.
    pub fn new(preset: BurnPreset, region: Region, viewport: Viewport) -> BurnResult<Self> {
        let rng = Rng64::new(mix64(preset.seed ^ 0xA5A5_5A5A_0F0F_F0F0));
        Self::with_rng(preset, region, viewport, rng)
    }
}

impl<R: rand::RngCore> BurnEngine<R> {
    /// Build an engine that draws particle randomness from `rng`.
    #[tracing::instrument(
        skip(preset, rng),
        fields(preset = %preset.name, phases = preset.phases.len()),
        err
    )]
    pub fn with_rng(
        preset: BurnPreset,
        region: Region,
        viewport: Viewport,
        rng: R,
    ) -> BurnResult<Self> {
        preset.validate()?;
        region.validate()?;
        if viewport.width == 0 || viewport.height == 0 {
            return Err(BurnError::config(format!(
                "viewport must be non-empty, got {}x{}",
                viewport.width, viewport.height
            )));
        }
        let region_px = region.to_pixel_rect(viewport);

        let timeline = preset.timeline()?;
        let intensity = preset.intensity_curve()?;
        let front = preset.front_controller()?;
        let heat = HeatFieldSimulator::new(
            preset.heat,
            preset.color_ramp()?,
            NoiseField::new(preset.seed),
            preset.front.direction,
            region_px,
        )?;
        let particles = ParticleSystem::new(
            preset.particles,
            preset.max_particles,
            preset.cull_margin,
            region_px,
            viewport,
            rng,
        )?;
        let position = timeline.resolve(0.0);

        tracing::debug!(
            total_secs = timeline.total_duration(),
            grid_w = heat.buffer().width(),
            grid_h = heat.buffer().height(),
            "burn engine ready"
        );

        Ok(Self {
            rates: preset.rate_table(),
            preset,
            timeline,
            intensity,
            front,
            heat,
            particles,
            elapsed: 0.0,
            position,
            entered: 0,
            complete: false,
            observer: None,
        })
    }

    /// Install the hook that receives phase and completion notifications.
    pub fn set_observer(&mut self, observer: impl BurnObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Advance the simulation by `dt` seconds, clamped to `[0, max_dt]`.
    ///
    /// Once the run is complete the heat field is frozen and no particles spawn; live
    /// particles keep moving until they expire.
    pub fn tick(&mut self, dt: f64) -> EngineSnapshot<'_> {
        let dt = finite_or_zero(dt).clamp(0.0, self.preset.max_dt);

        if self.complete {
            self.particles.step(dt, None);
            return self.snapshot();
        }

        let total = self.timeline.total_duration();
        self.elapsed += dt;
        if self.elapsed + COMPLETION_EPSILON >= total {
            self.elapsed = total;
        }
        self.position = self.timeline.resolve(self.elapsed);
        let idx = self.position.index;
        self.enter_phases_through(idx);

        let front = self.front.advance(dt, idx);
        let intensity = self.intensity.at(self.position);
        self.heat.step(HeatInputs {
            t: self.elapsed,
            front,
            intensity,
        });

        let rates = self.rates[idx.min(self.rates.len() - 1)];
        self.particles.step(
            dt,
            Some(SpawnContext {
                front,
                direction: self.front.direction(),
                rates,
            }),
        );

        if self.elapsed >= total {
            self.complete = true;
            tracing::info!(
                preset = %self.preset.name,
                elapsed = self.elapsed,
                spawned = self.particles.stats().spawned,
                "burn complete"
            );
            if let Some(obs) = self.observer.as_mut() {
                obs.on_complete();
            }
        }

        tracing::trace!(
            elapsed = self.elapsed,
            phase = idx,
            front,
            intensity,
            particles = self.particles.len(),
            "tick"
        );
        self.snapshot()
    }

    fn enter_phases_through(&mut self, index: usize) {
        while self.entered <= index {
            let i = self.entered;
            self.entered += 1;
            let name = self
                .timeline
                .phase(i)
                .map(|p| p.name.as_str())
                .unwrap_or_default();
            tracing::debug!(index = i, phase = name, elapsed = self.elapsed, "phase entered");
            if let Some(obs) = self.observer.as_mut() {
                obs.on_phase_enter(i, name);
            }
        }
    }

    /// The current state without advancing time.
    pub fn snapshot(&self) -> EngineSnapshot<'_> {
        let phase = self
            .timeline
            .phase(self.position.index)
            .map(|p| p.name.as_str())
            .unwrap_or_default();
        EngineSnapshot {
            heat: self.heat.buffer(),
            heat_rect: self.heat.region_px(),
            particles: self.particles.draws(),
            phase,
            phase_index: self.position.index,
            local_progress: self.position.local_progress,
            progress: self.position.global_progress,
            elapsed: self.elapsed,
            front: self.front.position(),
            complete: self.complete,
        }
    }

    /// Rewind to the start of a fresh run. Notifications fire again; the particle RNG
    /// stream is not reseeded.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.position = self.timeline.resolve(0.0);
        self.entered = 0;
        self.complete = false;
        self.front.reset();
        self.heat.reset();
        self.particles.clear();
        tracing::debug!(preset = %self.preset.name, "burn engine reset");
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn preset_name(&self) -> &str {
        &self.preset.name
    }

    pub fn preset(&self) -> &BurnPreset {
        &self.preset
    }

    pub fn total_duration(&self) -> f64 {
        self.timeline.total_duration()
    }

    pub fn particle_stats(&self) -> ParticleStats {
        self.particles.stats()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/burn.rs"]
mod tests;
