use std::f64::consts::TAU;

use crate::foundation::core::{Rect, Rgba8, Vec2, Viewport};
use crate::foundation::error::{BurnError, BurnResult};
use crate::foundation::math::{clamp01, finite_or_zero, lerp_u8, ratio_or};
use crate::front::controller::FrontDirection;
use crate::particles::profile::{
    BlendMode, ParticleKind, ParticleProfile, ParticleProfiles, RateMultipliers,
};
use crate::particles::rng::{Rng64, uniform};

use kurbo::Point;

/// Normalized age after which ash starts to sink.
pub const ASH_SINK_AGE: f64 = 0.65;
/// Angular frequency of the smoke wander, radians per second.
const SMOKE_WANDER_RATE: f64 = 2.3;

/// A live particle. Positions and velocities are in viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub position: Point,
    pub velocity: Vec2,
    pub age: f64,
    pub life: f64,
    /// Current radius.
    pub size: f64,
    pub base_size: f64,
    pub rotation: f64,
    pub spin: f64,
    /// Brightness multiplier around `1`.
    pub luminance: f64,
    /// Phase offset of the horizontal wander.
    pub wobble: f64,
    pub opacity: f64,
}

impl Particle {
    /// `age / life` in `[0, 1]`.
    pub fn normalized_age(&self) -> f64 {
        clamp01(ratio_or(self.age, self.life, 1.0))
    }
}

/// One draw command for the host renderer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ParticleDraw {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub rotation: f64,
    pub rgba: Rgba8,
    pub blend: BlendMode,
    pub kind: ParticleKind,
}

/// Where and how fast to spawn this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnContext {
    /// Burn-front position in region heights.
    pub front: f64,
    pub direction: FrontDirection,
    pub rates: RateMultipliers,
}

/// Running counters, mostly for logs and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ParticleStats {
    pub live: usize,
    pub spawned: u64,
    pub expired: u64,
    pub escaped: u64,
}

/// Owns every particle; spawns, integrates and culls them.
///
/// The RNG is injected so tests and replays can pin the exact spawn stream.
#[derive(Clone, Debug)]
pub struct ParticleSystem<R = Rng64> {
    profiles: ParticleProfiles,
    max_particles: usize,
    region_px: Rect,
    bounds: Rect,
    particles: Vec<Particle>,
    draws: Vec<ParticleDraw>,
    stats: ParticleStats,
    rng: R,
}

impl<R> ParticleSystem<R> {
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Draw commands ordered back to front (smoke, ash, embers).
    pub fn draws(&self) -> &[ParticleDraw] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn stats(&self) -> ParticleStats {
        ParticleStats {
            live: self.particles.len(),
            ..self.stats
        }
    }

    pub fn count_of(&self, kind: ParticleKind) -> usize {
        self.particles.iter().filter(|p| p.kind == kind).count()
    }
}

impl<R: rand::RngCore> ParticleSystem<R> {
    /// `cull_margin` is the fraction of the viewport a particle may drift outside before it
    /// is dropped.
    pub fn new(
        profiles: ParticleProfiles,
        max_particles: usize,
        cull_margin: f64,
        region_px: Rect,
        viewport: Viewport,
        rng: R,
    ) -> BurnResult<Self> {
        profiles.validate()?;
        if !cull_margin.is_finite() || cull_margin < 0.0 {
            return Err(BurnError::config("particle cull_margin must be finite and >= 0"));
        }
        if !(region_px.width() > 0.0 && region_px.height() > 0.0) {
            return Err(BurnError::config("particle region must have a positive pixel size"));
        }
        let vp = viewport.rect();
        let bounds = vp.inflate(vp.width() * cull_margin, vp.height() * cull_margin);
        Ok(Self {
            profiles,
            max_particles,
            region_px,
            bounds,
            particles: Vec::with_capacity(max_particles.min(4096)),
            draws: Vec::with_capacity(max_particles.min(4096)),
            stats: ParticleStats::default(),
            rng,
        })
    }

    /// Integrate, cull, optionally spawn, and rebuild the draw list.
    pub fn step(&mut self, dt: f64, spawn: Option<SpawnContext>) {
        let dt = finite_or_zero(dt).max(0.0);
        self.update(dt);
        if let Some(ctx) = spawn {
            self.spawn(dt, ctx);
        }
        self.rebuild_draws();
    }

    /// Age and move every particle, then drop the expired and escaped ones.
    pub fn update(&mut self, dt: f64) {
        let dt = finite_or_zero(dt).max(0.0);
        let h = self.region_px.height();
        for p in &mut self.particles {
            let prof = self.profiles.get(p.kind);
            integrate(p, prof, dt, h);
        }

        let mut i = 0;
        while i < self.particles.len() {
            let p = &self.particles[i];
            if p.age >= p.life {
                self.stats.expired += 1;
                self.particles.swap_remove(i);
            } else if !self.bounds.contains(p.position) {
                self.stats.escaped += 1;
                self.particles.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Spawn `rate * dt * multiplier` particles per family. The fractional part spawns one
    /// extra particle with matching probability so low rates stay unbiased.
    pub fn spawn(&mut self, dt: f64, ctx: SpawnContext) {
        let dt = finite_or_zero(dt).max(0.0);
        for kind in ParticleKind::ALL {
            let prof = *self.profiles.get(kind);
            let count = prof.rate * dt * ctx.rates.get(kind);
            if !count.is_finite() || count <= 0.0 {
                continue;
            }
            let whole = count.floor();
            let frac = count - whole;
            let room = self.max_particles.saturating_sub(self.particles.len());
            let mut n = (whole.min(room as f64)) as usize;
            if frac > 0.0 && uniform(&mut self.rng, 0.0, 1.0) < frac {
                n += 1;
            }
            for _ in 0..n.min(room) {
                let p = self.make_particle(kind, &prof, ctx);
                self.particles.push(p);
                self.stats.spawned += 1;
            }
        }
    }

    fn make_particle(
        &mut self,
        kind: ParticleKind,
        prof: &ParticleProfile,
        ctx: SpawnContext,
    ) -> Particle {
        let r = self.region_px;
        let h = r.height();
        let rng = &mut self.rng;

        let across = uniform(rng, 0.0, 1.0);
        let front = clamp01(finite_or_zero(ctx.front));
        let behind = -ctx.direction.sign();
        let jitter = uniform(rng, -prof.spawn_jitter, prof.spawn_jitter);
        let position = Point::new(
            r.x0 + across * r.width(),
            r.y0 + (front + behind * prof.spawn_offset + jitter) * h,
        );
        let velocity = Vec2::new(prof.velocity_x.sample(rng) * h, prof.velocity_y.sample(rng) * h);
        let base_size = prof.size.sample(rng) * h;

        Particle {
            kind,
            position,
            velocity,
            age: 0.0,
            life: prof.lifetime.sample(rng),
            size: base_size,
            base_size,
            rotation: uniform(rng, 0.0, TAU),
            spin: prof.spin.sample(rng),
            luminance: 1.0 + uniform(rng, -prof.luminance_jitter, prof.luminance_jitter),
            wobble: uniform(rng, 0.0, TAU),
            opacity: 1.0,
        }
    }

    fn rebuild_draws(&mut self) {
        self.draws.clear();
        for layer in 0..3u8 {
            for p in self.particles.iter().filter(|p| p.kind.layer() == layer) {
                let prof = self.profiles.get(p.kind);
                self.draws.push(ParticleDraw {
                    x: p.position.x,
                    y: p.position.y,
                    size: p.size,
                    rotation: p.rotation,
                    rgba: particle_color(p, prof),
                    blend: prof.blend,
                    kind: p.kind,
                });
            }
        }
    }

    /// Drop every particle and reset counters. The RNG stream continues.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.draws.clear();
        self.stats = ParticleStats::default();
    }
}

fn integrate(p: &mut Particle, prof: &ParticleProfile, dt: f64, h: f64) {
    p.age += dt;
    let a = p.normalized_age();

    let mut acc = Vec2::ZERO;
    if p.age > prof.burst_secs {
        acc.y += prof.gravity * h;
    }
    if a > ASH_SINK_AGE {
        acc.y += prof.late_drift * h;
    }
    acc.x += prof.drift * h * (p.age * SMOKE_WANDER_RATE + p.wobble).sin();

    p.velocity += acc * dt;
    p.velocity *= (-prof.drag * dt).exp();
    p.position += p.velocity * dt;
    p.rotation = (p.rotation + p.spin * dt) % TAU;
    p.size = p.base_size * (1.0 + prof.growth * a);
    p.opacity = p.kind.fade(a);
}

fn particle_color(p: &Particle, prof: &ParticleProfile) -> Rgba8 {
    let a = p.normalized_age();
    let base = match p.kind {
        // Hot while fresh, cooling toward the warm color.
        ParticleKind::Ember => mix(prof.color_a, prof.color_b, 1.0 - a),
        ParticleKind::Ash => prof.color_a,
        // Dark when young, lighter as it thins out.
        ParticleKind::Smoke => mix(prof.color_a, prof.color_b, a),
    };
    let lum = |c: u8| (f64::from(c) * p.luminance).round().clamp(0.0, 255.0) as u8;
    Rgba8 {
        r: lum(base.r),
        g: lum(base.g),
        b: lum(base.b),
        a: base.a,
    }
    .with_opacity(p.opacity * prof.max_opacity)
}

fn mix(a: Rgba8, b: Rgba8, t: f64) -> Rgba8 {
    Rgba8 {
        r: lerp_u8(a.r, b.r, t),
        g: lerp_u8(a.g, b.g, t),
        b: lerp_u8(a.b, b.b, t),
        a: lerp_u8(a.a, b.a, t),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/system.rs"]
mod tests;
