use crate::foundation::core::Rgba8;
use crate::foundation::error::{BurnError, BurnResult};
use crate::particles::rng::uniform;

/// The three particle families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    Ember,
    Ash,
    Smoke,
}

impl ParticleKind {
    pub const ALL: [Self; 3] = [Self::Ember, Self::Ash, Self::Smoke];

    /// Back-to-front draw layer.
    pub fn layer(self) -> u8 {
        match self {
            Self::Smoke => 0,
            Self::Ash => 1,
            Self::Ember => 2,
        }
    }

    /// Opacity as a function of normalized age `a = age / life`.
    pub fn fade(self, a: f64) -> f64 {
        let a = crate::foundation::math::clamp01(a);
        match self {
            Self::Ember | Self::Ash => 1.0 - a,
            Self::Smoke => (1.0 - a) * (1.0 - a),
        }
    }
}

/// How a renderer should composite a particle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Normal,
    Additive,
}

/// Closed range `[min, max]` sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub const fn fixed(v: f64) -> Self {
        Self::new(v, v)
    }

    pub fn sample<R: rand::RngCore + ?Sized>(&self, rng: &mut R) -> f64 {
        uniform(rng, self.min, self.max)
    }

    fn validate(&self, what: &str) -> BurnResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(BurnError::config(format!(
                "{what} span must be finite with min <= max, got [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Physics, look and spawn behaviour of one particle family.
///
/// Velocities and accelerations are in region heights per second (squared), so a preset
/// looks the same at any viewport size. Positive `y` points down.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParticleProfile {
    /// Spawns per second at a phase multiplier of 1.
    pub rate: f64,
    pub velocity_x: Span,
    pub velocity_y: Span,
    pub lifetime: Span,
    /// Radius in region heights.
    pub size: Span,
    /// Angular velocity in radians per second.
    #[serde(default = "zero_span")]
    pub spin: Span,
    /// Constant vertical acceleration; negative values are buoyancy.
    pub gravity: f64,
    /// Linear drag coefficient per second.
    pub drag: f64,
    /// Gravity is suppressed for this many seconds after spawn.
    #[serde(default)]
    pub burst_secs: f64,
    /// Extra downward acceleration once a particle passes 65% of its life.
    #[serde(default)]
    pub late_drift: f64,
    /// Amplitude of the sinusoidal horizontal wander.
    #[serde(default)]
    pub drift: f64,
    /// Relative size gain over a lifetime (`size * (1 + growth * a)`).
    #[serde(default)]
    pub growth: f64,
    pub max_opacity: f64,
    /// Spawn offset from the front toward the burned side, in region heights.
    #[serde(default)]
    pub spawn_offset: f64,
    /// Extra random offset across the burn axis, in region heights.
    #[serde(default)]
    pub spawn_jitter: f64,
    /// Per-particle brightness jitter in `[0, 1]`.
    #[serde(default)]
    pub luminance_jitter: f64,
    /// Young/warm color.
    pub color_a: Rgba8,
    /// Old/hot color.
    pub color_b: Rgba8,
    pub blend: BlendMode,
}

fn zero_span() -> Span {
    Span::fixed(0.0)
}

impl ParticleProfile {
    pub fn validate(&self, kind: ParticleKind) -> BurnResult<()> {
        let name = format!("{kind:?}").to_ascii_lowercase();
        self.velocity_x.validate(&format!("{name} velocity_x"))?;
        self.velocity_y.validate(&format!("{name} velocity_y"))?;
        self.lifetime.validate(&format!("{name} lifetime"))?;
        self.size.validate(&format!("{name} size"))?;
        self.spin.validate(&format!("{name} spin"))?;
        if self.lifetime.min <= 0.0 {
            return Err(BurnError::config(format!("{name} lifetime must be > 0")));
        }
        if self.size.min < 0.0 {
            return Err(BurnError::config(format!("{name} size must be >= 0")));
        }
        let scalars = [
            ("rate", self.rate),
            ("gravity", self.gravity),
            ("drag", self.drag),
            ("burst_secs", self.burst_secs),
            ("late_drift", self.late_drift),
            ("drift", self.drift),
            ("growth", self.growth),
            ("max_opacity", self.max_opacity),
            ("spawn_offset", self.spawn_offset),
            ("spawn_jitter", self.spawn_jitter),
            ("luminance_jitter", self.luminance_jitter),
        ];
        for (field, v) in scalars {
            if !v.is_finite() {
                return Err(BurnError::config(format!("{name} {field} must be finite")));
            }
        }
        for (field, v) in [
            ("rate", self.rate),
            ("drag", self.drag),
            ("burst_secs", self.burst_secs),
            ("growth", self.growth),
            ("spawn_jitter", self.spawn_jitter),
        ] {
            if v < 0.0 {
                return Err(BurnError::config(format!("{name} {field} must be >= 0")));
            }
        }
        if !(0.0..=1.0).contains(&self.max_opacity) || !(0.0..=1.0).contains(&self.luminance_jitter)
        {
            return Err(BurnError::config(format!(
                "{name} max_opacity and luminance_jitter must be in [0, 1]"
            )));
        }
        Ok(())
    }
}

/// One profile per particle family.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParticleProfiles {
    pub ember: ParticleProfile,
    pub ash: ParticleProfile,
    pub smoke: ParticleProfile,
}

impl ParticleProfiles {
    pub fn get(&self, kind: ParticleKind) -> &ParticleProfile {
        match kind {
            ParticleKind::Ember => &self.ember,
            ParticleKind::Ash => &self.ash,
            ParticleKind::Smoke => &self.smoke,
        }
    }

    pub fn validate(&self) -> BurnResult<()> {
        for kind in ParticleKind::ALL {
            self.get(kind).validate(kind)?;
        }
        Ok(())
    }
}

/// Per-phase multipliers on each family's spawn rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RateMultipliers {
    #[serde(default)]
    pub ember: f64,
    #[serde(default)]
    pub ash: f64,
    #[serde(default)]
    pub smoke: f64,
}

impl RateMultipliers {
    pub const fn new(ember: f64, ash: f64, smoke: f64) -> Self {
        Self { ember, ash, smoke }
    }

    pub fn get(&self, kind: ParticleKind) -> f64 {
        match kind {
            ParticleKind::Ember => self.ember,
            ParticleKind::Ash => self.ash,
            ParticleKind::Smoke => self.smoke,
        }
    }

    pub fn validate(&self) -> BurnResult<()> {
        for kind in ParticleKind::ALL {
            let v = self.get(kind);
            if !v.is_finite() || v < 0.0 {
                return Err(BurnError::config(format!(
                    "{kind:?} rate multiplier must be finite and >= 0, got {v}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/profile.rs"]
mod tests;
