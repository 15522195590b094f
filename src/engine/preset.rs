use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use crate::color::ramp::{ColorRamp, RampStop};
use crate::foundation::core::Rgba8;
use crate::foundation::error::{BurnError, BurnResult};
use crate::front::controller::{BurnFrontController, FrontConfig, FrontDirection};
use crate::heat::simulator::HeatParams;
use crate::particles::profile::{
    BlendMode, ParticleProfile, ParticleProfiles, RateMultipliers, Span,
};
use crate::timeline::ease::Ease;
use crate::timeline::intensity::{IntensityCurve, IntensityEnvelope};
use crate::timeline::phase::{Phase, PhaseTimeline};

/// Hard ceiling on `max_particles` accepted from a preset.
pub const MAX_PARTICLES: usize = 100_000;

const BUILTIN_NAMES: [&str; 3] = ["enhanced", "simple", "scorch"];

/// One row of a preset's phase table.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhaseSpec {
    pub name: String,
    pub duration_secs: f64,
    /// Stage intensity across the phase.
    pub intensity: IntensityEnvelope,
    /// Multiplier on the front's base speed.
    #[serde(default = "one")]
    pub front_speed: f64,
    /// Multipliers on each particle family's spawn rate.
    #[serde(default)]
    pub rates: RateMultipliers,
}

fn one() -> f64 {
    1.0
}

fn default_max_particles() -> usize {
    1500
}

fn default_cull_margin() -> f64 {
    0.15
}

fn default_max_dt() -> f64 {
    0.05
}

/// Everything that distinguishes one burn variant from another.
///
/// A preset is plain data: the phase table with its intensity envelopes, front speeds and
/// spawn multipliers, the front itself, heat-field tunables, the color ramp and the three
/// particle profiles. Presets come from [`BurnPreset::builtin`] or from JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BurnPreset {
    pub name: String,
    /// Seeds both the noise field and the particle RNG.
    #[serde(default)]
    pub seed: u64,
    pub phases: Vec<PhaseSpec>,
    pub front: FrontConfig,
    #[serde(default)]
    pub heat: HeatParams,
    pub ramp: Vec<RampStop>,
    pub particles: ParticleProfiles,
    #[serde(default = "default_max_particles")]
    pub max_particles: usize,
    /// Fraction of the viewport particles may leave before they are culled.
    #[serde(default = "default_cull_margin")]
    pub cull_margin: f64,
    /// Largest simulated step per tick, seconds.
    #[serde(default = "default_max_dt")]
    pub max_dt: f64,
}

impl BurnPreset {
    /// Names accepted by [`BurnPreset::builtin`].
    pub fn builtin_names() -> &'static [&'static str] {
        &BUILTIN_NAMES
    }

    /// Look up a built-in preset by name.
    pub fn builtin(name: &str) -> BurnResult<Self> {
        match name {
            "enhanced" => Ok(enhanced()),
            "simple" => Ok(simple()),
            "scorch" => Ok(scorch()),
            other => Err(BurnError::config(format!(
                "unknown preset '{other}' (expected one of: {})",
                BUILTIN_NAMES.join(", ")
            ))),
        }
    }

    /// Parse and validate a preset from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> BurnResult<Self> {
        let preset: Self = serde_json::from_reader(r)?;
        preset.validate()?;
        Ok(preset)
    }

    /// Parse and validate a preset from a JSON string.
    pub fn from_json_str(s: &str) -> BurnResult<Self> {
        let preset: Self = serde_json::from_str(s)?;
        preset.validate()?;
        Ok(preset)
    }

    /// Parse and validate a preset from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> BurnResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open preset JSON '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_json_pretty(&self) -> BurnResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sum of all phase durations.
    pub fn total_duration(&self) -> f64 {
        self.phases.iter().map(|p| p.duration_secs).sum()
    }

    /// Check every invariant an engine relies on.
    pub fn validate(&self) -> BurnResult<()> {
        if self.name.trim().is_empty() {
            return Err(BurnError::config("preset name must not be empty"));
        }
        self.timeline()?;
        self.intensity_curve()?;
        self.front_controller()?;
        self.color_ramp()?;
        self.heat.validate()?;
        self.particles.validate()?;
        for (i, p) in self.phases.iter().enumerate() {
            p.rates
                .validate()
                .map_err(|e| BurnError::config(format!("phase {i} ('{}'): {e}", p.name)))?;
        }
        if self.max_particles > MAX_PARTICLES {
            return Err(BurnError::config(format!(
                "max_particles must be <= {MAX_PARTICLES}, got {}",
                self.max_particles
            )));
        }
        if !self.cull_margin.is_finite() || self.cull_margin < 0.0 {
            return Err(BurnError::config("cull_margin must be finite and >= 0"));
        }
        if !self.max_dt.is_finite() || self.max_dt <= 0.0 {
            return Err(BurnError::config("max_dt must be finite and > 0"));
        }
        Ok(())
    }

    pub(crate) fn timeline(&self) -> BurnResult<PhaseTimeline> {
        PhaseTimeline::new(
            self.phases
                .iter()
                .map(|p| Phase::new(p.name.clone(), p.duration_secs))
                .collect(),
        )
    }

    pub(crate) fn intensity_curve(&self) -> BurnResult<IntensityCurve> {
        IntensityCurve::new(self.phases.iter().map(|p| p.intensity).collect())
    }

    pub(crate) fn front_controller(&self) -> BurnResult<BurnFrontController> {
        BurnFrontController::new(
            self.front,
            self.phases.iter().map(|p| p.front_speed).collect(),
        )
    }

    pub(crate) fn color_ramp(&self) -> BurnResult<ColorRamp> {
        ColorRamp::new(self.ramp.clone())
    }

    pub(crate) fn rate_table(&self) -> Vec<RateMultipliers> {
        self.phases.iter().map(|p| p.rates).collect()
    }
}

fn phase(
    name: &str,
    duration_secs: f64,
    intensity: IntensityEnvelope,
    front_speed: f64,
    rates: RateMultipliers,
) -> PhaseSpec {
    PhaseSpec {
        name: name.to_owned(),
        duration_secs,
        intensity,
        front_speed,
        rates,
    }
}

fn fire_ramp() -> Vec<RampStop> {
    vec![
        RampStop::new(0.0, Rgba8::transparent()),
        RampStop::new(0.2, Rgba8::new(60, 8, 0, 140)),
        RampStop::new(0.45, Rgba8::new(180, 40, 0, 220)),
        RampStop::new(0.7, Rgba8::new(255, 120, 10, 255)),
        RampStop::new(0.88, Rgba8::new(255, 200, 80, 255)),
        RampStop::new(1.0, Rgba8::new(255, 250, 220, 255)),
    ]
}

fn ember_profile() -> ParticleProfile {
    ParticleProfile {
        rate: 90.0,
        velocity_x: Span::new(-0.12, 0.12),
        velocity_y: Span::new(-0.55, -0.25),
        lifetime: Span::new(0.7, 1.4),
        size: Span::new(0.003, 0.007),
        spin: Span::fixed(0.0),
        gravity: 0.6,
        drag: 0.6,
        burst_secs: 0.35,
        late_drift: 0.0,
        drift: 0.05,
        growth: 0.0,
        max_opacity: 1.0,
        spawn_offset: 0.0,
        spawn_jitter: 0.015,
        luminance_jitter: 0.15,
        color_a: Rgba8::new(255, 110, 20, 255),
        color_b: Rgba8::new(255, 230, 150, 255),
        blend: BlendMode::Additive,
    }
}

fn ash_profile() -> ParticleProfile {
    ParticleProfile {
        rate: 35.0,
        velocity_x: Span::new(-0.05, 0.05),
        velocity_y: Span::new(-0.15, -0.05),
        lifetime: Span::new(1.5, 2.5),
        size: Span::new(0.002, 0.005),
        spin: Span::new(-3.0, 3.0),
        gravity: -0.02,
        drag: 0.3,
        burst_secs: 0.0,
        late_drift: 0.12,
        drift: 0.04,
        growth: 0.0,
        max_opacity: 0.85,
        spawn_offset: 0.04,
        spawn_jitter: 0.02,
        luminance_jitter: 0.3,
        color_a: Rgba8::new(120, 116, 112, 255),
        color_b: Rgba8::new(120, 116, 112, 255),
        blend: BlendMode::Normal,
    }
}

fn smoke_profile() -> ParticleProfile {
    ParticleProfile {
        rate: 25.0,
        velocity_x: Span::new(-0.03, 0.03),
        velocity_y: Span::new(-0.12, -0.06),
        lifetime: Span::new(2.0, 3.2),
        size: Span::new(0.02, 0.04),
        spin: Span::fixed(0.0),
        gravity: -0.03,
        drag: 0.2,
        burst_secs: 0.0,
        late_drift: 0.0,
        drift: 0.08,
        growth: 1.8,
        max_opacity: 0.35,
        // Negative: toward the unburned side, i.e. above a climbing front.
        spawn_offset: -0.08,
        spawn_jitter: 0.03,
        luminance_jitter: 0.1,
        color_a: Rgba8::new(28, 24, 22, 230),
        color_b: Rgba8::new(90, 86, 84, 160),
        blend: BlendMode::Normal,
    }
}

/// Six-stage bottom-to-top burn, 6 s.
fn enhanced() -> BurnPreset {
    let env = IntensityEnvelope::new;
    let r = RateMultipliers::new;
    BurnPreset {
        name: "enhanced".to_owned(),
        seed: 0x0B0B_F12E,
        phases: vec![
            phase("heat_up", 0.75, env(0.15, 0.45, Ease::InQuad), 0.1, r(0.1, 0.0, 0.3)),
            phase("ignition", 1.0, env(0.45, 1.0, Ease::OutQuad), 0.5, r(0.6, 0.2, 0.6)),
            phase("active_burn", 1.5, env(1.0, 1.25, Ease::Smoothstep), 1.2, r(1.0, 0.8, 1.0)),
            phase("structural_failure", 1.25, env(1.25, 1.35, Ease::Linear), 1.6, r(1.4, 1.2, 1.0)),
            phase("collapse", 0.75, env(1.35, 0.8, Ease::InOutQuad), 1.4, r(1.0, 1.4, 0.8)),
            phase("embers", 0.75, env(0.8, 0.25, Ease::OutCubic), 0.6, r(0.6, 0.8, 0.4)),
        ],
        front: FrontConfig {
            direction: FrontDirection::BottomToTop,
            start: 1.05,
            stop_limit: -0.15,
            base_speed: 0.2,
        },
        heat: HeatParams::default(),
        ramp: fire_ramp(),
        particles: ParticleProfiles {
            ember: ember_profile(),
            ash: ash_profile(),
            smoke: smoke_profile(),
        },
        max_particles: default_max_particles(),
        cull_margin: default_cull_margin(),
        max_dt: default_max_dt(),
    }
}

/// Four-stage burn with a shorter ramp and lighter particles, 4 s.
fn simple() -> BurnPreset {
    let env = IntensityEnvelope::new;
    let r = RateMultipliers::new;
    BurnPreset {
        name: "simple".to_owned(),
        seed: 0x51_3B1E,
        phases: vec![
            phase("ignition", 0.5, env(0.3, 1.0, Ease::OutQuad), 0.4, r(0.5, 0.0, 0.5)),
            phase("burn", 1.5, env(1.0, 1.0, Ease::Hold), 1.0, r(1.0, 0.6, 1.0)),
            phase("collapse", 1.0, env(1.0, 0.6, Ease::Linear), 1.3, r(0.8, 1.0, 0.8)),
            phase("fade", 1.0, env(0.6, 0.0, Ease::InQuad), 0.5, r(0.2, 0.4, 0.3)),
        ],
        front: FrontConfig {
            direction: FrontDirection::BottomToTop,
            start: 1.0,
            stop_limit: 0.0,
            base_speed: 0.3,
        },
        heat: HeatParams {
            downsample: 6,
            falloff_distance: 0.18,
            octaves: 3,
            osc_depth: 0.1,
            ..HeatParams::default()
        },
        ramp: vec![
            RampStop::new(0.0, Rgba8::transparent()),
            RampStop::new(0.35, Rgba8::new(150, 30, 0, 200)),
            RampStop::new(0.75, Rgba8::new(255, 150, 30, 255)),
            RampStop::new(1.0, Rgba8::new(255, 240, 200, 255)),
        ],
        particles: ParticleProfiles {
            ember: ParticleProfile {
                rate: 50.0,
                ..ember_profile()
            },
            ash: ParticleProfile {
                rate: 15.0,
                ..ash_profile()
            },
            smoke: ParticleProfile {
                rate: 12.0,
                ..smoke_profile()
            },
        },
        max_particles: 600,
        cull_margin: default_cull_margin(),
        max_dt: default_max_dt(),
    }
}

/// Five-stage top-to-bottom reveal, 5 s.
fn scorch() -> BurnPreset {
    let env = IntensityEnvelope::new;
    let r = RateMultipliers::new;
    BurnPreset {
        name: "scorch".to_owned(),
        seed: 0x5C0_2C4,
        phases: vec![
            phase("smoulder", 0.6, env(0.1, 0.35, Ease::InQuad), 0.15, r(0.0, 0.1, 0.6)),
            phase("catch", 0.9, env(0.35, 0.9, Ease::OutQuad), 0.6, r(0.5, 0.3, 0.8)),
            phase("spread", 1.6, env(0.9, 1.2, Ease::Smoothstep), 1.3, r(1.0, 1.0, 1.0)),
            phase("char", 1.2, env(1.2, 0.7, Ease::InOutQuad), 1.1, r(0.7, 1.3, 0.9)),
            phase("reveal", 0.7, env(0.7, 0.0, Ease::OutCubic), 0.8, r(0.2, 0.5, 0.3)),
        ],
        front: FrontConfig {
            direction: FrontDirection::TopToBottom,
            start: -0.05,
            stop_limit: 1.1,
            base_speed: 0.26,
        },
        heat: HeatParams {
            edge_band: 0.08,
            crown_strength: 0.2,
            rise_speed: 1.1,
            ..HeatParams::default()
        },
        ramp: fire_ramp(),
        particles: ParticleProfiles {
            ember: ember_profile(),
            // The burned side sits above a descending front.
            ash: ParticleProfile {
                spawn_offset: 0.05,
                ..ash_profile()
            },
            smoke: ParticleProfile {
                spawn_offset: 0.1,
                ..smoke_profile()
            },
        },
        max_particles: default_max_particles(),
        cull_margin: default_cull_margin(),
        max_dt: default_max_dt(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/preset.rs"]
mod tests;
