use crate::foundation::error::{BurnError, BurnResult};
use crate::foundation::math::lerp;
use crate::timeline::ease::Ease;
use crate::timeline::phase::PhasePosition;

/// Upper bound for any stage intensity; keeps pathological presets from blowing out the
/// heat field before the final clamp.
pub const MAX_STAGE_INTENSITY: f64 = 4.0;

/// Intensity ramp across one phase: `from` at the phase start to `to` at its end.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IntensityEnvelope {
    pub from: f64,
    pub to: f64,
    #[serde(default)]
    pub ease: Ease,
}

impl IntensityEnvelope {
    pub const fn new(from: f64, to: f64, ease: Ease) -> Self {
        Self { from, to, ease }
    }

    pub const fn constant(value: f64) -> Self {
        Self::new(value, value, Ease::Linear)
    }

    pub fn sample(&self, local_progress: f64) -> f64 {
        lerp(self.from, self.to, self.ease.apply(local_progress)).clamp(0.0, MAX_STAGE_INTENSITY)
    }
}

/// Per-phase stage-intensity table.
///
/// This is the only place pacing is tuned; the heat-field math never looks at phases.
#[derive(Clone, Debug, PartialEq)]
pub struct IntensityCurve {
    envelopes: Vec<IntensityEnvelope>,
}

impl IntensityCurve {
    pub fn new(envelopes: Vec<IntensityEnvelope>) -> BurnResult<Self> {
        if envelopes.is_empty() {
            return Err(BurnError::config("intensity curve needs at least one envelope"));
        }
        for (i, e) in envelopes.iter().enumerate() {
            if !e.from.is_finite() || !e.to.is_finite() || e.from < 0.0 || e.to < 0.0 {
                return Err(BurnError::config(format!(
                    "intensity envelope {i} must be finite and >= 0"
                )));
            }
        }
        Ok(Self { envelopes })
    }

    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }

    /// Intensity for `phase_index` at `local_progress`. Indices past the table reuse the last
    /// envelope.
    pub fn stage_intensity(&self, phase_index: usize, local_progress: f64) -> f64 {
        let i = phase_index.min(self.envelopes.len() - 1);
        self.envelopes[i].sample(local_progress)
    }

    pub fn at(&self, pos: PhasePosition) -> f64 {
        self.stage_intensity(pos.index, pos.local_progress)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/intensity.rs"]
mod tests;
