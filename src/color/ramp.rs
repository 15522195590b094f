use crate::foundation::core::Rgba8;
use crate::foundation::error::{BurnError, BurnResult};
use crate::foundation::math::{clamp01, lerp_u8};

/// One color stop of a [`ColorRamp`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RampStop {
    pub threshold: f64,
    pub rgba: Rgba8,
}

impl RampStop {
    pub const fn new(threshold: f64, rgba: Rgba8) -> Self {
        Self { threshold, rgba }
    }
}

/// Validated, piecewise-linear heat-to-color map.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorRamp {
    stops: Vec<RampStop>,
}

impl ColorRamp {
    /// Build a ramp. Thresholds must be finite and strictly increasing from exactly `0` to
    /// exactly `1`.
    pub fn new(stops: Vec<RampStop>) -> BurnResult<Self> {
        if stops.len() < 2 {
            return Err(BurnError::config("color ramp needs at least two stops"));
        }
        if stops.iter().any(|s| !s.threshold.is_finite()) {
            return Err(BurnError::config("color ramp thresholds must be finite"));
        }
        if stops[0].threshold != 0.0 {
            return Err(BurnError::config(format!(
                "color ramp must start at threshold 0, got {}",
                stops[0].threshold
            )));
        }
        let last = stops[stops.len() - 1].threshold;
        if last != 1.0 {
            return Err(BurnError::config(format!(
                "color ramp must end at threshold 1, got {last}"
            )));
        }
        if let Some(w) = stops
            .windows(2)
            .find(|w| w[1].threshold <= w[0].threshold)
        {
            return Err(BurnError::config(format!(
                "color ramp thresholds must be strictly increasing ({} then {})",
                w[0].threshold, w[1].threshold
            )));
        }
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[RampStop] {
        &self.stops
    }

    /// Map `v` (clamped into `[0, 1]`) to a color.
    pub fn lookup(&self, v: f64) -> Rgba8 {
        let v = clamp01(v);
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];
        if v <= first.threshold {
            return first.rgba;
        }
        if v >= last.threshold {
            return last.rgba;
        }

        // Stop counts are tiny; a linear scan beats a binary search here.
        for w in self.stops.windows(2) {
            let (a, b) = (w[0], w[1]);
            if v <= b.threshold {
                let t = (v - a.threshold) / (b.threshold - a.threshold);
                return Rgba8 {
                    r: lerp_u8(a.rgba.r, b.rgba.r, t),
                    g: lerp_u8(a.rgba.g, b.rgba.g, t),
                    b: lerp_u8(a.rgba.b, b.rgba.b, t),
                    a: lerp_u8(a.rgba.a, b.rgba.a, t),
                };
            }
        }
        last.rgba
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/ramp.rs"]
mod tests;
