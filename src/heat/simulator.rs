use crate::color::ramp::ColorRamp;
use crate::foundation::core::Rect;
use crate::foundation::error::{BurnError, BurnResult};
use crate::foundation::math::{clamp01, finite_or_zero, smoothstep};
use crate::front::controller::FrontDirection;
use crate::heat::buffer::HeatBuffer;
use crate::noise::field::NoiseField;

/// Largest grid edge accepted from a preset.
pub const MAX_GRID_DIM: u32 = 1024;
/// Most fbm octaves accepted from a preset.
pub const MAX_OCTAVES: u32 = 8;

/// Tunables of the heat-field pass. Distances along the burn axis (`falloff_distance`,
/// `edge_band`) are in region heights; noise scales apply to region pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HeatParams {
    /// Region pixels per grid cell.
    pub downsample: u32,
    pub max_grid_dim: u32,
    pub falloff_distance: f64,
    pub edge_band: f64,
    /// Exponent applied to the masked heat; larger values tighten the bright core.
    pub edge_sharpness: f64,
    pub base_heat: f64,
    pub noise_amp: f64,
    pub noise_scale: f64,
    pub octaves: u32,
    /// Horizontal frequency of the curl sample (`scaleA`).
    pub curl_scale_x: f64,
    /// Vertical frequency of the curl sample (`scaleB`).
    pub curl_scale_y: f64,
    pub curl_bend: f64,
    pub lateral_flow: f64,
    pub rise_speed: f64,
    pub osc_freq: f64,
    /// Fraction of the base term removed at the oscillation trough, `[0, 1]`.
    pub osc_depth: f64,
    /// How much cooler the left and right edges run, `[0, 1]`.
    pub crown_strength: f64,
}

impl Default for HeatParams {
    fn default() -> Self {
        Self {
            downsample: 4,
            max_grid_dim: 256,
            falloff_distance: 0.22,
            edge_band: 0.06,
            edge_sharpness: 1.35,
            base_heat: 0.08,
            noise_amp: 0.45,
            noise_scale: 0.035,
            octaves: 4,
            curl_scale_x: 0.012,
            curl_scale_y: 0.018,
            curl_bend: 0.65,
            lateral_flow: 0.15,
            rise_speed: 1.6,
            osc_freq: 2.2,
            osc_depth: 0.18,
            crown_strength: 0.35,
        }
    }
}

impl HeatParams {
    pub fn validate(&self) -> BurnResult<()> {
        if self.downsample == 0 {
            return Err(BurnError::config("heat downsample must be >= 1"));
        }
        if self.max_grid_dim == 0 || self.max_grid_dim > MAX_GRID_DIM {
            return Err(BurnError::config(format!(
                "heat max_grid_dim must be in 1..={MAX_GRID_DIM}"
            )));
        }
        if self.octaves > MAX_OCTAVES {
            return Err(BurnError::config(format!(
                "heat octaves must be <= {MAX_OCTAVES}"
            )));
        }
        let fields = [
            ("falloff_distance", self.falloff_distance),
            ("edge_band", self.edge_band),
            ("edge_sharpness", self.edge_sharpness),
            ("base_heat", self.base_heat),
            ("noise_amp", self.noise_amp),
            ("noise_scale", self.noise_scale),
            ("curl_scale_x", self.curl_scale_x),
            ("curl_scale_y", self.curl_scale_y),
            ("curl_bend", self.curl_bend),
            ("lateral_flow", self.lateral_flow),
            ("rise_speed", self.rise_speed),
            ("osc_freq", self.osc_freq),
            ("osc_depth", self.osc_depth),
            ("crown_strength", self.crown_strength),
        ];
        for (name, v) in fields {
            if !v.is_finite() {
                return Err(BurnError::config(format!("heat {name} must be finite")));
            }
        }
        if self.falloff_distance < 0.0 || self.edge_band < 0.0 {
            return Err(BurnError::config(
                "heat falloff_distance and edge_band must be >= 0",
            ));
        }
        if self.edge_sharpness <= 0.0 {
            return Err(BurnError::config("heat edge_sharpness must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.osc_depth) || !(0.0..=1.0).contains(&self.crown_strength) {
            return Err(BurnError::config(
                "heat osc_depth and crown_strength must be in [0, 1]",
            ));
        }
        Ok(())
    }

    /// Grid resolution for a region of `width_px` x `height_px`.
    pub fn grid_size(&self, width_px: f64, height_px: f64) -> (u32, u32) {
        let ds = f64::from(self.downsample.max(1));
        let cap = self.max_grid_dim.max(1);
        let dim = |px: f64| -> u32 {
            let cells = (finite_or_zero(px).max(0.0) / ds).ceil();
            (cells.min(f64::from(cap)) as u32).clamp(1, cap)
        };
        (dim(width_px), dim(height_px))
    }

    /// Flicker multiplier on the base term, in `[1 - osc_depth, 1]`.
    pub fn oscillation(&self, t: f64) -> f64 {
        let wave = 0.5 + 0.5 * (std::f64::consts::TAU * self.osc_freq * finite_or_zero(t)).sin();
        1.0 - self.osc_depth * wave
    }
}

/// Per-tick inputs the simulator does not own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatInputs {
    /// Simulation time in seconds.
    pub t: f64,
    /// Burn-front position in region heights.
    pub front: f64,
    /// Stage intensity from the phase curve.
    pub intensity: f64,
}

/// Computes the heat grid from noise, curl advection and the burn front, then colors it.
///
/// The simulator never sees phases; pacing arrives through [`HeatInputs::intensity`].
#[derive(Clone, Debug)]
pub struct HeatFieldSimulator {
    params: HeatParams,
    noise: NoiseField,
    ramp: ColorRamp,
    direction: FrontDirection,
    region_px: Rect,
    buffer: HeatBuffer,
}

impl HeatFieldSimulator {
    pub fn new(
        params: HeatParams,
        ramp: ColorRamp,
        noise: NoiseField,
        direction: FrontDirection,
        region_px: Rect,
    ) -> BurnResult<Self> {
        params.validate()?;
        if !(region_px.width() > 0.0 && region_px.height() > 0.0) {
            return Err(BurnError::config(format!(
                "heat region must have a positive pixel size, got {}x{}",
                region_px.width(),
                region_px.height()
            )));
        }
        let (cols, rows) = params.grid_size(region_px.width(), region_px.height());
        let mut buffer = HeatBuffer::new(cols, rows);
        buffer.fill(0.0, ramp.lookup(0.0).to_array());
        tracing::debug!(cols, rows, "heat grid allocated");
        Ok(Self {
            params,
            noise,
            ramp,
            direction,
            region_px,
            buffer,
        })
    }

    pub fn params(&self) -> &HeatParams {
        &self.params
    }

    pub fn buffer(&self) -> &HeatBuffer {
        &self.buffer
    }

    /// Viewport pixel rectangle covered by the grid.
    pub fn region_px(&self) -> Rect {
        self.region_px
    }

    /// Heat of cell `(col, row)` for `inputs`, without touching the buffer.
    pub fn sample_cell(&self, col: u32, row: u32, inputs: HeatInputs) -> f64 {
        let p = &self.params;
        let cols = f64::from(self.buffer.width());
        let rows = f64::from(self.buffer.height());
        let u = (f64::from(col) + 0.5) / cols;
        let v = (f64::from(row) + 0.5) / rows;
        let x = u * self.region_px.width();
        let y = v * self.region_px.height();
        let t = finite_or_zero(inputs.t);

        // 1. Distance ahead of the front and the baseline falloff behind it.
        let d = self.direction.distance_ahead(finite_or_zero(inputs.front), v);
        let base = if p.falloff_distance > 0.0 {
            clamp01(1.0 - d / p.falloff_distance)
        } else if d <= 0.0 {
            1.0
        } else {
            0.0
        };

        // 2. Curl-bent fbm sample coordinates.
        let c = self.noise.curl(
            x * p.curl_scale_x + t * p.lateral_flow,
            y * p.curl_scale_y + t * p.rise_speed,
            t,
        );
        let sx = x * p.noise_scale + c.x * p.curl_bend;
        let sy = y * p.noise_scale + t * p.rise_speed + c.y * p.curl_bend;
        let turbulence = self.noise.fbm(sx, sy, t, p.octaves, 1.0);

        // 3. Combine, then shape by crown and stage intensity.
        let crown = 1.0 - p.crown_strength * (2.0 * u - 1.0).powi(2);
        let mut heat = p.base_heat + base * p.oscillation(t) + turbulence * p.noise_amp;
        heat *= crown * finite_or_zero(inputs.intensity).max(0.0);

        // 4. Soft edge just ahead of the front.
        let mask = if d <= 0.0 {
            1.0
        } else {
            1.0 - smoothstep(0.0, p.edge_band, d)
        };

        // 5. Sharpen and clamp.
        let heat = clamp01(finite_or_zero(heat * mask));
        clamp01(finite_or_zero(heat.powf(p.edge_sharpness)))
    }

    /// Recompute every cell and return the refreshed buffer.
    pub fn step(&mut self, inputs: HeatInputs) -> &HeatBuffer {
        let (cols, rows) = (self.buffer.width(), self.buffer.height());
        for row in 0..rows {
            for col in 0..cols {
                let heat = self.sample_cell(col, row, inputs);
                let rgba = self.ramp.lookup(heat).to_array();
                let idx = row as usize * cols as usize + col as usize;
                self.buffer.write_cell(idx, heat as f32, rgba);
            }
        }
        &self.buffer
    }

    /// Return the grid to its cold state.
    pub fn reset(&mut self) {
        self.buffer.fill(0.0, self.ramp.lookup(0.0).to_array());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/heat/simulator.rs"]
mod tests;
