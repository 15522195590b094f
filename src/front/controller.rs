use crate::foundation::error::{BurnError, BurnResult};
use crate::foundation::math::{finite_or_zero, ratio_or};

/// Which way the burn line travels across the region.
///
/// Positions are region-normalized with `0` at the top edge and `1` at the bottom edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontDirection {
    /// Position decreases (the burn climbs the region).
    #[default]
    BottomToTop,
    /// Position increases.
    TopToBottom,
}

impl FrontDirection {
    /// `+1` when travel increases the position, `-1` otherwise.
    pub fn sign(self) -> f64 {
        match self {
            Self::BottomToTop => -1.0,
            Self::TopToBottom => 1.0,
        }
    }

    /// Signed distance of `v` ahead of `front`, positive on the unburned side.
    pub fn distance_ahead(self, front: f64, v: f64) -> f64 {
        match self {
            Self::BottomToTop => front - v,
            Self::TopToBottom => v - front,
        }
    }
}

/// Static description of a burn line.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrontConfig {
    pub direction: FrontDirection,
    /// Starting position.
    pub start: f64,
    /// Position the front never moves past.
    pub stop_limit: f64,
    /// Travel speed in region heights per second before phase multipliers.
    pub base_speed: f64,
}

impl FrontConfig {
    pub fn validate(&self) -> BurnResult<()> {
        for (name, v) in [
            ("start", self.start),
            ("stop_limit", self.stop_limit),
            ("base_speed", self.base_speed),
        ] {
            if !v.is_finite() {
                return Err(BurnError::config(format!("front {name} must be finite")));
            }
        }
        if self.base_speed < 0.0 {
            return Err(BurnError::config("front base_speed must be >= 0"));
        }
        let wrong_side = match self.direction {
            FrontDirection::BottomToTop => self.stop_limit > self.start,
            FrontDirection::TopToBottom => self.stop_limit < self.start,
        };
        if wrong_side {
            return Err(BurnError::config(format!(
                "front stop_limit {} lies behind start {} for {:?}",
                self.stop_limit, self.start, self.direction
            )));
        }
        Ok(())
    }
}

/// Tracks the scalar burn-line position.
#[derive(Clone, Debug, PartialEq)]
pub struct BurnFrontController {
    config: FrontConfig,
    multipliers: Vec<f64>,
    position: f64,
}

impl BurnFrontController {
    /// `multipliers[i]` scales the base speed while phase `i` is active.
    pub fn new(config: FrontConfig, multipliers: Vec<f64>) -> BurnResult<Self> {
        config.validate()?;
        if multipliers.is_empty() {
            return Err(BurnError::config("front needs at least one speed multiplier"));
        }
        if let Some((i, m)) = multipliers
            .iter()
            .enumerate()
            .find(|(_, m)| !m.is_finite() || **m < 0.0)
        {
            return Err(BurnError::config(format!(
                "front speed multiplier {i} must be finite and >= 0, got {m}"
            )));
        }
        Ok(Self {
            config,
            multipliers,
            position: config.start,
        })
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn config(&self) -> &FrontConfig {
        &self.config
    }

    pub fn direction(&self) -> FrontDirection {
        self.config.direction
    }

    pub fn at_limit(&self) -> bool {
        self.position == self.config.stop_limit
    }

    /// Fraction of the start-to-stop distance covered so far.
    pub fn progress(&self) -> f64 {
        let span = (self.config.stop_limit - self.config.start).abs();
        ratio_or((self.position - self.config.start).abs(), span, 1.0).clamp(0.0, 1.0)
    }

    /// Move the front for `dt` seconds of phase `phase_index` and return the new position.
    pub fn advance(&mut self, dt: f64, phase_index: usize) -> f64 {
        let dt = finite_or_zero(dt).max(0.0);
        let m = self.multipliers[phase_index.min(self.multipliers.len() - 1)];
        let step = self.config.base_speed * m * dt;
        let next = self.position + self.config.direction.sign() * step;
        self.position = match self.config.direction {
            FrontDirection::BottomToTop => next.max(self.config.stop_limit),
            FrontDirection::TopToBottom => next.min(self.config.stop_limit),
        };
        self.position
    }

    pub fn reset(&mut self) {
        self.position = self.config.start;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/front/controller.rs"]
mod tests;
