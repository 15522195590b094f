use crate::foundation::error::{BurnError, BurnResult};

pub use kurbo::{Rect, Vec2};

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Same color with alpha scaled by `opacity` in `[0, 1]`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let op = crate::foundation::math::clamp01(opacity);
        Self {
            a: (f64::from(self.a) * op).round().clamp(0.0, 255.0) as u8,
            ..self
        }
    }
}

/// Pixel size of the host viewport the effect is anchored in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> BurnResult<Self> {
        if width == 0 || height == 0 {
            return Err(BurnError::config(format!(
                "viewport must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// Normalized bounding box (`[0, 1]` on both axes) describing where the effect sits
/// inside the viewport.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    /// The whole viewport.
    pub const FULL: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clamp the box into the unit square: origin into `[0, 1]`, extents non-negative and
    /// not past the far edge.
    pub fn clamped(self) -> Self {
        fn fin(v: f64) -> f64 {
            crate::foundation::math::finite_or_zero(v)
        }
        let x = fin(self.x).clamp(0.0, 1.0);
        let y = fin(self.y).clamp(0.0, 1.0);
        Self {
            x,
            y,
            width: fin(self.width).clamp(0.0, 1.0 - x),
            height: fin(self.height).clamp(0.0, 1.0 - y),
        }
    }

    /// Reject degenerate regions. Called once when an engine is built.
    pub fn validate(&self) -> BurnResult<()> {
        for (name, v) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !v.is_finite() {
                return Err(BurnError::config(format!("region {name} must be finite")));
            }
        }
        let c = self.clamped();
        if c.width <= 0.0 {
            return Err(BurnError::config(format!(
                "region width must be > 0 inside the viewport, got {}",
                self.width
            )));
        }
        if c.height <= 0.0 {
            return Err(BurnError::config(format!(
                "region height must be > 0 inside the viewport, got {}",
                self.height
            )));
        }
        Ok(())
    }

    /// Pixel rectangle of the clamped region inside `viewport`.
    pub fn to_pixel_rect(self, viewport: Viewport) -> Rect {
        let c = self.clamped();
        let vw = f64::from(viewport.width);
        let vh = f64::from(viewport.height);
        Rect::new(
            c.x * vw,
            c.y * vh,
            (c.x + c.width) * vw,
            (c.y + c.height) * vh,
        )
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::FULL
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
