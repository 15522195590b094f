/// Row-major heat grid plus its straight-alpha RGBA8 rendition.
///
/// The grid is at simulation resolution; hosts upscale it into the snapshot's `heat_rect`.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatBuffer {
    width: u32,
    height: u32,
    heat: Vec<f32>,
    rgba: Vec<u8>,
}

impl HeatBuffer {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let cells = width as usize * height as usize;
        Self {
            width,
            height,
            heat: vec![0.0; cells],
            rgba: vec![0; cells * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Heat values in `[0, 1]`, one per cell.
    pub fn heat(&self) -> &[f32] {
        &self.heat
    }

    /// RGBA8 bytes, tightly packed, row-major.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn heat_at(&self, col: u32, row: u32) -> Option<f32> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.heat
            .get(row as usize * self.width as usize + col as usize)
            .copied()
    }

    /// Mean heat over the grid; `0` for an empty grid.
    pub fn mean_heat(&self) -> f64 {
        if self.heat.is_empty() {
            return 0.0;
        }
        self.heat.iter().map(|&h| f64::from(h)).sum::<f64>() / self.heat.len() as f64
    }

    pub(crate) fn write_cell(&mut self, idx: usize, heat: f32, rgba: [u8; 4]) {
        self.heat[idx] = heat;
        self.rgba[idx * 4..idx * 4 + 4].copy_from_slice(&rgba);
    }

    pub(crate) fn fill(&mut self, heat: f32, rgba: [u8; 4]) {
        self.heat.fill(heat);
        for px in self.rgba.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/heat/buffer.rs"]
mod tests;
