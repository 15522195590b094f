use crate::foundation::error::{BurnError, BurnResult};

/// A named, time-bounded stage of a burn sequence.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Phase {
    pub name: String,
    pub duration_secs: f64,
}

impl Phase {
    pub fn new(name: impl Into<String>, duration_secs: f64) -> Self {
        Self {
            name: name.into(),
            duration_secs,
        }
    }
}

/// Where an elapsed time falls on a [`PhaseTimeline`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhasePosition {
    pub index: usize,
    /// Progress through the phase, `[0, 1]`.
    pub local_progress: f64,
    /// Progress through the whole timeline, `[0, 1]`.
    pub global_progress: f64,
}

/// Ordered phases with a precomputed cumulative-end table.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseTimeline {
    phases: Vec<Phase>,
    ends: Vec<f64>, // cumulative, ends[i] = sum of durations 0..=i
    total: f64,
}

impl PhaseTimeline {
    pub fn new(phases: Vec<Phase>) -> BurnResult<Self> {
        if phases.is_empty() {
            return Err(BurnError::config("timeline needs at least one phase"));
        }
        let mut ends = Vec::with_capacity(phases.len());
        let mut acc = 0.0;
        for p in &phases {
            if p.name.trim().is_empty() {
                return Err(BurnError::config("phase names must be non-empty"));
            }
            if !p.duration_secs.is_finite() || p.duration_secs <= 0.0 {
                return Err(BurnError::config(format!(
                    "phase '{}' duration must be finite and > 0, got {}",
                    p.name, p.duration_secs
                )));
            }
            acc += p.duration_secs;
            ends.push(acc);
        }
        if !acc.is_finite() {
            return Err(BurnError::config("timeline total duration overflows"));
        }
        Ok(Self {
            phases,
            ends,
            total: acc,
        })
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn total_duration(&self) -> f64 {
        self.total
    }

    pub fn terminal_index(&self) -> usize {
        self.phases.len() - 1
    }

    pub fn phase(&self, index: usize) -> Option<&Phase> {
        self.phases.get(index)
    }

    /// Start time of phase `index` in seconds.
    pub fn phase_start(&self, index: usize) -> f64 {
        match index {
            0 => 0.0,
            i => self.ends[(i - 1).min(self.ends.len() - 1)],
        }
    }

    /// Resolve `elapsed` seconds to a phase. Negative or NaN times resolve as `0`; times at
    /// or past the end resolve to the terminal phase with `local_progress == 1`.
    pub fn resolve(&self, elapsed: f64) -> PhasePosition {
        let elapsed = if elapsed.is_nan() { 0.0 } else { elapsed.max(0.0) };
        if elapsed >= self.total {
            return PhasePosition {
                index: self.terminal_index(),
                local_progress: 1.0,
                global_progress: 1.0,
            };
        }

        let index = self
            .ends
            .partition_point(|&end| end <= elapsed)
            .min(self.terminal_index());
        let start = self.phase_start(index);
        let duration = self.phases[index].duration_secs;
        PhasePosition {
            index,
            local_progress: ((elapsed - start) / duration).clamp(0.0, 1.0),
            global_progress: (elapsed / self.total).clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/phase.rs"]
mod tests;
