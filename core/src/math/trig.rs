use std::f64::consts::PI;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Samples per full period.
pub const SINE_REF_LEN: usize = 1000;
pub const SINE_REF_LEN_4: usize = SINE_REF_LEN / 4;
pub const SINE_TABLE_LEN: usize = SINE_REF_LEN + SINE_REF_LEN_4 + 1;

const TWO_PI: f64 = 2.0 * PI;
// Beyond this the wrap loop would take too many steps (or stall in f32).
const WRAP_LOOP_LIMIT: f32 = (64.0 * TWO_PI) as f32;

static SHARED_TABLE: OnceLock<SineTable> = OnceLock::new();

/// How phase rotations are evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrigMode {
    /// Interpolated lookup in the shared [`SineTable`].
    #[default]
    Table,
    /// Direct `sin`/`cos` calls.
    Exact,
}

impl TrigMode {
    /// Returns `(sin, cos)` of `phase`.
    #[inline]
    pub fn sin_cos(self, phase: f32) -> (f32, f32) {
        match self {
            TrigMode::Table => SineTable::shared().sin_cos(phase),
            TrigMode::Exact => {
                let phase = phase as f64;
                (phase.sin() as f32, phase.cos() as f32)
            }
        }
    }
}

/// Immutable sine table, built once per process.
pub struct SineTable {
    samples: Box<[f32]>,
    step_inv: f32,
}

impl SineTable {
    pub fn shared() -> &'static SineTable {
        SHARED_TABLE.get_or_init(SineTable::build)
    }

    fn build() -> Self {
        let span = TWO_PI + PI / 2.0;
        let last = (SINE_TABLE_LEN - 1) as f32;
        let samples = (0..SINE_TABLE_LEN)
            .map(|j| (((j as f32 / last) as f64) * span).sin() as f32)
            .collect::<Vec<_>>()
            .into_boxed_slice();
        let step = (TWO_PI / SINE_REF_LEN as f64) as f32;
        let step_inv = (1.0 / step as f64) as f32;
        Self { samples, step_inv }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Interpolated `(sin, cos)` of `phase`.
    #[inline]
    pub fn sin_cos(&self, phase: f32) -> (f32, f32) {
        let fidx = wrap_phase(phase) * self.step_inv;
        let mut idx = fidx as usize;
        let frac = (fidx - idx as f32) as f64;
        if idx >= SINE_REF_LEN {
            idx -= SINE_REF_LEN;
        }
        let lerp = |at: usize| {
            self.samples[at] as f64 * (1.0 - frac) + self.samples[at + 1] as f64 * frac
        };
        (lerp(idx) as f32, lerp(idx + SINE_REF_LEN_4) as f32)
    }
}

/// Brings `phase` into `[0, 2π]` by whole-period steps.
fn wrap_phase(phase: f32) -> f32 {
    let mut phase = if phase.abs() > WRAP_LOOP_LIMIT {
        (phase as f64).rem_euclid(TWO_PI) as f32
    } else {
        phase
    };
    while phase as f64 > TWO_PI {
        phase = (phase as f64 - TWO_PI) as f32;
    }
    while phase < 0.0 {
        phase = (phase as f64 + TWO_PI) as f32;
    }
    phase
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_spans_period_and_quarter() {
        let table = SineTable::shared();
        assert_eq!(table.len(), 1251);
        assert!(table.samples[0].abs() < 1e-7);
        assert!((table.samples[SINE_REF_LEN_4] - 1.0).abs() < 1e-6);
        assert!((table.samples[SINE_TABLE_LEN - 1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn lookup_tracks_exact_trig() {
        let table = SineTable::shared();
        let mut phase = -20.0f32;
        while phase < 20.0 {
            let (s, c) = table.sin_cos(phase);
            assert!((s as f64 - (phase as f64).sin()).abs() < 5e-5, "sin at {}", phase);
            assert!((c as f64 - (phase as f64).cos()).abs() < 5e-5, "cos at {}", phase);
            phase += 0.0137;
        }
    }

    #[test]
    fn period_boundary_folds_back_into_table() {
        let (s, c) = SineTable::shared().sin_cos(TWO_PI as f32);
        assert!(s.abs() < 1e-4);
        assert!((c - 1.0).abs() < 1e-4);
    }

    #[test]
    fn huge_phases_terminate() {
        let (s, c) = SineTable::shared().sin_cos(1.0e9);
        assert!(s.is_finite() && c.is_finite());
        assert!(((s * s + c * c) as f64 - 1.0).abs() < 1e-3);
    }

    #[test]
    fn exact_mode_matches_std() {
        let (s, c) = TrigMode::Exact.sin_cos(0.75);
        assert_eq!(s, (0.75f32 as f64).sin() as f32);
        assert_eq!(c, (0.75f32 as f64).cos() as f32);
    }
}
