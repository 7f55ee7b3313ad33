use anyhow::{bail, Context};
use fkcore::TimeShiftTable;
use ndarray::Array3;
use serde::{Deserialize, Serialize};

/// Station position relative to the array reference point, in km.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub x: f64,
    pub y: f64,
}

/// Regular slowness grid in s/km, starting at `(sll_x, sll_y)` with step
/// `sl_s`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlownessGrid {
    pub sll_x: f64,
    pub sll_y: f64,
    pub sl_s: f64,
    pub grdpts_x: usize,
    pub grdpts_y: usize,
}

impl SlownessGrid {
    /// Square grid covering `[-smax, smax]` on both axes.
    pub fn symmetric(smax: f64, sl_s: f64) -> anyhow::Result<Self> {
        if !(smax.is_finite() && smax > 0.0 && sl_s.is_finite() && sl_s > 0.0) {
            bail!("slowness limits must be positive, got smax={} step={}", smax, sl_s);
        }
        let points = (2.0 * smax / sl_s + 0.5).floor() as usize + 1;
        Ok(Self {
            sll_x: -smax,
            sll_y: -smax,
            sl_s,
            grdpts_x: points,
            grdpts_y: points,
        })
    }

    pub fn cell_slowness(&self, ix: usize, iy: usize) -> (f64, f64) {
        (
            self.sll_x + ix as f64 * self.sl_s,
            self.sll_y + iy as f64 * self.sl_s,
        )
    }

    /// Cell closest to the slowness `(sx, sy)`, clamped to the grid.
    pub fn nearest_cell(&self, sx: f64, sy: f64) -> (usize, usize) {
        let index = |s: f64, low: f64, points: usize| {
            let i = ((s - low) / self.sl_s).round().max(0.0) as usize;
            i.min(points.saturating_sub(1))
        };
        (
            index(sx, self.sll_x, self.grdpts_x),
            index(sy, self.sll_y, self.grdpts_y),
        )
    }
}

/// Delays `τ = sx·x + sy·y` for every station and grid cell.
pub fn time_shift_table(stations: &[Station], grid: &SlownessGrid) -> anyhow::Result<TimeShiftTable> {
    if stations.is_empty() {
        bail!("array needs at least one station");
    }
    let data = Array3::from_shape_fn((stations.len(), grid.grdpts_x, grid.grdpts_y), |(j, ix, iy)| {
        let (sx, sy) = grid.cell_slowness(ix, iy);
        (sx * stations[j].x + sy * stations[j].y) as f32
    });
    TimeShiftTable::new(data).context("building time shift table")
}
