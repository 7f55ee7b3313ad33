use ndarray::{Array3, ArrayView3};

use crate::prelude::{FkError, FkResult};

/// Travel-time offsets in seconds, indexed `[station][x][y]`.
#[derive(Debug, Clone)]
pub struct TimeShiftTable {
    data: Array3<f32>,
}

impl TimeShiftTable {
    pub fn new(data: Array3<f32>) -> FkResult<Self> {
        if data.iter().any(|v| !v.is_finite()) {
            return Err(FkError::InvalidParameters(
                "time-shift table contains non-finite values".into(),
            ));
        }
        Ok(Self { data })
    }

    /// Colocated array: every station sees zero delay for every cell.
    pub fn zeros(nstat: usize, grdpts_x: usize, grdpts_y: usize) -> Self {
        Self {
            data: Array3::zeros((nstat, grdpts_x, grdpts_y)),
        }
    }

    /// `(nstat, grdpts_x, grdpts_y)`
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    #[inline]
    pub fn get(&self, station: usize, x: usize, y: usize) -> f32 {
        self.data[[station, x, y]]
    }

    pub fn view(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }

    pub(crate) fn expect_dim(&self, nstat: usize, grdpts_x: usize, grdpts_y: usize) -> FkResult<()> {
        if self.dim() != (nstat, grdpts_x, grdpts_y) {
            return Err(FkError::InvalidParameters(format!(
                "time-shift table is {:?}, expected ({}, {}, {})",
                self.dim(),
                nstat,
                grdpts_x,
                grdpts_y
            )));
        }
        Ok(())
    }
}
