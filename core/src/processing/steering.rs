use std::f64::consts::PI;

use ndarray::{s, Array4, ArrayView1};
use num_complex::Complex64;
use rayon::prelude::*;

use crate::array_interface::TimeShiftTable;
use crate::prelude::{FkError, FkResult};
use crate::processing::scratch::Scratch;

/// Unit phasors `steer[x][y][n][station]`, station varying fastest.
#[derive(Debug, Clone)]
pub struct SteeringTable {
    data: Array4<Complex64>,
}

impl SteeringTable {
    /// `(grdpts_x, grdpts_y, nf, nstat)`
    pub fn dim(&self) -> (usize, usize, usize, usize) {
        self.data.dim()
    }

    /// Steering vector over stations for one cell and bin.
    #[inline]
    pub fn vector(&self, x: usize, y: usize, n: usize) -> ArrayView1<'_, Complex64> {
        self.data.slice(s![x, y, n, ..])
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, n: usize, station: usize) -> Complex64 {
        self.data[[x, y, n, station]]
    }
}

pub struct SteeringTableBuilder;

impl SteeringTableBuilder {
    /// Phasors `exp(i 2π (nlow + n) deltaf τ)` for `nf` bins starting at
    /// absolute bin `nlow`.
    pub fn build(
        tshift: &TimeShiftTable,
        nf: usize,
        nlow: usize,
        deltaf: f32,
    ) -> FkResult<SteeringTable> {
        let (nstat, grdpts_x, grdpts_y) = tshift.dim();
        if nf == 0 {
            return Err(FkError::InvalidParameters(
                "steering table needs at least one frequency bin".into(),
            ));
        }
        let len = Scratch::element_count("steering table", &[grdpts_x, grdpts_y, nf, nstat])?;
        let mut buffer: Vec<Complex64> = Scratch::checkout("steering table", len)?;

        let per_cell = nf * nstat;
        if per_cell > 0 {
            buffer
                .par_chunks_mut(per_cell)
                .enumerate()
                .for_each(|(cell, phasors)| {
                    let (x, y) = (cell / grdpts_y, cell % grdpts_y);
                    for (n, row) in phasors.chunks_mut(nstat).enumerate() {
                        let bin = (nlow + n) as f32 as f64;
                        for (station, slot) in row.iter_mut().enumerate() {
                            let wtau =
                                2.0 * PI * bin * deltaf as f64 * tshift.get(station, x, y) as f64;
                            *slot = Complex64::new(wtau.cos(), wtau.sin());
                        }
                    }
                });
        }

        let data = Array4::from_shape_vec((grdpts_x, grdpts_y, nf, nstat), buffer)
            .map_err(|e| FkError::InvalidParameters(e.to_string()))?;
        Ok(SteeringTable { data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn table() -> TimeShiftTable {
        let data = Array3::from_shape_fn((3, 4, 5), |(s, x, y)| {
            0.013 * s as f32 * (x as f32 - 1.5) - 0.007 * (y as f32 - 2.0)
        });
        TimeShiftTable::new(data).unwrap()
    }

    #[test]
    fn every_phasor_has_unit_magnitude() {
        let steer = SteeringTableBuilder::build(&table(), 6, 3, 0.25).unwrap();
        assert_eq!(steer.dim(), (4, 5, 6, 3));
        for x in 0..4 {
            for y in 0..5 {
                for n in 0..6 {
                    for v in steer.vector(x, y, n).iter() {
                        assert!((v.norm() - 1.0).abs() < 1e-12);
                    }
                }
            }
        }
    }

    #[test]
    fn phase_follows_absolute_bin_frequency() {
        let tshift = table();
        let steer = SteeringTableBuilder::build(&tshift, 4, 2, 0.5).unwrap();
        let tau = tshift.get(2, 3, 1) as f64;
        let phase = 2.0 * PI * (2 + 3) as f64 * 0.5 * tau;
        let v = steer.get(3, 1, 3, 2);
        assert!((v - Complex64::from_polar(1.0, phase)).norm() < 1e-12);
    }

    #[test]
    fn oversized_table_reports_allocation_failure() {
        let tshift = TimeShiftTable::zeros(1, 1, 1);
        let err = SteeringTableBuilder::build(&tshift, usize::MAX / 8, 1, 0.5).unwrap_err();
        assert!(matches!(err, FkError::AllocationFailed { what: "steering table", .. }));

        let wide = TimeShiftTable::zeros(2, 1, 1);
        let err = SteeringTableBuilder::build(&wide, usize::MAX, 1, 0.5).unwrap_err();
        assert!(matches!(err, FkError::AllocationFailed { len: usize::MAX, .. }));
    }

    #[test]
    fn zero_bins_are_rejected() {
        assert!(SteeringTableBuilder::build(&table(), 0, 1, 0.5).is_err());
    }
}
