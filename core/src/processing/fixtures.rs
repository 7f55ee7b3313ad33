use std::f64::consts::PI;

use ndarray::{Array2, Array3};
use num_complex::Complex64;

use crate::array_interface::{StationSpectra, TimeShiftTable};
use crate::prelude::{BeamformConfig, TrigMode};

/// Irregular five-station layout in km.
pub const STATIONS: [(f32, f32); 5] = [
    (0.0, 0.0),
    (0.6, 0.1),
    (-0.4, 0.5),
    (0.1, -0.7),
    (-0.5, -0.3),
];

/// Band 1-3 Hz at 16 Hz with a 32-point transform: bins 2..=6.
pub fn config(nstat: usize, grdpts_x: usize, grdpts_y: usize, prewhiten: bool) -> BeamformConfig {
    BeamformConfig {
        flow: 1.0,
        fhigh: 3.0,
        digfreq: 16.0,
        nsamp: 32,
        nstat,
        grdpts_x,
        grdpts_y,
        nfft: 32,
        prewhiten,
        trig: TrigMode::Table,
    }
}

/// 7x7 slowness grid from -0.3 to 0.3 s/km over [`STATIONS`].
pub fn slowness_table() -> TimeShiftTable {
    let data = Array3::from_shape_fn((STATIONS.len(), 7, 7), |(j, x, y)| {
        let sx = -0.3 + 0.1 * x as f32;
        let sy = -0.3 + 0.1 * y as f32;
        sx * STATIONS[j].0 + sy * STATIONS[j].1
    });
    TimeShiftTable::new(data).expect("finite shifts")
}

/// Unit-amplitude plane wave arriving with the delays of cell `(x, y)`.
pub fn plane_wave(tshift: &TimeShiftTable, x: usize, y: usize, nfft: usize, df: f64) -> StationSpectra {
    let nstat = tshift.dim().0;
    let data = Array2::from_shape_fn((nstat, nfft / 2 + 1), |(j, b)| {
        let tau = tshift.get(j, x, y) as f64;
        Complex64::from_polar(1.0, -2.0 * PI * df * b as f64 * tau)
    });
    StationSpectra::new(data).expect("finite spectra")
}
