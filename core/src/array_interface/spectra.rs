use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;

use crate::math::fft::FftHelper;
use crate::prelude::{FkError, FkResult};

/// One-sided spectra per station, shape `(nstat, nfft / 2 + 1)`.
///
/// Values are stored exactly as the forward transform produced them.
#[derive(Debug, Clone)]
pub struct StationSpectra {
    data: Array2<Complex64>,
}

impl StationSpectra {
    pub fn new(data: Array2<Complex64>) -> FkResult<Self> {
        if data.iter().any(|v| !v.re.is_finite() || !v.im.is_finite()) {
            return Err(FkError::InvalidParameters(
                "station spectra contain non-finite values".into(),
            ));
        }
        Ok(Self { data })
    }

    /// Transforms each row of `traces` (`nstat x nsamp`) with an
    /// `nfft`-point FFT.
    pub fn from_traces(traces: ArrayView2<f64>, nfft: usize) -> FkResult<Self> {
        if nfft == 0 {
            return Err(FkError::InvalidParameters("nfft must be positive".into()));
        }
        let nstat = traces.nrows();
        let mut fft = FftHelper::new(nfft);
        let mut data = Array2::zeros((nstat, nfft / 2 + 1));
        for (trace, mut row) in traces.outer_iter().zip(data.outer_iter_mut()) {
            let samples = trace.to_vec();
            let spectrum = fft.one_sided(&samples);
            row.iter_mut()
                .zip(spectrum)
                .for_each(|(slot, value)| *slot = value);
        }
        Self::new(data)
    }

    pub fn nstat(&self) -> usize {
        self.data.nrows()
    }

    pub fn nbins(&self) -> usize {
        self.data.ncols()
    }

    #[inline]
    pub fn get(&self, station: usize, bin: usize) -> Complex64 {
        self.data[[station, bin]]
    }

    pub fn view(&self) -> ArrayView2<'_, Complex64> {
        self.data.view()
    }

    /// Multiplies every value by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            data: self.data.mapv(|v| v * factor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn from_traces_builds_one_row_per_station() {
        let traces = Array2::from_shape_fn((3, 16), |(s, i)| (s + i) as f64);
        let spectra = StationSpectra::from_traces(traces.view(), 16).unwrap();
        assert_eq!(spectra.nstat(), 3);
        assert_eq!(spectra.nbins(), 9);
        // bin 0 is the plain sum of the trace
        let sum: f64 = (0..16).map(|i| (1 + i) as f64).sum();
        assert!((spectra.get(1, 0).re - sum).abs() < 1e-9);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut data = Array2::zeros((1, 3));
        data[[0, 1]] = Complex64::new(f64::NAN, 0.0);
        assert!(StationSpectra::new(data).is_err());
    }
}
