use ndarray::{s, Array3, ArrayView2, ArrayView3};
use num_complex::Complex64;

use crate::array_interface::spectra::StationSpectra;
use crate::math::band::FrequencyBand;
use crate::math::matrix::MatrixHelper;
use crate::prelude::{FkError, FkResult};

/// Cross-spectral matrices, indexed `[freq_bin][station_i][station_j]`.
#[derive(Debug, Clone)]
pub struct CovarianceCube {
    data: Array3<Complex64>,
}

impl CovarianceCube {
    pub fn new(data: Array3<Complex64>) -> FkResult<Self> {
        let (_, rows, cols) = data.dim();
        if rows != cols {
            return Err(FkError::InvalidParameters(format!(
                "covariance matrices must be square, got {}x{}",
                rows, cols
            )));
        }
        if data.iter().any(|v| !v.re.is_finite() || !v.im.is_finite()) {
            return Err(FkError::InvalidParameters(
                "covariance contains non-finite values".into(),
            ));
        }
        Ok(Self { data })
    }

    /// `R_ij(n) = X_i(n) conj(X_j(n))` over the band, with the BF normaliser
    /// `dpow = nstat * sum_i |sum_n R_ii(n)|`.
    pub fn from_spectra(spectra: &StationSpectra, band: &FrequencyBand) -> FkResult<(Self, f64)> {
        let nstat = spectra.nstat();
        let nf = band.bin_count();
        if spectra.nbins() <= band.whigh {
            return Err(FkError::InvalidParameters(format!(
                "spectra hold {} bins, band needs bin {}",
                spectra.nbins(),
                band.whigh
            )));
        }

        let mut data = Array3::zeros((nf, nstat, nstat));
        let mut dpow = 0.0;
        for i in 0..nstat {
            for j in i..nstat {
                for n in 0..nf {
                    let bin = band.wlow + n;
                    data[[n, i, j]] = spectra.get(i, bin) * spectra.get(j, bin).conj();
                }
                if i != j {
                    for n in 0..nf {
                        data[[n, j, i]] = data[[n, i, j]].conj();
                    }
                } else {
                    dpow += data.slice(s![.., i, i]).sum().norm();
                }
            }
        }
        dpow *= nstat as f64;

        Ok((Self::new(data)?, dpow))
    }

    /// Replaces every per-bin matrix with the inverse of its diagonally
    /// loaded copy.
    pub fn invert(&mut self, loading: f64) -> FkResult<()> {
        for n in 0..self.nf() {
            let inverse = MatrixHelper::invert_loaded(self.data.slice(s![n, .., ..]), loading)?;
            self.data.slice_mut(s![n, .., ..]).assign(&inverse);
        }
        Ok(())
    }

    pub fn nf(&self) -> usize {
        self.data.dim().0
    }

    pub fn nstat(&self) -> usize {
        self.data.dim().1
    }

    pub fn bin(&self, n: usize) -> ArrayView2<'_, Complex64> {
        self.data.slice(s![n, .., ..])
    }

    pub fn view(&self) -> ArrayView3<'_, Complex64> {
        self.data.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn spectra() -> StationSpectra {
        let data = Array2::from_shape_fn((2, 9), |(s, b)| {
            Complex64::new(1.0 + s as f64, 0.5 * b as f64)
        });
        StationSpectra::new(data).unwrap()
    }

    #[test]
    fn cube_is_hermitian_with_trace_normaliser() {
        let band = FrequencyBand::from_passband(1.0, 3.0, 16.0, 16).unwrap();
        let (cube, dpow) = CovarianceCube::from_spectra(&spectra(), &band).unwrap();
        assert_eq!(cube.nf(), band.bin_count());
        assert_eq!(cube.nstat(), 2);
        for n in 0..cube.nf() {
            let r = cube.bin(n);
            assert!((r[[0, 1]] - r[[1, 0]].conj()).norm() < 1e-12);
            assert!(r[[0, 0]].im.abs() < 1e-12);
        }
        let expected: f64 = (0..2)
            .map(|i| {
                (0..cube.nf())
                    .map(|n| spectra().get(i, band.wlow + n).norm_sqr())
                    .sum::<f64>()
            })
            .sum::<f64>()
            * 2.0;
        assert!((dpow - expected).abs() < 1e-9);
    }

    #[test]
    fn short_spectra_are_rejected() {
        let band = FrequencyBand::from_passband(1.0, 7.0, 16.0, 16).unwrap();
        let data = Array2::from_elem((2, 5), Complex64::new(1.0, 0.0));
        let spectra = StationSpectra::new(data).unwrap();
        assert!(CovarianceCube::from_spectra(&spectra, &band).is_err());
    }

    #[test]
    fn invert_of_identity_is_identity() {
        let data = Array3::from_shape_fn((2, 3, 3), |(_, i, j)| {
            if i == j {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::new(0.0, 0.0)
            }
        });
        let mut cube = CovarianceCube::new(data.clone()).unwrap();
        cube.invert(0.0).unwrap();
        assert_eq!(cube.view(), data.view());
    }

    #[test]
    fn non_square_cube_is_rejected() {
        let data = Array3::zeros((1, 2, 3));
        assert!(CovarianceCube::new(data).is_err());
    }
}
