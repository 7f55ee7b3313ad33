use ndarray::Array2;
use rayon::prelude::*;

use crate::array_interface::CovarianceCube;
use crate::math::matrix::MatrixHelper;
use crate::math::stats::StatsHelper;
use crate::prelude::{BeamformConfig, FkError, FkResult, GeneralizedEstimate, Method};
use crate::processing::scratch::Scratch;
use crate::processing::steering::SteeringTable;
use crate::telemetry::log::LogManager;

/// Covariance-based beamformer; Capon expects inverted covariances.
pub struct GeneralizedBeamformer {
    config: BeamformConfig,
    logger: LogManager,
}

impl GeneralizedBeamformer {
    pub fn new(config: BeamformConfig) -> Self {
        Self {
            config,
            logger: LogManager::new("fkcore::generalized"),
        }
    }

    pub fn config(&self) -> &BeamformConfig {
        &self.config
    }

    pub fn execute(
        &self,
        steer: &SteeringTable,
        covariance: &CovarianceCube,
        nf: usize,
        dpow: f64,
        method: Method,
    ) -> FkResult<GeneralizedEstimate> {
        let cfg = &self.config;
        cfg.validate()?;
        let (nstat, grdpts_x, grdpts_y) = (cfg.nstat, cfg.grdpts_x, cfg.grdpts_y);

        if nf == 0 {
            return Err(FkError::InvalidParameters("nf must be positive".into()));
        }
        if steer.dim() != (grdpts_x, grdpts_y, nf, nstat) {
            return Err(FkError::InvalidParameters(format!(
                "steering table is {:?}, expected ({}, {}, {}, {})",
                steer.dim(),
                grdpts_x,
                grdpts_y,
                nf,
                nstat
            )));
        }
        if covariance.nf() != nf || covariance.nstat() != nstat {
            return Err(FkError::InvalidParameters(format!(
                "covariance is {}x{}x{}, expected {}x{}x{}",
                covariance.nf(),
                covariance.nstat(),
                covariance.nstat(),
                nf,
                nstat,
                nstat
            )));
        }

        let dpow = match method {
            Method::Capon => 1.0,
            Method::Bf => dpow,
        };
        if !cfg.prewhiten && !(dpow.is_finite() && dpow > 0.0) {
            return Err(FkError::InvalidParameters(format!(
                "dpow must be positive, got {}",
                dpow
            )));
        }

        let cells = cfg.grid_cells()?;
        let mut abspow: Vec<f64> = Scratch::checkout("abspow", cells)?;
        let mut relpow: Vec<f64> = Scratch::checkout("relpow", cells)?;

        if cfg.prewhiten {
            let p_len = Scratch::element_count("p", &[cells, nf])?;
            let mut p: Vec<f64> = Scratch::checkout("p", p_len)?;
            let mut white: Vec<f64> = Scratch::checkout("white", nf)?;

            p.par_chunks_mut(nf)
                .enumerate()
                .try_for_each(|(cell, bins)| {
                    let (x, y) = StatsHelper::cell_coordinates(cell, grdpts_y);
                    for (n, slot) in bins.iter_mut().enumerate() {
                        *slot = Self::cell_power(steer, covariance, x, y, n, method)?;
                    }
                    Ok::<(), FkError>(())
                })?;

            for bins in p.chunks(nf) {
                for (peak, &value) in white.iter_mut().zip(bins) {
                    if value > *peak {
                        *peak = value;
                    }
                }
            }
            if let Some(n) = white.iter().position(|&peak| peak == 0.0) {
                self.logger.degenerate("generalized: empty frequency bin under prewhitening");
                return Err(FkError::NumericDegenerate(format!(
                    "no power in frequency bin {} to prewhiten by",
                    n
                )));
            }

            for (cell, bins) in p.chunks(nf).enumerate() {
                relpow[cell] = bins.iter().zip(&white).fold(0.0, |acc, (&value, &peak)| {
                    acc + value / (peak * nf as f64 * nstat as f64)
                });
                if method == Method::Bf {
                    abspow[cell] = bins.iter().fold(0.0, |acc, &value| acc + value);
                }
            }
        } else {
            abspow
                .par_iter_mut()
                .zip(relpow.par_iter_mut())
                .enumerate()
                .try_for_each(|(cell, (abs, rel))| {
                    let (x, y) = StatsHelper::cell_coordinates(cell, grdpts_y);
                    for n in 0..nf {
                        *abs += Self::cell_power(steer, covariance, x, y, n, method)?;
                    }
                    *rel = *abs / dpow;
                    Ok::<(), FkError>(())
                })?;
        }

        let (peak_cell, relmax) = StatsHelper::first_peak(&relpow, 0.0);
        let (_, absmax) = StatsHelper::first_peak(&abspow, 0.0);
        let (ix, iy) = StatsHelper::cell_coordinates(peak_cell, grdpts_y);

        self.logger.record(&format!(
            "{} over {}x{} grid, {} bins, peak ({}, {}) relmax {:.6e} absmax {:.6e}",
            method.label(),
            grdpts_x,
            grdpts_y,
            nf,
            ix,
            iy,
            relmax,
            absmax
        ));

        let relpow = Array2::from_shape_vec((grdpts_x, grdpts_y), relpow)
            .map_err(|e| FkError::InvalidParameters(e.to_string()))?;
        let abspow = Array2::from_shape_vec((grdpts_x, grdpts_y), abspow)
            .map_err(|e| FkError::InvalidParameters(e.to_string()))?;

        Ok(GeneralizedEstimate {
            ix,
            iy,
            relmax,
            absmax,
            relpow,
            abspow,
        })
    }

    #[inline]
    fn cell_power(
        steer: &SteeringTable,
        covariance: &CovarianceCube,
        x: usize,
        y: usize,
        n: usize,
        method: Method,
    ) -> FkResult<f64> {
        let q = MatrixHelper::steered_power(covariance.bin(n), steer.vector(x, y, n));
        let power = (q.re * q.re + q.im * q.im).sqrt();
        match method {
            Method::Bf => Ok(power),
            Method::Capon => {
                let inverse = 1.0 / power;
                if power == 0.0 || !power.is_finite() || !inverse.is_finite() {
                    return Err(FkError::NumericDegenerate(
                        "Capon quadratic form vanished".into(),
                    ));
                }
                Ok(inverse)
            }
        }
    }
}
