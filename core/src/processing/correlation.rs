use std::f64::consts::PI;

use ndarray::Array2;
use rayon::prelude::*;

use crate::array_interface::{StationSpectra, TimeShiftTable};
use crate::math::stats::StatsHelper;
use crate::prelude::{BeamformConfig, CorrelationEstimate, FkError, FkResult};
use crate::processing::scratch::Scratch;
use crate::telemetry::log::LogManager;

/// Time-shift correlation ("bbfk") beamformer over a slowness grid.
pub struct CorrelationBeamformer {
    config: BeamformConfig,
    logger: LogManager,
}

impl CorrelationBeamformer {
    pub fn new(config: BeamformConfig) -> Self {
        Self {
            config,
            logger: LogManager::new("fkcore::bbfk"),
        }
    }

    pub fn config(&self) -> &BeamformConfig {
        &self.config
    }

    pub fn execute(
        &self,
        spectra: &StationSpectra,
        tshift: &TimeShiftTable,
    ) -> FkResult<CorrelationEstimate> {
        let cfg = &self.config;
        let band = cfg.validate()?;
        let (nstat, grdpts_x, grdpts_y, nfft) = (cfg.nstat, cfg.grdpts_x, cfg.grdpts_y, cfg.nfft);

        if spectra.nstat() != nstat || spectra.nbins() != nfft / 2 + 1 {
            return Err(FkError::InvalidParameters(format!(
                "spectra are {}x{}, expected {}x{}",
                spectra.nstat(),
                spectra.nbins(),
                nstat,
                nfft / 2 + 1
            )));
        }
        tshift.expect_dim(nstat, grdpts_x, grdpts_y)?;

        let nf = band.span();
        let wlow = band.wlow;
        let df = band.df;
        let cells = cfg.grid_cells()?;
        let digfreq = cfg.digfreq as f32;

        let mut denom = 0.0f32;
        if !cfg.prewhiten {
            for w in 0..=nf {
                let mut dpow = 0.0f32;
                for j in 0..nstat {
                    dpow += spectra.get(j, wlow + w).norm_sqr() as f32;
                }
                denom += dpow;
            }
        }
        denom *= nstat as f32;
        if !cfg.prewhiten && denom == 0.0 {
            self.logger.degenerate("bbfk: zero band power");
            return Err(FkError::NumericDegenerate(
                "band power is zero, nothing to normalise by".into(),
            ));
        }

        let pow_len = Scratch::element_count("pow", &[nf + 1, cells])?;
        let mut pow: Vec<f32> = Scratch::checkout("pow", pow_len)?;
        let mut maxpow: Vec<f32> = Scratch::checkout("maxpow", nf + 1)?;
        let mut nomin: Vec<f32> = Scratch::checkout("nomin", cells)?;

        let trig = cfg.trig;
        pow.par_chunks_mut(cells)
            .zip(maxpow.par_iter_mut())
            .enumerate()
            .for_each(|(w, (map, peak))| {
                let omega = (2.0 * PI * df as f64 * (w + wlow) as f32 as f64) as f32;
                for (cell, slot) in map.iter_mut().enumerate() {
                    let (k, l) = StatsHelper::cell_coordinates(cell, grdpts_y);
                    // single-precision terms, double-precision sum
                    let (mut sum_re, mut sum_im) = (0.0f64, 0.0f64);
                    for j in 0..nstat {
                        let wtau = omega * tshift.get(j, k, l);
                        let (sin_wtau, cos_wtau) = trig.sin_cos(wtau);
                        let (sin_wtau, cos_wtau) = (sin_wtau as f64, cos_wtau as f64);
                        let value = spectra.get(j, wlow + w);
                        let (re, im) = (value.re, value.im);
                        sum_re += (re * cos_wtau - im * sin_wtau) as f32 as f64;
                        sum_im += (im * cos_wtau + re * sin_wtau) as f32 as f64;
                    }
                    *slot = (sum_re * sum_re + sum_im * sum_im) as f32;
                }
                *peak = StatsHelper::last_peak(map, 0.0);
            });

        if cfg.prewhiten {
            if let Some(w) = maxpow.iter().position(|&peak| peak == 0.0) {
                self.logger.degenerate("bbfk: empty frequency bin under prewhitening");
                return Err(FkError::NumericDegenerate(format!(
                    "no power at band bin {} to prewhiten by",
                    wlow + w
                )));
            }
        }

        for (cell, acc) in nomin.iter_mut().enumerate() {
            for w in 0..=nf {
                let value = pow[w * cells + cell];
                if cfg.prewhiten {
                    *acc += value / maxpow[w];
                } else {
                    *acc += value / denom;
                }
            }
        }
        let (peak_cell, maxinmap) = StatsHelper::first_peak(&nomin, 0.0f32);
        let (ix, iy) = StatsHelper::cell_coordinates(peak_cell, grdpts_y);

        let bins = (nf + 1) as f32;
        let mut rel = maxinmap as f64;
        let mut abs = None;
        if cfg.prewhiten {
            rel /= (bins * nfft as f32 * digfreq) as f64;
        } else {
            let mut absval = (maxinmap * denom / bins) as f64;
            absval /= (nstat * nstat) as f64;
            absval /= nfft as f64;
            absval /= digfreq as f64;
            abs = Some(absval as f32 as f64);
        }

        self.logger.record(&format!(
            "bins {}..={} over {}x{} grid, peak ({}, {}) rel {:.6e}",
            wlow, band.whigh, grdpts_x, grdpts_y, ix, iy, rel
        ));

        let power_map = Array2::from_shape_vec((grdpts_x, grdpts_y), nomin)
            .map_err(|e| FkError::InvalidParameters(e.to_string()))?;

        Ok(CorrelationEstimate {
            ix,
            iy,
            rel,
            abs,
            band,
            power_map,
        })
    }
}
