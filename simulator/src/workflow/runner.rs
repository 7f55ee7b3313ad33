use crate::generator::geometry::time_shift_table;
use crate::generator::profile::build_traces;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use fkcore::prelude::FkError;
use fkcore::telemetry::{MetricsRecorder, MetricsSnapshot};
use fkcore::{
    CorrelationBeamformer, CovarianceCube, FkEstimate, GeneralizedBeamformer, StationSpectra,
    SteeringTableBuilder,
};
use log::info;
use std::sync::Arc;

#[derive(Debug)]
pub struct WorkflowResult {
    pub estimate: FkEstimate,
    /// Cell of the generated source, for comparison with the estimate.
    pub source_cell: (usize, usize),
    pub grid: (usize, usize),
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let result = self.analyse();
        if let Err(err) = &result {
            if matches!(err.downcast_ref::<FkError>(), Some(FkError::NumericDegenerate(_))) {
                self.metrics.record_degenerate();
            }
            self.metrics.record_error();
        }
        result
    }

    fn analyse(&self) -> anyhow::Result<WorkflowResult> {
        let cfg = &self.config;
        let beam_config = cfg.to_beamform_config()?;
        let band = beam_config.band()?;
        let grid = cfg.grid()?;
        let tshift = time_shift_table(&cfg.stations, &grid)?;

        let traces = build_traces(&cfg.source, &cfg.stations).context("generating traces")?;
        let spectra = StationSpectra::from_traces(traces.view(), beam_config.nfft)?;
        info!(
            "{} stations, {} samples, band bins {}..={} at {:.4} Hz",
            cfg.stations.len(),
            beam_config.nsamp,
            band.wlow,
            band.whigh,
            band.df
        );

        let estimate = match cfg.method.generalized() {
            None => {
                let est = CorrelationBeamformer::new(beam_config.clone())
                    .execute(&spectra, &tshift)
                    .context("running bbfk")?;
                FkEstimate::new(cfg.method.label(), est.ix, est.iy, est.rel, est.abs)
            }
            Some(method) => {
                let nf = band.bin_count();
                let steer = SteeringTableBuilder::build(&tshift, nf, band.wlow, band.df)
                    .context("building steering table")?;
                let (mut covariance, dpow) = CovarianceCube::from_spectra(&spectra, &band)?;
                if method == fkcore::Method::Capon {
                    covariance
                        .invert(cfg.capon_loading)
                        .context("inverting covariance for Capon")?;
                }
                let est = GeneralizedBeamformer::new(beam_config.clone())
                    .execute(&steer, &covariance, nf, dpow, method)
                    .with_context(|| format!("running {}", method.label()))?;
                FkEstimate::new(cfg.method.label(), est.ix, est.iy, est.relmax, Some(est.absmax))
            }
        };

        let (sx, sy) = grid.cell_slowness(estimate.ix, estimate.iy);
        let estimate = estimate.with_slowness(sx, sy);
        self.metrics.record_run(grid.grdpts_x * grid.grdpts_y);
        info!(
            "{} peak at ({}, {}) slowness {:.3} s/km back azimuth {:.1} deg",
            estimate.method, estimate.ix, estimate.iy, estimate.slowness, estimate.backazimuth_deg
        );

        Ok(WorkflowResult {
            estimate,
            source_cell: grid.nearest_cell(cfg.source.slowness_x, cfg.source.slowness_y),
            grid: (grid.grdpts_x, grid.grdpts_y),
        })
    }
}
