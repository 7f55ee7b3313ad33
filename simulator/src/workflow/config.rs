use anyhow::Context;
use fkcore::prelude::{BeamformConfig, Method, TrigMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::generator::geometry::{SlownessGrid, Station};
use crate::generator::profile::GeneratorConfig;

/// Which beamformer the workflow runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMethod {
    Bbfk,
    Bf,
    Capon,
}

impl AnalysisMethod {
    pub fn label(self) -> &'static str {
        match self {
            AnalysisMethod::Bbfk => "bbfk",
            AnalysisMethod::Bf => "bf",
            AnalysisMethod::Capon => "capon",
        }
    }

    /// Estimator for the covariance path; `None` for `bbfk`.
    pub fn generalized(self) -> Option<Method> {
        match self {
            AnalysisMethod::Bbfk => None,
            AnalysisMethod::Bf => Some(Method::Bf),
            AnalysisMethod::Capon => Some(Method::Capon),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub stations: Vec<Station>,
    /// Half-width of the square slowness grid in s/km.
    pub slowness_max: f64,
    pub slowness_step: f64,
    pub flow: f64,
    pub fhigh: f64,
    /// Transform length; defaults to the record length.
    #[serde(default)]
    pub nfft: Option<usize>,
    pub method: AnalysisMethod,
    #[serde(default)]
    pub prewhiten: bool,
    #[serde(default)]
    pub trig: TrigMode,
    /// Relative diagonal loading applied before inverting for Capon.
    #[serde(default = "default_capon_loading")]
    pub capon_loading: f64,
    #[serde(default)]
    pub source: GeneratorConfig,
}

fn default_capon_loading() -> f64 {
    0.01
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Five-station array with a 0.3 s/km grid and a 1-3 Hz passband.
    pub fn from_args(method: AnalysisMethod, prewhiten: bool, exact_trig: bool) -> Self {
        Self {
            stations: vec![
                Station { x: 0.0, y: 0.0 },
                Station { x: 0.6, y: 0.1 },
                Station { x: -0.4, y: 0.5 },
                Station { x: 0.1, y: -0.7 },
                Station { x: -0.5, y: -0.3 },
            ],
            slowness_max: 0.3,
            slowness_step: 0.1,
            flow: 1.0,
            fhigh: 3.0,
            nfft: None,
            method,
            prewhiten,
            trig: if exact_trig {
                TrigMode::Exact
            } else {
                TrigMode::Table
            },
            capon_loading: default_capon_loading(),
            source: GeneratorConfig::default(),
        }
    }

    pub fn grid(&self) -> anyhow::Result<SlownessGrid> {
        SlownessGrid::symmetric(self.slowness_max, self.slowness_step)
    }

    pub fn to_beamform_config(&self) -> anyhow::Result<BeamformConfig> {
        let grid = self.grid()?;
        let config = BeamformConfig {
            flow: self.flow,
            fhigh: self.fhigh,
            digfreq: self.source.digfreq,
            nsamp: self.source.nsamp,
            nstat: self.stations.len(),
            grdpts_x: grid.grdpts_x,
            grdpts_y: grid.grdpts_y,
            nfft: self.nfft.unwrap_or(self.source.nsamp),
            prewhiten: self.prewhiten,
            trig: self.trig,
        };
        config.validate().context("validating beamformer parameters")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_beamform_config() {
        let cfg = WorkflowConfig::from_args(AnalysisMethod::Capon, true, true);
        let bf = cfg.to_beamform_config().unwrap();
        assert_eq!((bf.grdpts_x, bf.grdpts_y), (7, 7));
        assert_eq!(bf.nstat, 5);
        assert_eq!(bf.nfft, cfg.source.nsamp);
        assert_eq!(bf.trig, TrigMode::Exact);
        assert!(bf.prewhiten);
        assert_eq!(cfg.method.generalized(), Some(Method::Capon));
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"stations:\n  - {x: 0.0, y: 0.0}\n  - {x: 1.0, y: 0.5}\n\
slowness_max: 0.4\nslowness_step: 0.05\nflow: 0.5\nfhigh: 2.0\n\
method: bbfk\nsource:\n  nsamp: 128\n  seed: 7\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.stations.len(), 2);
        assert_eq!(cfg.method, AnalysisMethod::Bbfk);
        assert_eq!(cfg.trig, TrigMode::Table);
        assert_eq!(cfg.capon_loading, 0.01);
        assert_eq!(cfg.source.nsamp, 128);
        assert_eq!(cfg.source.digfreq, 20.0);
        assert_eq!(cfg.grid().unwrap().grdpts_x, 17);
    }

    #[test]
    fn empty_passband_is_rejected() {
        let mut cfg = WorkflowConfig::from_args(AnalysisMethod::Bf, false, false);
        cfg.flow = 4.0;
        cfg.fhigh = 2.0;
        assert!(cfg.to_beamform_config().is_err());
    }
}
