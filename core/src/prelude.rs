use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::math::band::FrequencyBand;
pub use crate::math::trig::TrigMode;

/// Shared configuration for both beamformers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamformConfig {
    pub flow: f64,
    pub fhigh: f64,
    pub digfreq: f64,
    pub nsamp: usize,
    pub nstat: usize,
    pub grdpts_x: usize,
    pub grdpts_y: usize,
    pub nfft: usize,
    pub prewhiten: bool,
    #[serde(default)]
    pub trig: TrigMode,
}

impl BeamformConfig {
    /// Checks the scalar parameters and returns the resolved passband.
    pub fn validate(&self) -> FkResult<FrequencyBand> {
        if self.nstat == 0 {
            return Err(FkError::InvalidParameters("no stations configured".into()));
        }
        if self.grdpts_x == 0 || self.grdpts_y == 0 {
            return Err(FkError::InvalidParameters(format!(
                "empty slowness grid ({}x{})",
                self.grdpts_x, self.grdpts_y
            )));
        }
        if self.nsamp == 0 {
            return Err(FkError::InvalidParameters("nsamp must be positive".into()));
        }
        self.band()
    }

    pub fn band(&self) -> FkResult<FrequencyBand> {
        FrequencyBand::from_passband(self.flow, self.fhigh, self.digfreq, self.nfft)
    }

    /// Number of grid cells, guarded against overflow.
    pub fn grid_cells(&self) -> FkResult<usize> {
        self.grdpts_x
            .checked_mul(self.grdpts_y)
            .ok_or(FkError::AllocationFailed {
                what: "grid",
                len: usize::MAX,
            })
    }
}

/// Power estimator used by the generalized beamformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Conventional delay-and-sum, `|e^H R e|`.
    Bf,
    /// Capon/MVDR, the reciprocal of the steered quadratic form.
    Capon,
}

impl Method {
    pub fn label(self) -> &'static str {
        match self {
            Method::Bf => "bf",
            Method::Capon => "capon",
        }
    }
}

/// Output of [`crate::processing::CorrelationBeamformer`].
#[derive(Debug, Clone)]
pub struct CorrelationEstimate {
    pub ix: usize,
    pub iy: usize,
    pub rel: f64,
    /// Absolute power, only available without prewhitening.
    pub abs: Option<f64>,
    pub band: FrequencyBand,
    /// Accumulated nominator map the peak was picked from.
    pub power_map: Array2<f32>,
}

/// Output of [`crate::processing::GeneralizedBeamformer`].
#[derive(Debug, Clone)]
pub struct GeneralizedEstimate {
    pub ix: usize,
    pub iy: usize,
    pub relmax: f64,
    pub absmax: f64,
    pub relpow: Array2<f64>,
    pub abspow: Array2<f64>,
}

/// Common error type for the beamforming kernels.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FkError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("allocation failed for {what} ({len} elements)")]
    AllocationFailed { what: &'static str, len: usize },
    #[error("numeric degeneracy: {0}")]
    NumericDegenerate(String),
}

pub type FkResult<T> = Result<T, FkError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BeamformConfig {
        BeamformConfig {
            flow: 1.0,
            fhigh: 4.0,
            digfreq: 20.0,
            nsamp: 64,
            nstat: 3,
            grdpts_x: 5,
            grdpts_y: 5,
            nfft: 64,
            prewhiten: false,
            trig: TrigMode::Table,
        }
    }

    #[test]
    fn validate_rejects_empty_grid() {
        let cfg = BeamformConfig {
            grdpts_y: 0,
            ..config()
        };
        assert!(matches!(
            cfg.validate(),
            Err(FkError::InvalidParameters(_))
        ));
    }

    #[test]
    fn validate_rejects_missing_stations() {
        let cfg = BeamformConfig {
            nstat: 0,
            ..config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn trig_mode_defaults_to_table_when_omitted() {
        let json = r#"{"flow":1.0,"fhigh":4.0,"digfreq":20.0,"nsamp":64,"nstat":3,
            "grdpts_x":5,"grdpts_y":5,"nfft":64,"prewhiten":true}"#;
        let cfg: BeamformConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.trig, TrigMode::Table);
        assert!(cfg.prewhiten);
    }
}
