//! Frequency-wavenumber beamforming kernels for seismic arrays.

pub mod array_interface;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use array_interface::{CovarianceCube, FkEstimate, StationSpectra, TimeShiftTable};
pub use prelude::{
    BeamformConfig, CorrelationEstimate, FkError, FkResult, GeneralizedEstimate, Method, TrigMode,
};
pub use processing::{CorrelationBeamformer, GeneralizedBeamformer, SteeringTable, SteeringTableBuilder};
