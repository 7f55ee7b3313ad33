pub mod covariance;
pub mod estimate;
pub mod spectra;
pub mod tshift;

pub use covariance::CovarianceCube;
pub use estimate::FkEstimate;
pub use spectra::StationSpectra;
pub use tshift::TimeShiftTable;
