pub mod band;
pub mod fft;
pub mod matrix;
pub mod stats;
pub mod trig;

pub use band::FrequencyBand;
pub use fft::FftHelper;
pub use matrix::MatrixHelper;
pub use stats::StatsHelper;
pub use trig::{SineTable, TrigMode};
