use serde::{Deserialize, Serialize};

use crate::prelude::{FkError, FkResult};

/// Usable discrete frequency bins for a requested passband.
///
/// Bin 0 (the offset) is never used and the bin next to Nyquist is dropped.
/// The arithmetic is single precision so the bin edges agree with the
/// correlation beamformer bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBand {
    pub df: f32,
    pub wlow: usize,
    pub whigh: usize,
}

impl FrequencyBand {
    pub fn from_passband(flow: f64, fhigh: f64, digfreq: f64, nfft: usize) -> FkResult<Self> {
        if !digfreq.is_finite() || digfreq <= 0.0 {
            return Err(FkError::InvalidParameters(format!(
                "sampling rate must be positive, got {}",
                digfreq
            )));
        }
        if !flow.is_finite() || !fhigh.is_finite() {
            return Err(FkError::InvalidParameters(
                "passband edges must be finite".into(),
            ));
        }
        if flow > fhigh {
            return Err(FkError::InvalidParameters(format!(
                "flow {} exceeds fhigh {}",
                flow, fhigh
            )));
        }
        if nfft < 4 {
            return Err(FkError::InvalidParameters(format!(
                "nfft {} leaves no bin between offset and Nyquist",
                nfft
            )));
        }

        let df = digfreq as f32 / nfft as f32;
        let wlow = round_half_up(flow as f32 / df).max(1);
        let nyquist_guard = (nfft / 2 - 1) as i64;
        let whigh = round_half_up(fhigh as f32 / df).min(nyquist_guard);
        if whigh < wlow {
            return Err(FkError::InvalidParameters(format!(
                "passband [{}, {}] Hz maps to empty bin range [{}, {}]",
                flow, fhigh, wlow, whigh
            )));
        }

        Ok(Self {
            df,
            wlow: wlow as usize,
            whigh: whigh as usize,
        })
    }

    /// `whigh - wlow`; the band holds `span() + 1` bins.
    pub fn span(&self) -> usize {
        self.whigh - self.wlow
    }

    pub fn bin_count(&self) -> usize {
        self.span() + 1
    }

    /// Absolute frequency in Hz of band bin `w`.
    pub fn frequency(&self, w: usize) -> f64 {
        self.df as f64 * (self.wlow + w) as f64
    }
}

// Adds one half, then truncates toward zero.
fn round_half_up(value: f32) -> i64 {
    (value as f64 + 0.5) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_flow_still_skips_offset_bin() {
        let band = FrequencyBand::from_passband(0.0, 2.0, 20.0, 100).unwrap();
        assert_eq!(band.wlow, 1);
        assert_eq!(band.whigh, 10);
        assert_eq!(band.span(), 9);
    }

    #[test]
    fn fhigh_above_nyquist_is_clamped() {
        let band = FrequencyBand::from_passband(1.0, 50.0, 20.0, 64).unwrap();
        assert_eq!(band.whigh, 31);
        assert_eq!(band.wlow, 3);
    }

    #[test]
    fn rounding_is_half_up() {
        // df = 0.25 Hz: 0.3 / 0.25 = 1.2 -> 1, 0.9 / 0.25 = 3.6 -> 4
        let band = FrequencyBand::from_passband(0.3, 0.9, 16.0, 64).unwrap();
        assert_eq!((band.wlow, band.whigh), (1, 4));
        assert_eq!(band.bin_count(), 4);
        assert!((band.frequency(1) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn inverted_passband_is_rejected() {
        let err = FrequencyBand::from_passband(5.0, 1.0, 20.0, 64).unwrap_err();
        assert!(matches!(err, FkError::InvalidParameters(_)));
    }

    #[test]
    fn passband_above_usable_bins_is_rejected() {
        assert!(FrequencyBand::from_passband(10.0, 10.0, 20.0, 64).is_err());
        assert!(FrequencyBand::from_passband(1.0, 2.0, 20.0, 2).is_err());
        assert!(FrequencyBand::from_passband(1.0, 2.0, 0.0, 64).is_err());
    }
}
