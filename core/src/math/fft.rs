use num_complex::Complex64;
use rustfft::{num_traits::Zero, Fft, FftPlanner};

/// Helper that wraps the `rustfft` planner for reuse across stations.
pub struct FftHelper {
    fft: std::sync::Arc<dyn Fft<f64>>,
    buffer: Vec<Complex64>,
    scratch: Vec<Complex64>,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let scratch = vec![Complex64::zero(); fft.get_inplace_scratch_len()];
        Self {
            fft,
            buffer: vec![Complex64::zero(); size],
            scratch,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// One-sided spectrum (`len / 2 + 1` bins) of a real trace, zero padded
    /// or truncated to the transform length.
    pub fn one_sided(&mut self, input: &[f64]) -> Vec<Complex64> {
        let size = self.buffer.len();
        for (slot, value) in self
            .buffer
            .iter_mut()
            .zip(input.iter().copied().chain(std::iter::repeat(0.0)))
        {
            *slot = Complex64::new(value, 0.0);
        }
        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);
        self.buffer[..size / 2 + 1].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_sided_returns_half_plus_one_bins() {
        let mut helper = FftHelper::new(8);
        let output = helper.one_sided(&[1.0, 0.0, -1.0, 0.0]);
        assert_eq!(output.len(), 5);
        // X[k] = 1 - exp(-i*pi*k/2) for the zero padded input
        assert!(output[0].norm() < 1e-12);
        assert!((output[2] - Complex64::new(2.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn pure_tone_lands_in_its_bin() {
        let n = 32;
        let samples: Vec<f64> = (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * 4.0 * i as f64 / n as f64).cos())
            .collect();
        let mut helper = FftHelper::new(n);
        let output = helper.one_sided(&samples);
        assert!((output[4].re - n as f64 / 2.0).abs() < 1e-9);
        assert!(output[3].norm() < 1e-9);
    }
}
