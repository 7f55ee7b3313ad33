use anyhow::{bail, Context};
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::generator::geometry::Station;

/// Configuration for a synthetic plane-wave recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub nsamp: usize,
    pub digfreq: f64,
    /// Lowest and highest signal frequency in Hz.
    pub fmin: f64,
    pub fmax: f64,
    /// Source slowness in s/km.
    pub slowness_x: f64,
    pub slowness_y: f64,
    pub noise: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            nsamp: 256,
            digfreq: 20.0,
            fmin: 1.0,
            fmax: 3.0,
            slowness_x: 0.1,
            slowness_y: -0.2,
            noise: 0.05,
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    /// Frequencies of the record's transform bins inside `[fmin, fmax]`.
    fn signal_bins(&self) -> Vec<f64> {
        let df = self.digfreq / self.nsamp as f64;
        (1..self.nsamp / 2)
            .map(|k| k as f64 * df)
            .filter(|&f| f >= self.fmin && f <= self.fmax)
            .collect()
    }
}

/// Traces (`nstat x nsamp`): unit cosines on the record's own bins, delayed
/// by `τ = sx·x + sy·y`, plus uniform noise.
pub fn build_traces(config: &GeneratorConfig, stations: &[Station]) -> anyhow::Result<Array2<f64>> {
    if config.nsamp < 4 {
        bail!("need at least 4 samples, got {}", config.nsamp);
    }
    if !(config.digfreq.is_finite() && config.digfreq > 0.0) {
        bail!("sampling rate must be positive, got {}", config.digfreq);
    }
    if stations.is_empty() {
        bail!("array needs at least one station");
    }
    stations
        .len()
        .checked_mul(config.nsamp)
        .context("overflow computing sample count for generator")?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let components: Vec<(f64, f64)> = config
        .signal_bins()
        .into_iter()
        .map(|f| (f, rng.gen_range(0.0..2.0 * PI)))
        .collect();
    if components.is_empty() {
        bail!(
            "no transform bin between {} and {} Hz at {} Hz over {} samples",
            config.fmin,
            config.fmax,
            config.digfreq,
            config.nsamp
        );
    }

    let mut traces = Array2::zeros((stations.len(), config.nsamp));
    for (station, mut row) in stations.iter().zip(traces.outer_iter_mut()) {
        let tau = config.slowness_x * station.x + config.slowness_y * station.y;
        for (i, slot) in row.iter_mut().enumerate() {
            let t = i as f64 / config.digfreq - tau;
            let wave: f64 = components
                .iter()
                .map(|&(f, phase)| (2.0 * PI * f * t + phase).cos())
                .sum();
            let jitter = if config.noise > 0.0 {
                rng.gen_range(-config.noise..config.noise)
            } else {
                0.0
            };
            *slot = wave + jitter;
        }
    }

    Ok(traces)
}
