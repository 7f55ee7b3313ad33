use ndarray::{Array2, ArrayView1, ArrayView2};
use num_complex::Complex64;
use rustfft::num_traits::{One, Zero};

use crate::prelude::{FkError, FkResult};

pub struct MatrixHelper;

impl MatrixHelper {
    /// Steered quadratic form `sum_i e_i * (sum_j R_ij * conj(e_j))`.
    #[inline]
    pub fn steered_power(r: ArrayView2<Complex64>, e: ArrayView1<Complex64>) -> Complex64 {
        let mut ehr_e = Complex64::zero();
        for (e_i, row) in e.iter().zip(r.outer_iter()) {
            let mut r_e = Complex64::zero();
            for (r_ij, e_j) in row.iter().zip(e.iter()) {
                r_e += r_ij * e_j.conj();
            }
            ehr_e += e_i * r_e;
        }
        ehr_e
    }

    /// Inverse of `m + loading * trace(m) / n * I` by Gauss-Jordan elimination
    /// with partial pivoting.
    pub fn invert_loaded(m: ArrayView2<Complex64>, loading: f64) -> FkResult<Array2<Complex64>> {
        let (n, cols) = m.dim();
        if n != cols {
            return Err(FkError::InvalidParameters(format!(
                "cannot invert a {}x{} matrix",
                n, cols
            )));
        }

        let mut a = m.to_owned();
        let trace: f64 = (0..n).map(|i| a[[i, i]].re).sum::<f64>();
        let load = loading * trace.abs() / n.max(1) as f64;
        for i in 0..n {
            a[[i, i]] += load;
        }
        let mut inv = Array2::from_shape_fn((n, n), |(i, j)| {
            if i == j {
                Complex64::one()
            } else {
                Complex64::zero()
            }
        });

        for col in 0..n {
            let pivot = (col..n)
                .max_by(|&p, &q| a[[p, col]].norm().total_cmp(&a[[q, col]].norm()))
                .unwrap_or(col);
            let pivot_value = a[[pivot, col]];
            if pivot_value.norm() <= f64::EPSILON * load.abs().max(1.0) {
                return Err(FkError::NumericDegenerate(format!(
                    "matrix is singular at column {}",
                    col
                )));
            }
            if pivot != col {
                for k in 0..n {
                    a.swap([pivot, k], [col, k]);
                    inv.swap([pivot, k], [col, k]);
                }
            }
            let scale = Complex64::one() / pivot_value;
            for k in 0..n {
                a[[col, k]] *= scale;
                inv[[col, k]] *= scale;
            }
            for row in 0..n {
                if row == col {
                    continue;
                }
                let factor = a[[row, col]];
                if factor.is_zero() {
                    continue;
                }
                for k in 0..n {
                    let a_ck = a[[col, k]];
                    let inv_ck = inv[[col, k]];
                    a[[row, k]] -= factor * a_ck;
                    inv[[row, k]] -= factor * inv_ck;
                }
            }
        }
        Ok(inv)
    }
}
