//! Correlation kernels for equally sized grayscale buffers.
//!
//! Both kernels accumulate exact integer moments, so the scalar and SIMD
//! paths produce bit-identical scores.

use crate::util::{ItemRecError, ItemRecResult};

/// Kernel trait for whole-image correlation scores.
pub trait Kernel {
    /// Returns the normalized cross-correlation coefficient of `template`
    /// and `query`.
    ///
    /// The buffers must have the same non-zero length. The score lies in
    /// `[-1, 1]`. A constant template scores `1.0` against any query; a
    /// constant query scores `0.0` against a non-constant template.
    fn ncc(template: &[u8], query: &[u8]) -> ItemRecResult<f32>;
}

/// Raw moments of a pair of buffers; `a` is the template, `b` the query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Moments {
    pub n: u64,
    pub sum_a: u64,
    pub sum_b: u64,
    pub sum_aa: u64,
    pub sum_bb: u64,
    pub sum_ab: u64,
}

impl Moments {
    /// Converts moments to a correlation coefficient.
    pub(crate) fn coefficient(&self) -> f32 {
        let n = i128::from(self.n);
        let sum_a = i128::from(self.sum_a);
        let sum_b = i128::from(self.sum_b);
        let cov = n * i128::from(self.sum_ab) - sum_a * sum_b;
        let var_a = n * i128::from(self.sum_aa) - sum_a * sum_a;
        let var_b = n * i128::from(self.sum_bb) - sum_b * sum_b;
        if var_a <= 0 {
            return 1.0;
        }
        if var_b <= 0 {
            return 0.0;
        }
        let denom = (var_a as f64).sqrt() * (var_b as f64).sqrt();
        let score = cov as f64 / denom;
        if score.is_finite() {
            score.clamp(-1.0, 1.0) as f32
        } else {
            0.0
        }
    }
}

pub(crate) fn check_lengths(a: &[u8], b: &[u8]) -> ItemRecResult<()> {
    if a.is_empty() {
        return Err(ItemRecError::InvalidInput("empty correlation buffer"));
    }
    if a.len() != b.len() {
        return Err(ItemRecError::LengthMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }
    Ok(())
}

pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(not(feature = "simd"))]
pub(crate) use scalar::NccScalar as DefaultKernel;
#[cfg(feature = "simd")]
pub(crate) use simd::NccSimd as DefaultKernel;
