//! Scalar reference kernel.

use crate::kernel::{check_lengths, Kernel, Moments};
use crate::util::ItemRecResult;

/// Scalar normalized cross-correlation.
pub struct NccScalar;

impl NccScalar {
    pub(crate) fn moments(a: &[u8], b: &[u8]) -> Moments {
        let mut m = Moments {
            n: a.len() as u64,
            ..Moments::default()
        };
        for (&va, &vb) in a.iter().zip(b.iter()) {
            let va = u64::from(va);
            let vb = u64::from(vb);
            m.sum_a += va;
            m.sum_b += vb;
            m.sum_aa += va * va;
            m.sum_bb += vb * vb;
            m.sum_ab += va * vb;
        }
        m
    }
}

impl Kernel for NccScalar {
    fn ncc(a: &[u8], b: &[u8]) -> ItemRecResult<f32> {
        check_lengths(a, b)?;
        Ok(Self::moments(a, b).coefficient())
    }
}
