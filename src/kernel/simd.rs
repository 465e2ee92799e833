//! SIMD-accelerated kernel using the `wide` crate.
//!
//! Processes 8 pixels at a time in `i32x8` lanes. Lane accumulators are
//! flushed into `u64` moments every `BLOCK_LANES` iterations, before a lane
//! can overflow (`4096 * 255 * 255 < i32::MAX`).

use crate::kernel::{check_lengths, Kernel, Moments};
use crate::util::ItemRecResult;
use wide::i32x8;

const LANES: usize = 8;
const BLOCK_LANES: usize = 4096;

#[inline]
fn load_u8x8_as_i32x8(slice: &[u8]) -> i32x8 {
    i32x8::from([
        slice[0] as i32,
        slice[1] as i32,
        slice[2] as i32,
        slice[3] as i32,
        slice[4] as i32,
        slice[5] as i32,
        slice[6] as i32,
        slice[7] as i32,
    ])
}

#[inline]
fn hsum(v: i32x8) -> u64 {
    v.to_array().iter().map(|&x| x as u64).sum()
}

/// SIMD normalized cross-correlation.
pub struct NccSimd;

impl NccSimd {
    pub(crate) fn moments(a: &[u8], b: &[u8]) -> Moments {
        let mut m = Moments {
            n: a.len() as u64,
            ..Moments::default()
        };
        let simd_end = a.len() / LANES * LANES;

        let mut start = 0;
        while start < simd_end {
            let end = (start + BLOCK_LANES * LANES).min(simd_end);
            let mut sum_a = i32x8::splat(0);
            let mut sum_b = i32x8::splat(0);
            let mut sum_aa = i32x8::splat(0);
            let mut sum_bb = i32x8::splat(0);
            let mut sum_ab = i32x8::splat(0);
            let mut i = start;
            while i < end {
                let va = load_u8x8_as_i32x8(&a[i..]);
                let vb = load_u8x8_as_i32x8(&b[i..]);
                sum_a += va;
                sum_b += vb;
                sum_aa += va * va;
                sum_bb += vb * vb;
                sum_ab += va * vb;
                i += LANES;
            }
            m.sum_a += hsum(sum_a);
            m.sum_b += hsum(sum_b);
            m.sum_aa += hsum(sum_aa);
            m.sum_bb += hsum(sum_bb);
            m.sum_ab += hsum(sum_ab);
            start = end;
        }

        for (&va, &vb) in a[simd_end..].iter().zip(b[simd_end..].iter()) {
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

impl Kernel for NccSimd {
    fn ncc(a: &[u8], b: &[u8]) -> ItemRecResult<f32> {
        check_lengths(a, b)?;
        Ok(Self::moments(a, b).coefficient())
    }
}
