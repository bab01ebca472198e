//! Test data corpus construction
//!
//! Each operand gets a fixed list of values: boundary values first, then
//! special IEEE patterns when the case asks for them, then random fill.
//! The list length is a multiple of every supported lane count, so the
//! driver can slice it into whole vectors.

use half::f16;
use serde::Serialize;
use tracing::debug;
use vecprobe_simd::Lane;

use crate::element::{Element, FloatElement, IntElement};
use crate::prng::Mwc;
use crate::random::Random;

/// Default corpus length
pub const DEFAULT_LEN: usize = 1024;

/// Unary math cases use a long corpus, binary ones a short one since
/// they iterate the cross product.
pub const WIDE_UNARY_LEN: usize = 0x1000;
pub const WIDE_BINARY_LEN: usize = 0x100;

/// Magnitude of the random fill
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Range {
    /// Boundary values plus `rand * 100`
    Standard,
    /// Adds huge values up to `max`, then `max` and `-max`
    Wide { max: f64 },
}

/// What one case needs from its corpus
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorpusProfile {
    pub len: usize,
    /// Append signed zero, normal limits, neighbours of one, infinities and NaN
    pub specials: bool,
    pub range: Range,
    /// Add single precision values that overflow or underflow half precision
    pub half_probes: bool,
    /// Every bit pattern of a 16-bit or narrower lane, once
    pub exhaustive: bool,
}

impl Default for CorpusProfile {
    fn default() -> Self {
        Self {
            len: DEFAULT_LEN,
            specials: true,
            range: Range::Standard,
            half_probes: false,
            exhaustive: false,
        }
    }
}

impl CorpusProfile {
    /// Math function profile clipped to `max`
    pub fn wide(max: f64, binary: bool) -> Self {
        Self {
            len: if binary { WIDE_BINARY_LEN } else { WIDE_UNARY_LEN },
            range: Range::Wide { max },
            ..Self::default()
        }
    }

    /// Profile for conversions into half precision
    pub fn half_probes() -> Self {
        Self {
            half_probes: true,
            ..Self::default()
        }
    }

    pub fn exhaustive() -> Self {
        Self {
            exhaustive: true,
            ..Self::default()
        }
    }
}

const F32_SPECIALS: [u64; 8] = [
    0x8000_0000, // -0
    0x0080_0000, // smallest positive normal
    0x8080_0000, // largest negative normal
    0x3F7F_FFFF, // below 1.0
    0x3F80_0001, // above 1.0
    0x7F80_0000, // inf
    0xFF80_0000, // -inf
    0x7FF0_0000, // nan
];

const F64_SPECIALS: [u64; 8] = [
    0x8000_0000_0000_0000,
    0x0010_0000_0000_0000,
    0x8010_0000_0000_0000,
    0x3FEF_FFFF_FFFF_FFFF,
    0x3FF0_0000_0000_0001,
    0x7FF0_0000_0000_0000,
    0xFFF0_0000_0000_0000,
    0x7FFC_0000_0000_0000,
];

const F16_SPECIALS: [u16; 8] = [0x8000, 0x0400, 0x8400, 0x3BFF, 0x3C01, 0x7C00, 0xFC00, 0x7F00];

/// Single precision values that overflow, go subnormal or underflow when
/// converted to half precision.
const HALF_PROBES: [f32; 5] = [-65512.3058, 167_890.12, 5.17e-5, 5.943_03e-8, 1.234e-22];

/// Number of synthesized half values before raw bit patterns take over
const HALF_SYNTHESIZED: usize = 100;

/// Every bit pattern of a lane type up to 16 bits wide.
pub fn exhaustive<T: Lane>() -> Vec<T> {
    debug_assert!(T::BITS <= 16);
    (0..1u64 << T::BITS).map(T::from_raw).collect()
}

/// Integer corpus: a progression through zero, five values straddling the
/// signed overflow point (or the unsigned midpoint), then random fill.
pub fn integers<T: IntElement>(profile: &CorpusProfile, rng: &mut Mwc) -> Vec<T> {
    if profile.exhaustive && T::BITS <= 16 {
        return exhaustive();
    }
    let mut list: Vec<T> = (-2..4).map(T::from_i128).collect();
    let midpoint = (1i128 << (T::BITS - 1)) - 2;
    list.extend((0..5).map(|k| T::from_i128(midpoint + k)));
    fill(&mut list, profile.len, || T::random(rng));
    debug!(len = list.len(), element = %T::TYPE, "built integer corpus");
    list
}

/// Single and double precision corpus
pub fn floats<T: FloatElement>(profile: &CorpusProfile, rng: &mut Mwc) -> Vec<T> {
    let mut list: Vec<T> = (0..20i32)
        .map(|i| T::from_f64(f64::from(i - 4) * 0.25))
        .collect();
    let specials: &[u64] = if T::BITS == 32 { &F32_SPECIALS } else { &F64_SPECIALS };

    match profile.range {
        Range::Standard => {
            if profile.specials {
                list.extend(specials.iter().map(|&bits| T::from_raw(bits)));
            }
            if profile.half_probes && T::BITS == 32 {
                list.extend(HALF_PROBES.iter().map(|&x| T::from_f64(f64::from(x))));
            }
            if profile.half_probes {
                // Spread over the half precision range and beyond.
                fill(&mut list, profile.len, || {
                    T::from_f64((T::random(rng).to_f64() - 0.4) * 70000.0)
                });
            } else {
                fill(&mut list, profile.len, || T::from_f64(T::random(rng).to_f64() * 100.0));
            }
        }
        Range::Wide { max } => {
            list.extend(specials.iter().map(|&bits| T::from_raw(bits)));
            let max = T::from_f64(max).to_f64();
            let scale = if T::BITS == 32 { 88.0 } else { 709.0 };
            if max > 1000.0 {
                let start = list.len();
                while list.len() < start + 20 {
                    let r = T::random(rng).to_f64();
                    let x = T::from_f64(T::from_f64(r * scale).to_f64().exp()).to_f64();
                    if x > max {
                        continue;
                    }
                    let value = if list.len() & 4 != 0 { x } else { -x };
                    list.push(T::from_f64(value));
                }
            }
            list.push(T::from_f64(max));
            list.push(T::from_f64(-max));
            let scale = max.min(100.0);
            fill(&mut list, profile.len, || T::from_f64(T::random(rng).to_f64() * scale));
        }
    }
    debug!(len = list.len(), element = %T::TYPE, "built float corpus");
    list
}

/// Half precision corpus: progression, specials, synthesized values, then
/// raw random bit patterns that reach every exponent.
pub fn halves(profile: &CorpusProfile, rng: &mut Mwc) -> Vec<f16> {
    if profile.exhaustive {
        return exhaustive();
    }
    let mut list: Vec<f16> = (0..20i16)
        .map(|i| f16::from_f32(f32::from(i - 4) * 0.25))
        .collect();
    if profile.specials {
        list.extend(F16_SPECIALS.iter().map(|&bits| f16::from_bits(bits)));
    }
    fill(&mut list, HALF_SYNTHESIZED.min(profile.len), || f16::random(rng));
    fill(&mut list, profile.len, || f16::from_bits(u16::random(rng)));
    debug!(len = list.len(), "built half corpus");
    list
}

/// Boolean corpus
pub fn booleans(profile: &CorpusProfile, rng: &mut Mwc) -> Vec<bool> {
    let mut list: Vec<bool> = (-2..4).map(|i: i32| i != 0).collect();
    list.extend([true; 5]);
    fill(&mut list, profile.len, || bool::random(rng));
    list
}

/// Corpus for a given element type
pub fn build<T: Element>(profile: &CorpusProfile, rng: &mut Mwc) -> Vec<T> {
    T::corpus(profile, rng)
}

fn fill<T>(list: &mut Vec<T>, len: usize, mut next: impl FnMut() -> T) {
    while list.len() < len {
        list.push(next());
    }
    list.truncate(len);
}
