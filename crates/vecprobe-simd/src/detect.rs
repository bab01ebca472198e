//! CPU feature detection and instruction-set levels

use std::fmt;

/// Detected x86 CPU features. All flags are false on other architectures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct CpuFeatures {
    pub sse: bool,
    pub sse2: bool,
    pub sse3: bool,
    pub ssse3: bool,
    pub sse41: bool,
    pub sse42: bool,
    pub avx: bool,
    pub avx2: bool,
    pub fma: bool,
    pub bmi1: bool,
    pub bmi2: bool,
    pub f16c: bool,
    pub avx512f: bool,
    pub avx512vl: bool,
    pub avx512bw: bool,
    pub avx512dq: bool,
    pub avx512vbmi: bool,
    pub avx512vbmi2: bool,
}

impl CpuFeatures {
    /// Detect CPU features at runtime
    pub fn detect() -> Self {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            Self {
                sse: std::arch::is_x86_feature_detected!("sse"),
                sse2: std::arch::is_x86_feature_detected!("sse2"),
                sse3: std::arch::is_x86_feature_detected!("sse3"),
                ssse3: std::arch::is_x86_feature_detected!("ssse3"),
                sse41: std::arch::is_x86_feature_detected!("sse4.1"),
                sse42: std::arch::is_x86_feature_detected!("sse4.2"),
                avx: std::arch::is_x86_feature_detected!("avx"),
                avx2: std::arch::is_x86_feature_detected!("avx2"),
                fma: std::arch::is_x86_feature_detected!("fma"),
                bmi1: std::arch::is_x86_feature_detected!("bmi1"),
                bmi2: std::arch::is_x86_feature_detected!("bmi2"),
                f16c: std::arch::is_x86_feature_detected!("f16c"),
                avx512f: std::arch::is_x86_feature_detected!("avx512f"),
                avx512vl: std::arch::is_x86_feature_detected!("avx512vl"),
                avx512bw: std::arch::is_x86_feature_detected!("avx512bw"),
                avx512dq: std::arch::is_x86_feature_detected!("avx512dq"),
                avx512vbmi: std::arch::is_x86_feature_detected!("avx512vbmi"),
                avx512vbmi2: std::arch::is_x86_feature_detected!("avx512vbmi2"),
            }
        }

        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
        {
            Self::default()
        }
    }

    /// Features enabled at compile time for the current target.
    pub fn compiled() -> Self {
        Self {
            sse: cfg!(target_feature = "sse"),
            sse2: cfg!(target_feature = "sse2"),
            sse3: cfg!(target_feature = "sse3"),
            ssse3: cfg!(target_feature = "ssse3"),
            sse41: cfg!(target_feature = "sse4.1"),
            sse42: cfg!(target_feature = "sse4.2"),
            avx: cfg!(target_feature = "avx"),
            avx2: cfg!(target_feature = "avx2"),
            fma: cfg!(target_feature = "fma"),
            bmi1: cfg!(target_feature = "bmi1"),
            bmi2: cfg!(target_feature = "bmi2"),
            f16c: cfg!(target_feature = "f16c"),
            avx512f: cfg!(target_feature = "avx512f"),
            avx512vl: cfg!(target_feature = "avx512vl"),
            avx512bw: cfg!(target_feature = "avx512bw"),
            avx512dq: cfg!(target_feature = "avx512dq"),
            avx512vbmi: cfg!(target_feature = "avx512vbmi"),
            avx512vbmi2: cfg!(target_feature = "avx512vbmi2"),
        }
    }

    /// The highest instruction set whose prerequisites are all present.
    pub fn instruction_set(&self) -> InstructionSet {
        let ladder = [
            (self.sse, InstructionSet::Sse),
            (self.sse2, InstructionSet::Sse2),
            (self.sse3, InstructionSet::Sse3),
            (self.ssse3, InstructionSet::Ssse3),
            (self.sse41, InstructionSet::Sse41),
            (self.sse42, InstructionSet::Sse42),
            (self.avx, InstructionSet::Avx),
            (self.avx2 && self.fma && self.bmi1 && self.bmi2, InstructionSet::Avx2),
            (self.avx512f, InstructionSet::Avx512F),
            (
                self.avx512vl && self.avx512bw && self.avx512dq,
                InstructionSet::Avx512VlBwDq,
            ),
        ];
        ladder
            .iter()
            .take_while(|(present, _)| *present)
            .last()
            .map_or(InstructionSet::Generic, |&(_, level)| level)
    }
}

/// Instruction-set capability levels, ordered from least to most capable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InstructionSet {
    Generic,
    Sse,
    Sse2,
    Sse3,
    Ssse3,
    Sse41,
    Sse42,
    Avx,
    Avx2,
    Avx512F,
    Avx512VlBwDq,
}

impl InstructionSet {
    /// Numeric level, 0 to 10.
    pub fn level(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Sse => "SSE",
            Self::Sse2 => "SSE2",
            Self::Sse3 => "SSE3",
            Self::Ssse3 => "SSSE3",
            Self::Sse41 => "SSE4.1",
            Self::Sse42 => "SSE4.2",
            Self::Avx => "AVX",
            Self::Avx2 => "AVX2",
            Self::Avx512F => "AVX512F",
            Self::Avx512VlBwDq => "AVX512VL/BW/DQ",
        }
    }
}

impl fmt::Display for InstructionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.level(), self.name())
    }
}
