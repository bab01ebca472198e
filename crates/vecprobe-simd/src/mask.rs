//! Boolean vector reductions and bit packing

use crate::vector::Mask;

impl<const N: usize> Mask<N> {
    pub fn horizontal_and(self) -> bool {
        self.0.iter().all(|&b| b)
    }

    pub fn horizontal_or(self) -> bool {
        self.0.iter().any(|&b| b)
    }

    /// Number of set lanes.
    #[allow(clippy::cast_possible_truncation)]
    pub fn horizontal_count(self) -> u32 {
        self.0.iter().filter(|&&b| b).count() as u32
    }

    /// Index of the first set lane, or -1 if none is set.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn horizontal_find_first(self) -> i32 {
        self.0.iter().position(|&b| b).map_or(-1, |n| n as i32)
    }

    /// Pack the lanes into an integer, lane 0 in bit 0.
    pub fn to_bits(self) -> u64 {
        self.0
            .iter()
            .enumerate()
            .fold(0u64, |acc, (n, &b)| acc | (u64::from(b) << n))
    }

    /// Unpack the low `N` bits of `bits`, bit 0 into lane 0.
    pub fn load_bits(bits: u64) -> Self {
        let mut lanes = [false; N];
        for (n, lane) in lanes.iter_mut().enumerate() {
            *lane = (bits >> n) & 1 == 1;
        }
        Self::from_array(lanes)
    }
}
