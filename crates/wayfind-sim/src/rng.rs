use serde::{Deserialize, Serialize};

/// Seeded LCG used for every random choice the simulator makes.
///
/// The same seed yields the same graphs and mutations on every platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    #[must_use]
    pub const fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        // The low bits of an LCG cycle quickly; hand out the high half.
        self.state >> 16
    }

    /// Next value in `[0, upper_exclusive)`; `0` when the bound is `0`.
    #[must_use]
    pub const fn next_bounded(&mut self, upper_exclusive: u64) -> u64 {
        if upper_exclusive == 0 {
            return 0;
        }
        self.next_u64() % upper_exclusive
    }

    /// Next index into a collection of `len` items; `0` when `len` is `0`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn next_index(&mut self, len: usize) -> usize {
        self.next_bounded(len as u64) as usize
    }

    /// Integer-valued edge weight in `[0, max_weight]`.
    ///
    /// Integer values keep every path sum exact, so distances can be compared
    /// with `==` against a reference.
    #[must_use]
    pub fn next_weight(&mut self, max_weight: u32) -> f64 {
        #[allow(clippy::cast_possible_truncation)]
        let raw = self.next_bounded(u64::from(max_weight) + 1) as u32;
        f64::from(raw)
    }

    /// Bernoulli trial with integer percent.
    #[must_use]
    pub const fn hit_rate_percent(&mut self, percent: u8) -> bool {
        if percent == 0 {
            return false;
        }
        if percent >= 100 {
            return true;
        }
        self.next_bounded(100) < percent as u64
    }
}
