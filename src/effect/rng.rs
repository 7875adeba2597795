/// Small deterministic pseudo-random source for effects.
///
/// SplitMix64 sequence folded down to 32 bits. Each effect instance owns one,
/// so switching effects also restarts the sequence.
#[derive(Debug, Clone)]
pub struct EffectRng {
    state: u64,
}

impl EffectRng {
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// SplitMix64 finalizer
    #[inline]
    pub const fn mix(x: u64) -> u64 {
        let mut z = x;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        (Self::mix(self.state) >> 32) as u32
    }

    /// Uniform value in `[0, 1)`
    pub fn next_unit(&mut self) -> f32 {
        // 24 bits fit the f32 mantissa exactly
        (self.next_u32() >> 8) as f32 / 16_777_216.0
    }

    /// Uniform value in `0..n`, or 0 when `n` is 0
    pub fn below(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.next_u32() % n
    }
}
