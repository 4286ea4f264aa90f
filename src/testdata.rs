// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Fixed inputs shared by the report suite and the tests.

pub mod rng_test {
    /// Seeds the distribution suite cycles through, in order.
    pub const STATIC_TEST_SEEDS: [u64; 8] = [
        0x0000_0000_00c0_ffee,
        0x9e37_79b9_7f4a_7c15,
        0xd1b5_4a32_d192_ed03,
        0x0123_4567_89ab_cdef,
        0xbf58_476d_1ce4_e5b9,
        0x94d0_49bb_1331_11eb,
        0x2545_f491_4f6c_dd1d,
        0x0000_0000_0000_0001,
    ];
}
