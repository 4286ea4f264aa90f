// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! User interaction strings are stored here.

pub const FAIL_STR: &str = "FAILED!!";
pub const PASS_STR: &str = "PASSED";

pub const TEST_NAMES: [&str; 17] = [
    "Int",
    "Int32",
    "Int64",
    "Uint",
    "Uint32",
    "Uint64",
    "IntBtwn",
    "Int32Btwn",
    "Int64Btwn",
    "UintBtwn",
    "Uint32Btwn",
    "Uint64Btwn",
    "WideBtwn",
    "Float32",
    "Float64",
    "Bool",
    "Int64Wide",
];
