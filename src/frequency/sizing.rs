// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Derives the counter table geometry from a memory budget and a key-count hint.

/// Smallest table, in bits, that a sketch ever allocates (1 MiB).
pub(crate) const MIN_TABLE_BITS: u64 = 1 << 23;

/// Largest table, in bits. Slot indices are taken from 32-bit digest halves.
pub(crate) const MAX_TABLE_BITS: u64 = 1 << 32;

/// Upper bound on the number of probes per key.
pub(crate) const MAX_HASHES: usize = 10;

/// Table geometry chosen for a sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Sizing {
    /// Total bits of counter storage, a power of two.
    pub table_bits: u64,
    /// Number of counters, a power of two.
    pub table_size: u64,
    /// Number of probes per key, in `[1, MAX_HASHES]`.
    pub num_hashes: u8,
}

impl Sizing {
    /// Computes the geometry for `expected_keys` distinct keys within
    /// `memory_budget_kib` kibibytes of counters of `counter_width` bits.
    ///
    /// The bit budget is the smaller of the memory budget and twice the bits
    /// needed to give every expected key its own counter, clamped to
    /// `[MIN_TABLE_BITS, MAX_TABLE_BITS]` and rounded down to a power of two.
    pub fn compute(expected_keys: u64, memory_budget_kib: u64, counter_width: u32) -> Self {
        debug_assert!(counter_width.is_power_of_two() && counter_width <= 64);

        let budget_bits = memory_budget_kib.saturating_mul(1024 * 8);
        let work_bits = expected_keys
            .saturating_mul(2)
            .saturating_mul(u64::from(counter_width));
        let target_bits = budget_bits
            .min(work_bits)
            .clamp(MIN_TABLE_BITS, MAX_TABLE_BITS);

        let table_bits = prev_power_of_two(target_bits);
        let table_size = table_bits / u64::from(counter_width);

        Sizing {
            table_bits,
            table_size,
            num_hashes: optimal_num_hashes(table_size, expected_keys),
        }
    }

    /// Number of 64-bit words backing the table.
    pub fn num_words(&self) -> usize {
        (self.table_bits / 64) as usize
    }
}

/// Largest power of two not greater than `n`. `n` must be positive.
fn prev_power_of_two(n: u64) -> u64 {
    debug_assert!(n > 0);
    1 << (63 - n.leading_zeros())
}

/// Formula: `k = round(ln(2) * m / n)`, clamped to `[1, MAX_HASHES]`,
/// where m = table_size, n = expected_keys (at least 1).
fn optimal_num_hashes(table_size: u64, expected_keys: u64) -> u8 {
    let m = table_size as f64;
    let n = expected_keys.max(1) as f64;

    let k = (std::f64::consts::LN_2 * m / n).round();

    (k as u64).clamp(1, MAX_HASHES as u64) as u8
}
