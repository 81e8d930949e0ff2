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

use std::sync::OnceLock;

use super::sizing::Sizing;
use super::sketch::FrequencySketch;
use crate::common::random::RandomSource;
use crate::common::random::XorShift64;
use crate::error::Error;

const DEFAULT_MEMORY_BUDGET_KIB: i64 = 1024;
const DEFAULT_COUNTER_WIDTH: u32 = 4;

/// Seed shared by every sketch of this process that does not set its own.
fn process_seed() -> u64 {
    static SEED: OnceLock<u64> = OnceLock::new();
    *SEED.get_or_init(|| XorShift64::default().next_u64())
}

/// Builder for creating [`FrequencySketch`] instances.
///
/// Every parameter has a default; [`build()`](Self::build) validates them all
/// before allocating.
#[derive(Debug, Clone)]
pub struct FrequencySketchBuilder {
    expected_keys: i64,
    memory_budget_kib: i64,
    seed: u64,
    counter_width: u32,
}

impl Default for FrequencySketchBuilder {
    fn default() -> Self {
        FrequencySketchBuilder {
            expected_keys: 0,
            memory_budget_kib: DEFAULT_MEMORY_BUDGET_KIB,
            seed: process_seed(),
            counter_width: DEFAULT_COUNTER_WIDTH,
        }
    }
}

impl FrequencySketchBuilder {
    /// Sets the number of distinct keys the sketch is expected to track (default: 0).
    ///
    /// The hint caps the table at twice the bits needed to give every key its
    /// own counter, and drives the number of probes per key.
    pub fn expected_keys(mut self, expected_keys: i64) -> Self {
        self.expected_keys = expected_keys;
        self
    }

    /// Sets the memory budget for counters, in kibibytes (default: 1024).
    ///
    /// Budgets below 1 MiB still yield a 1 MiB table.
    pub fn memory_budget_kib(mut self, memory_budget_kib: i64) -> Self {
        self.memory_budget_kib = memory_budget_kib;
        self
    }

    /// Sets the hash seed (default: drawn at random once per process).
    ///
    /// A seed unknown to clients makes it hard to craft keys that collide.
    ///
    /// # Examples
    ///
    /// ```
    /// # use freqsketch::frequency::FrequencySketch;
    /// let sketch = FrequencySketch::builder().seed(12345).build().unwrap();
    /// assert_eq!(sketch.seed(), 12345);
    /// ```
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the bits per counter, a power of two in `(0, 64]` (default: 4).
    pub fn counter_width(mut self, counter_width: u32) -> Self {
        self.counter_width = counter_width;
        self
    }

    /// Builds the frequency sketch.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if:
    /// - the counter width is not a power of two in `(0, 64]`
    /// - the memory budget is not positive
    /// - the expected number of keys is negative
    ///
    /// # Examples
    ///
    /// ```
    /// # use freqsketch::frequency::FrequencySketch;
    /// let err = FrequencySketch::builder()
    ///     .counter_width(12)
    ///     .build()
    ///     .unwrap_err();
    /// assert_eq!(err.message(), "counter width must be a power of two in (0, 64]");
    /// ```
    pub fn build(self) -> Result<FrequencySketch, Error> {
        if !self.counter_width.is_power_of_two() || self.counter_width > 64 {
            return Err(Error::invalid_counter_width(self.counter_width));
        }
        if self.memory_budget_kib <= 0 {
            return Err(Error::invalid_memory_budget(self.memory_budget_kib));
        }
        if self.expected_keys < 0 {
            return Err(Error::invalid_expected_keys(self.expected_keys));
        }

        if self.expected_keys == 0 {
            log::debug!("FrequencySketch: no expected key count, sizing probes for a single key");
        }

        let sizing = Sizing::compute(
            self.expected_keys as u64,
            self.memory_budget_kib as u64,
            self.counter_width,
        );
        Ok(FrequencySketch::with_sizing(
            sizing,
            self.seed,
            self.counter_width,
        ))
    }
}
