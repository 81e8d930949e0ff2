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

use super::builder::FrequencySketchBuilder;
use super::sizing::MAX_HASHES;
use super::sizing::Sizing;
use crate::error::Error;
use crate::hash::hash64;

/// An approximate frequency counter over a stream of opaque byte keys.
///
/// Counters are `counter_width` bits wide and packed into 64-bit words. Each
/// key maps to `num_hashes` counters; updates only raise the counters sitting
/// at the key's current minimum (conservative update), and the estimate is
/// the minimum of the key's counters. Counters saturate at
/// [`max_count()`](Self::max_count).
///
/// The sketch is not synchronized: callers that share one across threads
/// must serialize [`increment`](Self::increment) and [`age`](Self::age).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencySketch {
    /// Number of probes per key (k)
    num_hashes: u8,
    /// Seed for the key hash
    seed: u64,
    /// Bits per counter, a power of two in `[1, 64]`
    counter_width: u32,
    /// Saturation value, `2^counter_width - 1`
    counter_mask: u64,
    /// Keeps the low `counter_width - 1` bits of every counter in a word
    decay_mask: u64,
    /// Number of counters, a power of two
    table_size: u64,
    /// Counters packed into u64 words
    /// Length = table_size * counter_width / 64
    words: Box<[u64]>,
}

impl FrequencySketch {
    /// Creates a sketch sized for `expected_keys` distinct keys within
    /// `memory_budget_kib` kibibytes.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if:
    /// - `counter_width` is not a power of two in `(0, 64]`
    /// - `memory_budget_kib` is not positive
    /// - `expected_keys` is negative
    ///
    /// # Examples
    ///
    /// ```
    /// use freqsketch::frequency::FrequencySketch;
    ///
    /// let sketch = FrequencySketch::new(1000, 1024, 42, 4).unwrap();
    /// assert_eq!(sketch.max_count(), 15);
    ///
    /// assert!(FrequencySketch::new(1000, 1024, 42, 3).is_err());
    /// ```
    pub fn new(
        expected_keys: i64,
        memory_budget_kib: i64,
        seed: u64,
        counter_width: u32,
    ) -> Result<Self, Error> {
        FrequencySketchBuilder::default()
            .expected_keys(expected_keys)
            .memory_budget_kib(memory_budget_kib)
            .seed(seed)
            .counter_width(counter_width)
            .build()
    }

    /// Returns a builder for creating a frequency sketch.
    ///
    /// # Examples
    ///
    /// ```
    /// use freqsketch::frequency::FrequencySketch;
    ///
    /// let sketch = FrequencySketch::builder()
    ///     .expected_keys(10_000)
    ///     .counter_width(8)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(sketch.max_count(), 255);
    /// ```
    pub fn builder() -> FrequencySketchBuilder {
        FrequencySketchBuilder::default()
    }

    /// Allocates a zeroed sketch with the given geometry.
    ///
    /// # Panics
    ///
    /// Panics if the geometry breaks the table invariants; that is a sizing bug.
    pub(crate) fn with_sizing(sizing: Sizing, seed: u64, counter_width: u32) -> Self {
        assert!(
            counter_width.is_power_of_two() && counter_width <= 64,
            "counter width {counter_width} must be a power of two in (0, 64]"
        );
        assert!(
            sizing.table_size.is_power_of_two(),
            "table size {} is not a power of two",
            sizing.table_size
        );
        assert_eq!(
            sizing.table_size * u64::from(counter_width),
            sizing.table_bits,
            "table size does not match table bits"
        );
        assert!(
            sizing.table_bits % 64 == 0 && sizing.table_size - 1 <= u64::from(u32::MAX),
            "table of {} bits cannot be addressed by 32-bit slots",
            sizing.table_bits
        );
        assert!(
            (1..=MAX_HASHES).contains(&(sizing.num_hashes as usize)),
            "hash count {} out of range",
            sizing.num_hashes
        );

        let words = vec![0u64; sizing.num_words()].into_boxed_slice();

        log::debug!(
            "FrequencySketch created: table_bits={}, table_size={}, num_hashes={}, counter_width={}, words={}",
            sizing.table_bits,
            sizing.table_size,
            sizing.num_hashes,
            counter_width,
            words.len()
        );

        FrequencySketch {
            num_hashes: sizing.num_hashes,
            seed,
            counter_width,
            counter_mask: counter_mask(counter_width),
            decay_mask: decay_mask(counter_width),
            table_size: sizing.table_size,
            words,
        }
    }

    // ========================================================================
    // Update and Query Operations
    // ========================================================================

    /// Records one occurrence of `key`.
    ///
    /// Only the key's counters equal to its current minimum are raised by one;
    /// nothing changes once that minimum has saturated.
    ///
    /// # Examples
    ///
    /// ```
    /// # use freqsketch::frequency::FrequencySketch;
    /// let mut sketch = FrequencySketch::new(1000, 1, 42, 4).unwrap();
    /// for _ in 0..3 {
    ///     sketch.increment("apple");
    /// }
    /// assert_eq!(sketch.estimate("apple"), 3);
    /// ```
    pub fn increment(&mut self, key: impl AsRef<[u8]>) {
        let slots = self.derive_slots(key.as_ref());
        let slots = &slots[..self.num_hashes as usize];

        let min = self.min_counter(slots);
        if min == self.counter_mask {
            return;
        }

        for &slot in slots {
            // Re-read: a slot repeated in the probe sequence was already raised.
            if self.counter(slot) == min {
                let (index, shift) = self.locate(slot);
                self.words[index] += 1u64 << shift;
            }
        }
    }

    /// Returns the estimated number of occurrences of `key`.
    ///
    /// Without aging, this never under-counts a key whose count is below
    /// [`max_count()`](Self::max_count); collisions can only raise it.
    ///
    /// # Examples
    ///
    /// ```
    /// # use freqsketch::frequency::FrequencySketch;
    /// let mut sketch = FrequencySketch::new(1000, 1, 42, 4).unwrap();
    /// sketch.increment(b"banana");
    ///
    /// assert_eq!(sketch.estimate(b"banana"), 1);
    /// assert_eq!(sketch.estimate(b"cherry"), 0);
    /// ```
    pub fn estimate(&self, key: impl AsRef<[u8]>) -> u64 {
        let slots = self.derive_slots(key.as_ref());
        self.min_counter(&slots[..self.num_hashes as usize])
    }

    /// Halves every counter, rounding down.
    ///
    /// Callers invoke this on their own cadence (for example once the number
    /// of increments since the last aging exceeds [`table_size()`](Self::table_size))
    /// so that estimates follow recent traffic.
    ///
    /// # Examples
    ///
    /// ```
    /// # use freqsketch::frequency::FrequencySketch;
    /// let mut sketch = FrequencySketch::new(1000, 1, 42, 4).unwrap();
    /// for _ in 0..7 {
    ///     sketch.increment("apple");
    /// }
    ///
    /// sketch.age();
    /// assert_eq!(sketch.estimate("apple"), 3);
    /// ```
    pub fn age(&mut self) {
        let decay_mask = self.decay_mask;
        for word in self.words.iter_mut() {
            *word = (*word >> 1) & decay_mask;
        }
        log::trace!("FrequencySketch aged: words={}", self.words.len());
    }

    /// Resets every counter to zero, keeping the configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// # use freqsketch::frequency::FrequencySketch;
    /// let mut sketch = FrequencySketch::new(1000, 1, 42, 4).unwrap();
    /// sketch.increment("apple");
    /// assert!(!sketch.is_empty());
    ///
    /// sketch.clear();
    /// assert!(sketch.is_empty());
    /// assert_eq!(sketch.estimate("apple"), 0);
    /// ```
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Returns whether every counter is zero.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Returns the number of probes per key.
    pub fn num_hashes(&self) -> u8 {
        self.num_hashes
    }

    /// Returns the hash seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of bits per counter.
    pub fn counter_width(&self) -> u32 {
        self.counter_width
    }

    /// Returns the number of counters.
    pub fn table_size(&self) -> u64 {
        self.table_size
    }

    /// Returns the saturation value of a counter, `2^counter_width - 1`.
    pub fn max_count(&self) -> u64 {
        self.counter_mask
    }

    /// Returns the bytes held by this sketch, counter storage included.
    pub fn used_memory(&self) -> usize {
        size_of::<Self>() + self.words.len() * size_of::<u64>()
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// Maps `key` to its probe sequence using double hashing
    /// (Kirsch-Mitzenmacher) over the two 32-bit halves of one digest.
    ///
    /// Only the first `num_hashes` entries are meaningful.
    fn derive_slots(&self, key: &[u8]) -> [u32; MAX_HASHES] {
        let hash = hash64(key, self.seed);
        // table_size <= 2^32, so the mask fits and reduces mod table_size.
        let mask = (self.table_size - 1) as u32;

        let mut x = (hash as u32) & mask;
        let mut y = ((hash >> 32) as u32) & mask;

        let mut slots = [0u32; MAX_HASHES];
        slots[0] = x;
        for (i, slot) in slots
            .iter_mut()
            .enumerate()
            .take(self.num_hashes as usize)
            .skip(1)
        {
            x = x.wrapping_add(y) & mask;
            y = y.wrapping_add(i as u32) & mask;
            *slot = x;
        }
        slots
    }

    /// Returns `(word_index, bit_offset)` of the counter at `slot`.
    #[inline]
    fn locate(&self, slot: u32) -> (usize, u32) {
        let bit = u64::from(slot) * u64::from(self.counter_width);
        ((bit / 64) as usize, (bit % 64) as u32)
    }

    /// Reads the counter at `slot`.
    #[inline]
    fn counter(&self, slot: u32) -> u64 {
        let (index, shift) = self.locate(slot);
        (self.words[index] >> shift) & self.counter_mask
    }

    fn min_counter(&self, slots: &[u32]) -> u64 {
        slots
            .iter()
            .map(|&slot| self.counter(slot))
            .min()
            .unwrap_or(0)
    }
}

/// `2^counter_width - 1`, without overflowing at a width of 64.
fn counter_mask(counter_width: u32) -> u64 {
    u64::MAX >> (64 - counter_width)
}

/// The low `counter_width - 1` bits of every counter position in a word.
///
/// Applied after shifting a whole word right by one, it drops the bit each
/// counter received from the counter above it.
fn decay_mask(counter_width: u32) -> u64 {
    let low_bits = (1u64 << (counter_width - 1)) - 1;
    (0..64 / counter_width).fold(0, |mask, i| mask | (low_bits << (i * counter_width)))
}
