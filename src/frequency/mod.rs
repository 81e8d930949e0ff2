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

//! Approximate frequency sketch for cache admission.
//!
//! A [`FrequencySketch`] estimates how often each key of a stream has been
//! seen, in a fixed amount of memory and without storing the keys. It is a
//! count-min sketch over a single table of bit-packed saturating counters,
//! updated conservatively and aged by halving, as used by TinyLFU-style
//! admission policies to tell hot keys from cold ones.
//!
//! # Usage
//!
//! ```rust
//! use freqsketch::frequency::FrequencySketch;
//!
//! let mut sketch = FrequencySketch::builder()
//!     .expected_keys(1000)
//!     .memory_budget_kib(1024)
//!     .seed(42)
//!     .counter_width(4)
//!     .build()
//!     .unwrap();
//!
//! for _ in 0..50 {
//!     sketch.increment("A");
//! }
//! for _ in 0..5 {
//!     sketch.increment("B");
//! }
//!
//! assert_eq!(sketch.estimate("A"), 15); // saturated
//! assert_eq!(sketch.estimate("B"), 5);
//! ```
//!
//! # Aging
//!
//! The sketch never ages on its own. Callers decide the cadence, typically
//! once the number of increments since the last aging exceeds the table size:
//!
//! ```rust
//! use freqsketch::frequency::FrequencySketch;
//!
//! let mut sketch = FrequencySketch::new(1000, 1024, 42, 4).unwrap();
//! let mut additions = 0;
//! for key in 0u64..10_000 {
//!     sketch.increment(key.to_le_bytes());
//!     additions += 1;
//!     if additions > sketch.table_size() {
//!         sketch.age();
//!         additions /= 2;
//!     }
//! }
//! ```

mod builder;
mod sizing;
mod sketch;

pub use self::builder::FrequencySketchBuilder;
pub use self::sketch::FrequencySketch;
