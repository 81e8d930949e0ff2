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

//! Replays synthetic workloads against a sketch while keeping exact counts,
//! and measures how often the sketch orders two keys differently.

use std::cmp::Ordering;
use std::collections::HashMap;

use freqsketch::common::random::RandomSource;
use freqsketch::common::random::XorShift64;
use freqsketch::frequency::FrequencySketch;

/// Key distributions over `[0, modulus)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distribution {
    /// A single uniform draw.
    Uniform,
    /// Sum of ten uniform draws, reduced mod `modulus`.
    AlmostNormal,
    /// Product of two uniform draws, reduced mod `modulus`.
    UniformSquared,
    /// Product of three uniform draws, reduced mod `modulus`.
    UniformCubed,
}

impl Distribution {
    pub const ALL: [Distribution; 4] = [
        Distribution::Uniform,
        Distribution::AlmostNormal,
        Distribution::UniformSquared,
        Distribution::UniformCubed,
    ];

    pub fn sample(self, rng: &mut XorShift64, modulus: u64) -> u64 {
        match self {
            Distribution::Uniform => sum_rand(rng, 1, modulus),
            Distribution::AlmostNormal => sum_rand(rng, 10, modulus),
            Distribution::UniformSquared => mul_rand(rng, 2, modulus),
            Distribution::UniformCubed => mul_rand(rng, 3, modulus),
        }
    }
}

fn sum_rand(rng: &mut XorShift64, terms: usize, modulus: u64) -> u64 {
    (0..terms).map(|_| rng.next_below(modulus)).sum::<u64>() % modulus
}

fn mul_rand(rng: &mut XorShift64, factors: usize, modulus: u64) -> u64 {
    (0..factors).fold(1, |acc, _| acc * rng.next_below(modulus) % modulus)
}

/// Exact per-key counts kept alongside a sketch.
#[derive(Debug, Default)]
pub struct ExactCounts {
    counts: HashMap<u64, u64>,
}

impl ExactCounts {
    pub fn record(&mut self, sketch: &mut FrequencySketch, key: u64) {
        sketch.increment(key.to_le_bytes());
        *self.counts.entry(key).or_default() += 1;
    }

    pub fn get(&self, key: u64) -> u64 {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// Whether the sketch orders `a` and `b` differently from their exact
    /// counts. Exact counts are capped at the sketch's saturation value, so
    /// two saturated keys count as tied.
    pub fn order_disagrees(&self, sketch: &FrequencySketch, a: u64, b: u64) -> bool {
        let cap = sketch.max_count();
        let exact = self.get(a).min(cap).cmp(&self.get(b).min(cap));
        let estimated = sketch
            .estimate(a.to_le_bytes())
            .cmp(&sketch.estimate(b.to_le_bytes()));
        exact != estimated
    }
}

/// Result of a replayed workload.
#[derive(Debug, Default, Clone, Copy)]
pub struct Outcome {
    pub inserts: u64,
    pub comparisons: u64,
    pub disagreements: u64,
}

impl Outcome {
    pub fn disagreement_ratio(&self) -> f64 {
        if self.comparisons == 0 {
            return 0.0;
        }
        self.disagreements as f64 / self.comparisons as f64
    }
}

/// Runs `steps` steps; each one either inserts a key or compares two keys,
/// with equal probability.
pub fn replay_interleaved(
    sketch: &mut FrequencySketch,
    distribution: Distribution,
    modulus: u64,
    steps: u64,
    seed: u64,
) -> Outcome {
    let mut rng = XorShift64::seeded(seed);
    let mut exact = ExactCounts::default();
    let mut outcome = Outcome::default();

    for _ in 0..steps {
        if rng.next_bool() {
            let key = distribution.sample(&mut rng, modulus);
            exact.record(sketch, key);
            outcome.inserts += 1;
        } else {
            let a = distribution.sample(&mut rng, modulus);
            let b = distribution.sample(&mut rng, modulus);
            outcome.comparisons += 1;
            if exact.order_disagrees(sketch, a, b) {
                outcome.disagreements += 1;
            }
        }
    }

    outcome
}

/// Inserts `inserts` keys first, then runs `comparisons` random comparisons.
pub fn replay_then_compare(
    sketch: &mut FrequencySketch,
    distribution: Distribution,
    modulus: u64,
    inserts: u64,
    comparisons: u64,
    seed: u64,
) -> Outcome {
    let mut rng = XorShift64::seeded(seed);
    let mut exact = ExactCounts::default();

    for _ in 0..inserts {
        let key = distribution.sample(&mut rng, modulus);
        exact.record(sketch, key);
    }

    let mut disagreements = 0;
    for _ in 0..comparisons {
        let a = rng.next_below(modulus);
        let b = rng.next_below(modulus);
        if exact.order_disagrees(sketch, a, b) {
            disagreements += 1;
        }
    }

    Outcome {
        inserts,
        comparisons,
        disagreements,
    }
}
