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

use std::hash::Hasher;

use twox_hash::XxHash64;

/// Hashes `bytes` with XxHash64 keyed by the full 64-bit `seed`.
///
/// # Examples
///
/// ```
/// use freqsketch::hash::hash64;
///
/// let a = hash64(b"apple", 42);
/// assert_eq!(a, hash64(b"apple", 42));
/// assert_ne!(a, hash64(b"apple", 43));
/// assert_ne!(a, hash64(b"apple", 42 | (1 << 32)));
/// ```
#[inline]
pub fn hash64(bytes: &[u8], seed: u64) -> u64 {
    let mut hasher = XxHash64::with_seed(seed);
    hasher.write(bytes);
    hasher.finish()
}
