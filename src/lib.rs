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

//! # freqsketch
//!
//! A bounded-memory approximate frequency counter. Given a stream of opaque
//! byte keys, a [`FrequencySketch`](frequency::FrequencySketch) estimates how
//! many times each key has been seen, without storing the keys, so that a
//! cache admission policy can cheaply tell hot keys from cold ones.
//!
//! The sketch is a plain single-threaded value: share it across threads
//! behind a lock, or keep one sketch per shard.

#![deny(missing_docs)]

pub mod common;
pub mod error;
pub mod frequency;
pub mod hash;
