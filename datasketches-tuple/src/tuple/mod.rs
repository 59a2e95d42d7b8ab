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

//! Tuple sketches: theta sketches that carry a summary for every retained key.
//!
//! A Tuple sketch retains the hash keys below a threshold theta, like a Theta
//! sketch, and attaches a [`Summary`] to every key so that per-key aggregates
//! survive sampling. This module implements the finalized form,
//! [`CompactSketch`], and its binary serialization format.
//!
//! # Usage
//!
//! ```rust
//! use datasketches_tuple::tuple::CompactSketch;
//! use datasketches_tuple::tuple::IntegerSummary;
//! use datasketches_tuple::tuple::SummaryMode;
//!
//! let summaries = vec![IntegerSummary::with_value(3, SummaryMode::Sum)];
//! let sketch = CompactSketch::new(vec![42], summaries, u64::MAX >> 2, false);
//! assert!(sketch.is_estimation_mode());
//!
//! let bytes = sketch.serialize().unwrap();
//! let restored = CompactSketch::<IntegerSummary>::deserialize(&bytes).unwrap();
//! assert_eq!(restored.theta64(), sketch.theta64());
//! assert_eq!(restored.summaries(), sketch.summaries());
//! ```
//!
//! Serialized sketches record the byte order of the platform that wrote them
//! and are rejected on a platform with the other byte order.

mod compact;
mod double_summary;
mod integer_summary;
mod serialization;
mod strings_summary;
mod summary;

pub use self::compact::CompactSketch;
pub use self::double_summary::DoubleSummary;
pub use self::integer_summary::IntegerSummary;
pub use self::serialization::MAX_THETA;
pub use self::serialization::SERIAL_VERSION;
pub use self::serialization::SketchType;
pub use self::strings_summary::ArrayOfStringsSummary;
pub use self::summary::AnySummary;
pub use self::summary::Summary;
pub use self::summary::SummaryMode;
pub use self::summary::SummaryType;
pub use self::summary::UpdatableSummary;
