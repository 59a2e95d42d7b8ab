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

//! Compact Tuple sketch implementation
//!
//! A CompactSketch is the immutable result form of a Tuple sketch. It stores
//! the retained hash keys, one summary per key, theta and the empty flag, and
//! can be serialized to and from bytes.

use tracing::debug;
use tracing::trace;

use super::Summary;
use super::SummaryType;
use super::serialization::*;
use crate::codec::Family;
use crate::codec::SketchBytes;
use crate::codec::SketchSlice;
use crate::codec::ensure_serial_version_is;
use crate::codec::insufficient_data;
use crate::error::Error;

/// A compact, immutable Tuple sketch.
///
/// Compact sketches are produced by an updatable sketch or by a set operation
/// and are never modified afterwards. Keys are kept in the order they were
/// given, which is not necessarily sorted.
///
/// # Example
///
/// ```
/// use datasketches_tuple::tuple::CompactSketch;
/// use datasketches_tuple::tuple::DoubleSummary;
/// use datasketches_tuple::tuple::MAX_THETA;
/// use datasketches_tuple::tuple::SummaryMode;
///
/// let summaries = vec![
///     DoubleSummary::with_value(1.0, SummaryMode::Sum),
///     DoubleSummary::with_value(2.0, SummaryMode::Sum),
/// ];
/// let sketch = CompactSketch::new(vec![5, 9], summaries, MAX_THETA, false);
///
/// let bytes = sketch.serialize().unwrap();
/// let restored = CompactSketch::<DoubleSummary>::deserialize(&bytes).unwrap();
/// assert_eq!(restored.num_retained(), 2);
/// assert_eq!(restored.iter().collect::<Vec<_>>(), vec![5, 9]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompactSketch<S: Summary> {
    keys: Vec<u64>,
    summaries: Vec<S>,
    theta: u64,
    is_empty: bool,
}

impl<S: Summary> CompactSketch<S> {
    /// Creates a compact sketch from already finalized parts.
    ///
    /// `summaries[i]` is the summary of `keys[i]`. The empty flag is taken as
    /// given: a sketch may have no entries and still not be empty, when every
    /// observed hash fell above theta.
    ///
    /// # Panics
    ///
    /// Panics if `keys` and `summaries` differ in length, or if theta is not in
    /// `(0, MAX_THETA]`.
    pub fn new(keys: Vec<u64>, summaries: Vec<S>, theta: u64, is_empty: bool) -> Self {
        assert_eq!(
            keys.len(),
            summaries.len(),
            "keys and summaries must have the same length"
        );
        assert!(
            theta > 0 && theta <= MAX_THETA,
            "theta must be in (0, {MAX_THETA}], got {theta}"
        );
        Self {
            keys,
            summaries,
            theta,
            is_empty,
        }
    }

    /// Check if the sketch is empty (no values have been presented to the source sketch)
    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    /// Return number of retained entries
    pub fn num_retained(&self) -> usize {
        self.keys.len()
    }

    /// Return theta as u64
    pub fn theta64(&self) -> u64 {
        self.theta
    }

    /// Return theta as a fraction (0.0 to 1.0)
    pub fn theta(&self) -> f64 {
        self.theta as f64 / MAX_THETA as f64
    }

    /// Check if sketch is in estimation mode
    pub fn is_estimation_mode(&self) -> bool {
        self.theta < MAX_THETA && !self.is_empty
    }

    /// Get the cardinality estimate
    pub fn estimate(&self) -> f64 {
        if !self.is_estimation_mode() {
            return self.num_retained() as f64;
        }
        self.num_retained() as f64 / self.theta()
    }

    /// Return iterator over the retained keys, in stored order
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.keys.iter().copied()
    }

    /// Returns copies of the retained summaries, in key order.
    ///
    /// Returns `None` if the sketch retains no entries. Each call allocates new
    /// copies, so changes to the result never reach the sketch.
    pub fn summaries(&self) -> Option<Vec<S>> {
        if self.keys.is_empty() {
            return None;
        }
        Some(self.summaries.to_vec())
    }

    /// Serialize the compact sketch to bytes
    ///
    /// Multi-byte fields are written in the native byte order of this platform.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A summary fails to serialize
    /// - The summaries are not all of the same variant
    /// - There are more than `i32::MAX` entries
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        let count = self.num_retained();

        let mut summaries_bytes = Vec::with_capacity(count);
        let mut summaries_size = 0;
        for summary in &self.summaries {
            let bytes = summary.serialize()?;
            summaries_size += bytes.len();
            summaries_bytes.push(bytes);
        }

        let is_theta_included = self.theta < MAX_THETA;
        let has_entries = count > 0;

        let mut size_bytes = PREAMBLE_BYTES;
        if is_theta_included {
            size_bytes += THETA_SIZE_BYTES;
        }
        let mut entries_header = None;
        if has_entries {
            // every tag fits the length byte, checked at compile time
            let tag = self.summary_type()?.tag();
            let count = i32::try_from(count).map_err(|_| {
                Error::invalid_argument(format!("too many entries to serialize: {count}"))
            })?;
            size_bytes += ENTRIES_HEADER_BYTES
                + tag.len()
                + HASH_SIZE_BYTES * self.keys.len()
                + summaries_size;
            entries_header = Some((tag, count));
        }

        let mut bytes = SketchBytes::with_capacity(size_bytes);
        bytes.write_u8(PREAMBLE_LONGS);
        bytes.write_u8(SERIAL_VERSION);
        bytes.write_u8(Family::TUPLE.id);
        bytes.write_u8(SketchType::CompactSketch.id());

        let mut flags = 0;
        if cfg!(target_endian = "big") {
            flags |= FLAG_IS_BIG_ENDIAN;
        }
        if self.is_empty {
            flags |= FLAG_IS_EMPTY;
        }
        if has_entries {
            flags |= FLAG_HAS_ENTRIES;
        }
        if is_theta_included {
            flags |= FLAG_IS_THETA_INCLUDED;
        }
        bytes.write_u8(flags);

        if is_theta_included {
            bytes.write_u64_ne(self.theta);
        }

        if let Some((tag, count)) = entries_header {
            bytes.write_u8(tag.len() as u8);
            bytes.write_i32_ne(count);
            bytes.write(tag.as_bytes());
            for key in &self.keys {
                bytes.write_u64_ne(*key);
            }
            for summary_bytes in &summaries_bytes {
                bytes.write(summary_bytes);
            }
        }

        debug_assert_eq!(bytes.len(), size_bytes);
        trace!(count, size_bytes, "serialized compact tuple sketch");
        Ok(bytes.into_bytes())
    }

    /// Deserialize a compact sketch from bytes
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The data is truncated or otherwise malformed
    /// - The family ID, preamble size or sketch type doesn't match
    /// - The serial version is unsupported
    /// - The data was written on a platform with a different byte order
    /// - The summary type tag is unknown or does not match `S`
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        Self::deserialize_inner(bytes).inspect_err(|err| {
            debug!(
                kind = %err.kind(),
                message = err.message(),
                len = bytes.len(),
                "rejected compact tuple sketch"
            );
        })
    }

    fn deserialize_inner(bytes: &[u8]) -> Result<Self, Error> {
        let mut cursor = SketchSlice::new(bytes);

        let preamble_longs = cursor
            .read_u8()
            .map_err(insufficient_data("preamble_longs"))?;
        let serial_version = cursor
            .read_u8()
            .map_err(insufficient_data("serial_version"))?;
        let family_id = cursor.read_u8().map_err(insufficient_data("family_id"))?;
        Family::TUPLE.validate_id(family_id)?;
        Family::TUPLE.validate_preamble_longs(preamble_longs)?;
        ensure_serial_version_is(SERIAL_VERSION, serial_version)?;
        let sketch_type = cursor.read_u8().map_err(insufficient_data("sketch_type"))?;
        SketchType::CompactSketch.validate(sketch_type)?;

        let flags = cursor.read_u8().map_err(insufficient_data("flags"))?;
        let is_big_endian = (flags & FLAG_IS_BIG_ENDIAN) != 0;
        if is_big_endian != cfg!(target_endian = "big") {
            return Err(Error::byte_order_mismatch(is_big_endian));
        }
        let is_empty = (flags & FLAG_IS_EMPTY) != 0;
        let has_entries = (flags & FLAG_HAS_ENTRIES) != 0;
        let is_theta_included = (flags & FLAG_IS_THETA_INCLUDED) != 0;

        let theta = if is_theta_included {
            cursor.read_u64_ne().map_err(insufficient_data("theta"))?
        } else {
            MAX_THETA
        };
        if theta == 0 || theta > MAX_THETA {
            return Err(Error::deserial(format!(
                "theta must be in (0, {MAX_THETA}], got {theta}"
            )));
        }

        if !has_entries {
            return Ok(Self {
                keys: Vec::new(),
                summaries: Vec::new(),
                theta,
                is_empty,
            });
        }

        let tag_length = cursor.read_u8().map_err(insufficient_data("tag_length"))? as usize;
        let count = cursor.read_i32_ne().map_err(insufficient_data("count"))?;
        let count = usize::try_from(count)
            .map_err(|_| Error::deserial(format!("negative entry count: {count}")))?;

        let mut tag = vec![0u8; tag_length];
        cursor
            .read_exact(&mut tag)
            .map_err(insufficient_data("summary_type_tag"))?;
        let tag = String::from_utf8(tag)
            .map_err(|err| Error::deserial("summary type tag is not utf-8").set_source(err))?;
        let summary_type =
            SummaryType::from_tag(&tag).ok_or_else(|| Error::unknown_summary_type(&tag))?;

        if count > cursor.remaining() / HASH_SIZE_BYTES {
            return Err(Error::insufficient_data(format!(
                "{count} keys, only {} bytes left",
                cursor.remaining()
            )));
        }
        let mut keys = Vec::with_capacity(count);
        for i in 0..count {
            let key = cursor
                .read_u64_ne()
                .map_err(|_| Error::insufficient_data(format!("key {i} of {count}")))?;
            keys.push(key);
        }

        let mut summaries = Vec::with_capacity(count);
        for i in 0..count {
            let (summary, size) = S::deserialize(summary_type, cursor.remaining_slice())
                .map_err(|err| err.with_context("summary_index", i))?;
            cursor
                .advance(size)
                .map_err(|_| Error::insufficient_data(format!("summary {i} of {count}")))?;
            summaries.push(summary);
        }

        Ok(Self {
            keys,
            summaries,
            theta,
            is_empty,
        })
    }

    /// Returns the variant shared by all summaries.
    fn summary_type(&self) -> Result<SummaryType, Error> {
        let mut types = self.summaries.iter().map(Summary::summary_type);
        let Some(first) = types.next() else {
            return Err(Error::invalid_argument("sketch has no summaries"));
        };
        match types.find(|summary_type| *summary_type != first) {
            None => Ok(first),
            Some(other) => Err(Error::invalid_argument(format!(
                "summaries of a sketch must share one type, found {first:?} and {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::tuple::AnySummary;
    use crate::tuple::DoubleSummary;
    use crate::tuple::IntegerSummary;
    use crate::tuple::SummaryMode;

    fn double_sketch(theta: u64) -> CompactSketch<DoubleSummary> {
        CompactSketch::new(
            vec![5, 9],
            vec![
                DoubleSummary::with_value(1.0, SummaryMode::Sum),
                DoubleSummary::with_value(2.0, SummaryMode::Sum),
            ],
            theta,
            false,
        )
    }

    #[test]
    fn test_empty_compact_sketch() {
        let sketch = CompactSketch::<DoubleSummary>::new(Vec::new(), Vec::new(), MAX_THETA, true);
        assert!(sketch.is_empty());
        assert_eq!(sketch.estimate(), 0.0);
        assert_eq!(sketch.num_retained(), 0);
        assert!(sketch.summaries().is_none());
        assert!(!sketch.is_estimation_mode());
    }

    #[test]
    fn test_compact_sketch_estimation_mode() {
        let sketch = double_sketch(MAX_THETA / 2);
        assert!(sketch.is_estimation_mode());
        assert!(sketch.estimate() > 3.9 && sketch.estimate() < 4.1);
        assert!(sketch.theta() > 0.49 && sketch.theta() < 0.51);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_new_rejects_misaligned_parts() {
        CompactSketch::new(vec![1, 2], vec![DoubleSummary::default()], MAX_THETA, false);
    }

    #[test]
    #[should_panic(expected = "theta must be in")]
    fn test_new_rejects_zero_theta() {
        CompactSketch::<DoubleSummary>::new(Vec::new(), Vec::new(), 0, false);
    }

    #[test]
    fn test_serialize_layout_without_theta() {
        let sketch = double_sketch(MAX_THETA);
        let bytes = sketch.serialize().unwrap();
        let tag = SummaryType::Double.tag();

        assert_eq!(bytes[0], PREAMBLE_LONGS);
        assert_eq!(bytes[1], SERIAL_VERSION);
        assert_eq!(bytes[2], Family::TUPLE.id);
        assert_eq!(bytes[3], SketchType::CompactSketch.id());
        assert_eq!(bytes[4] & !FLAG_IS_BIG_ENDIAN, FLAG_HAS_ENTRIES);
        assert_eq!(bytes[5] as usize, tag.len());
        assert_eq!(i32::from_ne_bytes(bytes[6..10].try_into().unwrap()), 2);
        assert_eq!(&bytes[10..10 + tag.len()], tag.as_bytes());
        let keys_start = 10 + tag.len();
        assert_eq!(
            u64::from_ne_bytes(bytes[keys_start..keys_start + 8].try_into().unwrap()),
            5
        );
        assert_eq!(bytes.len(), keys_start + 2 * 8 + 2 * 9);
    }

    #[test]
    fn test_serialize_layout_with_theta() {
        let theta = MAX_THETA / 3;
        let bytes = double_sketch(theta).serialize().unwrap();
        assert_ne!(bytes[4] & FLAG_IS_THETA_INCLUDED, 0);
        assert_eq!(u64::from_ne_bytes(bytes[5..13].try_into().unwrap()), theta);
    }

    #[test]
    fn test_serialize_rejects_mixed_summaries() {
        let sketch = CompactSketch::new(
            vec![1, 2],
            vec![
                AnySummary::from(DoubleSummary::default()),
                AnySummary::from(IntegerSummary::default()),
            ],
            MAX_THETA,
            false,
        );
        let err = sketch.serialize().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_deserialize_summary_type_must_match() {
        let bytes = double_sketch(MAX_THETA).serialize().unwrap();
        let err = CompactSketch::<IntegerSummary>::deserialize(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    }

    #[test]
    fn test_deserialize_any_summary() {
        let bytes = double_sketch(MAX_THETA).serialize().unwrap();
        let sketch = CompactSketch::<AnySummary>::deserialize(&bytes).unwrap();
        let summaries = sketch.summaries().unwrap();
        assert_eq!(
            summaries[1],
            AnySummary::Double(DoubleSummary::with_value(2.0, SummaryMode::Sum))
        );
    }

    #[test]
    fn test_deserialize_negative_count() {
        let mut bytes = double_sketch(MAX_THETA).serialize().unwrap();
        bytes[6..10].copy_from_slice(&(-1i32).to_ne_bytes());
        let err = CompactSketch::<DoubleSummary>::deserialize(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    }

    #[test]
    fn test_deserialize_zero_count_with_entries_flag() {
        let mut bytes = double_sketch(MAX_THETA).serialize().unwrap();
        bytes[6..10].copy_from_slice(&0i32.to_ne_bytes());
        let sketch = CompactSketch::<DoubleSummary>::deserialize(&bytes).unwrap();
        assert_eq!(sketch.num_retained(), 0);
        assert!(sketch.summaries().is_none());
        assert!(!sketch.is_empty());
    }

    #[test]
    fn test_deserialize_zero_theta() {
        let mut bytes = double_sketch(MAX_THETA / 2).serialize().unwrap();
        bytes[5..13].copy_from_slice(&0u64.to_ne_bytes());
        let err = CompactSketch::<DoubleSummary>::deserialize(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    }

    #[test]
    fn test_deserialize_truncated_everywhere() {
        let bytes = double_sketch(MAX_THETA / 2).serialize().unwrap();
        for len in 0..bytes.len() {
            let err = CompactSketch::<DoubleSummary>::deserialize(&bytes[..len]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData, "len {len}");
        }
    }
}
