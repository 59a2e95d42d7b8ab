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

use super::Summary;
use super::SummaryType;
use super::UpdatableSummary;
use crate::codec::SketchBytes;
use crate::codec::SketchSlice;
use crate::codec::insufficient_data;
use crate::error::Error;

/// Total size and node count.
const HEADER_SIZE_BYTES: usize = 4 + 1;
const MAX_NODES: usize = i8::MAX as usize;

/// A summary holding an ordered list of strings.
///
/// The first update fills the summary; later updates are ignored.
///
/// # Example
///
/// ```
/// use datasketches_tuple::tuple::ArrayOfStringsSummary;
/// use datasketches_tuple::tuple::UpdatableSummary;
///
/// let mut summary = ArrayOfStringsSummary::default();
/// summary.update(vec!["a".to_string(), "b".to_string()]);
/// summary.update(vec!["c".to_string()]);
/// assert_eq!(summary.values(), ["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ArrayOfStringsSummary {
    values: Vec<String>,
}

impl ArrayOfStringsSummary {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    fn serialized_size(&self) -> usize {
        HEADER_SIZE_BYTES
            + self
                .values
                .iter()
                .map(|value| 4 + value.len())
                .sum::<usize>()
    }
}

impl UpdatableSummary<Vec<String>> for ArrayOfStringsSummary {
    fn update(&mut self, value: Vec<String>) {
        if self.values.is_empty() {
            self.values = value;
        }
    }
}

impl Summary for ArrayOfStringsSummary {
    fn summary_type(&self) -> SummaryType {
        SummaryType::ArrayOfStrings
    }

    fn serialize(&self) -> Result<Vec<u8>, Error> {
        if self.values.len() > MAX_NODES {
            return Err(Error::invalid_argument(format!(
                "too many strings in summary: {}, at most {MAX_NODES}",
                self.values.len()
            )));
        }
        let total = self.serialized_size();
        let total_i32 = i32::try_from(total)
            .map_err(|_| Error::invalid_argument(format!("summary too large: {total} bytes")))?;

        let mut bytes = SketchBytes::with_capacity(total);
        bytes.write_i32_ne(total_i32);
        bytes.write_u8(self.values.len() as u8);
        for value in &self.values {
            bytes.write_i32_ne(value.len() as i32);
            bytes.write(value.as_bytes());
        }
        Ok(bytes.into_bytes())
    }

    fn deserialize(summary_type: SummaryType, bytes: &[u8]) -> Result<(Self, usize), Error> {
        summary_type.ensure_is(SummaryType::ArrayOfStrings)?;
        let mut cursor = SketchSlice::new(bytes);
        let total = cursor
            .read_i32_ne()
            .map_err(insufficient_data("strings_total"))?;
        let num_nodes = cursor
            .read_u8()
            .map_err(insufficient_data("strings_num_nodes"))? as usize;
        if total < HEADER_SIZE_BYTES as i32 || total as usize > bytes.len() {
            return Err(Error::deserial(format!(
                "invalid strings summary size {total} with {} bytes available",
                bytes.len()
            )));
        }
        if num_nodes > MAX_NODES {
            return Err(Error::deserial(format!(
                "too many strings in summary: {num_nodes}, at most {MAX_NODES}"
            )));
        }

        let mut values = Vec::with_capacity(num_nodes);
        for _ in 0..num_nodes {
            let len = cursor
                .read_i32_ne()
                .map_err(insufficient_data("string_len"))?;
            if len < 0 || len as usize > cursor.remaining() {
                return Err(Error::deserial(format!("invalid string length: {len}")));
            }
            let mut buf = vec![0u8; len as usize];
            cursor
                .read_exact(&mut buf)
                .map_err(insufficient_data("string_bytes"))?;
            let value = String::from_utf8(buf)
                .map_err(|err| Error::deserial("invalid utf-8 string").set_source(err))?;
            values.push(value);
        }

        if cursor.position() != total as usize {
            return Err(Error::deserial(format!(
                "strings summary declared {total} bytes but used {}",
                cursor.position()
            )));
        }
        Ok((Self { values }, cursor.position()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_first_update_wins() {
        let mut summary = ArrayOfStringsSummary::default();
        summary.update(strings(&["x"]));
        summary.update(strings(&["y", "z"]));
        assert_eq!(summary.values(), ["x"]);
    }

    #[test]
    fn test_serialize_layout() {
        let summary = ArrayOfStringsSummary::new(strings(&["ab", "", "héllo"]));
        let bytes = summary.serialize().unwrap();
        assert_eq!(bytes.len(), 5 + (4 + 2) + 4 + (4 + 6));
        assert_eq!(
            i32::from_ne_bytes(bytes[0..4].try_into().unwrap()),
            bytes.len() as i32
        );
        assert_eq!(bytes[4], 3);

        let (restored, size) =
            ArrayOfStringsSummary::deserialize(SummaryType::ArrayOfStrings, &bytes).unwrap();
        assert_eq!(size, bytes.len());
        assert_eq!(restored, summary);
    }

    #[test]
    fn test_serialize_too_many_strings() {
        let summary = ArrayOfStringsSummary::new(vec![String::new(); MAX_NODES + 1]);
        assert!(summary.serialize().is_err());
    }

    #[test]
    fn test_deserialize_inconsistent_total() {
        let summary = ArrayOfStringsSummary::new(strings(&["abc"]));
        let mut bytes = summary.serialize().unwrap();
        bytes.extend_from_slice(&[0, 0]);
        let total = (bytes.len() as i32).to_ne_bytes();
        bytes[0..4].copy_from_slice(&total);
        assert!(ArrayOfStringsSummary::deserialize(SummaryType::ArrayOfStrings, &bytes).is_err());
    }

    #[test]
    fn test_deserialize_invalid_utf8() {
        let summary = ArrayOfStringsSummary::new(strings(&["ab"]));
        let mut bytes = summary.serialize().unwrap();
        bytes[9] = 0xFF;
        assert!(ArrayOfStringsSummary::deserialize(SummaryType::ArrayOfStrings, &bytes).is_err());
    }
}
