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
use super::SummaryMode;
use super::SummaryType;
use super::UpdatableSummary;
use crate::codec::SketchBytes;
use crate::codec::SketchSlice;
use crate::codec::insufficient_data;
use crate::error::Error;

const SERIALIZED_SIZE_BYTES: usize = 9;

/// A summary holding a single `f64`, combined according to its [`SummaryMode`].
///
/// # Example
///
/// ```
/// use datasketches_tuple::tuple::DoubleSummary;
/// use datasketches_tuple::tuple::SummaryMode;
/// use datasketches_tuple::tuple::UpdatableSummary;
///
/// let mut summary = DoubleSummary::new(SummaryMode::Max);
/// summary.update(1.5);
/// summary.update(0.5);
/// assert_eq!(summary.value(), 1.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleSummary {
    value: f64,
    mode: SummaryMode,
}

impl DoubleSummary {
    /// Creates a summary that has not seen any update yet.
    pub fn new(mode: SummaryMode) -> Self {
        let value = match mode {
            SummaryMode::Sum => 0.0,
            SummaryMode::Min => f64::INFINITY,
            SummaryMode::Max => f64::NEG_INFINITY,
        };
        Self { value, mode }
    }

    pub fn with_value(value: f64, mode: SummaryMode) -> Self {
        Self { value, mode }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn mode(&self) -> SummaryMode {
        self.mode
    }
}

impl Default for DoubleSummary {
    fn default() -> Self {
        Self::new(SummaryMode::Sum)
    }
}

impl UpdatableSummary<f64> for DoubleSummary {
    fn update(&mut self, value: f64) {
        match self.mode {
            SummaryMode::Sum => self.value += value,
            SummaryMode::Min => self.value = self.value.min(value),
            SummaryMode::Max => self.value = self.value.max(value),
        }
    }
}

impl Summary for DoubleSummary {
    fn summary_type(&self) -> SummaryType {
        SummaryType::Double
    }

    fn serialize(&self) -> Result<Vec<u8>, Error> {
        let mut bytes = SketchBytes::with_capacity(SERIALIZED_SIZE_BYTES);
        bytes.write_f64_ne(self.value);
        bytes.write_u8(self.mode.id());
        Ok(bytes.into_bytes())
    }

    fn deserialize(summary_type: SummaryType, bytes: &[u8]) -> Result<(Self, usize), Error> {
        summary_type.ensure_is(SummaryType::Double)?;
        let mut cursor = SketchSlice::new(bytes);
        let value = cursor
            .read_f64_ne()
            .map_err(insufficient_data("double_value"))?;
        let mode = cursor.read_u8().map_err(insufficient_data("double_mode"))?;
        let mode = SummaryMode::from_id(mode)?;
        Ok((Self { value, mode }, cursor.position()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_modes() {
        let mut sum = DoubleSummary::default();
        let mut min = DoubleSummary::new(SummaryMode::Min);
        let mut max = DoubleSummary::new(SummaryMode::Max);
        for value in [3.0, -1.0, 2.0] {
            sum.update(value);
            min.update(value);
            max.update(value);
        }
        assert_eq!(sum.value(), 4.0);
        assert_eq!(min.value(), -1.0);
        assert_eq!(max.value(), 3.0);
    }

    #[test]
    fn test_serialized_size() {
        let summary = DoubleSummary::with_value(2.5, SummaryMode::Min);
        let bytes = summary.serialize().unwrap();
        assert_eq!(bytes.len(), SERIALIZED_SIZE_BYTES);
        assert_eq!(bytes[8], 1);

        let (restored, size) = DoubleSummary::deserialize(SummaryType::Double, &bytes).unwrap();
        assert_eq!(size, SERIALIZED_SIZE_BYTES);
        assert_eq!(restored, summary);
    }

    #[test]
    fn test_deserialize_truncated() {
        let bytes = DoubleSummary::default().serialize().unwrap();
        assert!(DoubleSummary::deserialize(SummaryType::Double, &bytes[..8]).is_err());
    }
}
