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

const SERIALIZED_SIZE_BYTES: usize = 5;

/// A summary holding a single `i32`, combined according to its [`SummaryMode`].
///
/// Sums wrap on overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerSummary {
    value: i32,
    mode: SummaryMode,
}

impl IntegerSummary {
    /// Creates a summary that has not seen any update yet.
    pub fn new(mode: SummaryMode) -> Self {
        let value = match mode {
            SummaryMode::Sum => 0,
            SummaryMode::Min => i32::MAX,
            SummaryMode::Max => i32::MIN,
        };
        Self { value, mode }
    }

    pub fn with_value(value: i32, mode: SummaryMode) -> Self {
        Self { value, mode }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn mode(&self) -> SummaryMode {
        self.mode
    }
}

impl Default for IntegerSummary {
    fn default() -> Self {
        Self::new(SummaryMode::Sum)
    }
}

impl UpdatableSummary<i32> for IntegerSummary {
    fn update(&mut self, value: i32) {
        match self.mode {
            SummaryMode::Sum => self.value = self.value.wrapping_add(value),
            SummaryMode::Min => self.value = self.value.min(value),
            SummaryMode::Max => self.value = self.value.max(value),
        }
    }
}

impl Summary for IntegerSummary {
    fn summary_type(&self) -> SummaryType {
        SummaryType::Integer
    }

    fn serialize(&self) -> Result<Vec<u8>, Error> {
        let mut bytes = SketchBytes::with_capacity(SERIALIZED_SIZE_BYTES);
        bytes.write_i32_ne(self.value);
        bytes.write_u8(self.mode.id());
        Ok(bytes.into_bytes())
    }

    fn deserialize(summary_type: SummaryType, bytes: &[u8]) -> Result<(Self, usize), Error> {
        summary_type.ensure_is(SummaryType::Integer)?;
        let mut cursor = SketchSlice::new(bytes);
        let value = cursor
            .read_i32_ne()
            .map_err(insufficient_data("integer_value"))?;
        let mode = cursor.read_u8().map_err(insufficient_data("integer_mode"))?;
        let mode = SummaryMode::from_id(mode)?;
        Ok((Self { value, mode }, cursor.position()))
    }
}
