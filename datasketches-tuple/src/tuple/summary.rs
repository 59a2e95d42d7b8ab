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

//! Summaries attached to the retained keys of a tuple sketch.

use super::ArrayOfStringsSummary;
use super::DoubleSummary;
use super::IntegerSummary;
use crate::error::Error;

/// A value associated with every key retained by a tuple sketch.
///
/// Implementations must be self-delimiting on the wire: [`Summary::deserialize`] is handed the
/// remainder of the sketch buffer and reports how many bytes it consumed.
pub trait Summary: Clone {
    /// Returns the variant of this summary, which selects the type tag written to the sketch.
    fn summary_type(&self) -> SummaryType;

    /// Serializes this summary on its own.
    fn serialize(&self) -> Result<Vec<u8>, Error>;

    /// Deserializes a summary of `summary_type` from the start of `bytes`.
    ///
    /// Returns the summary and the number of bytes consumed.
    fn deserialize(summary_type: SummaryType, bytes: &[u8]) -> Result<(Self, usize), Error>;
}

/// A summary that can absorb further observations of its key.
pub trait UpdatableSummary<U>: Summary {
    /// Combines `value` into this summary.
    fn update(&mut self, value: U);
}

/// The summary variants known to the serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryType {
    /// [`DoubleSummary`]
    Double,
    /// [`IntegerSummary`]
    Integer,
    /// [`ArrayOfStringsSummary`]
    ArrayOfStrings,
}

impl SummaryType {
    /// Returns the tag that identifies this variant in serialized sketches.
    pub const fn tag(self) -> &'static str {
        match self {
            SummaryType::Double => "com.yahoo.sketches.tuple.DoubleSummary",
            SummaryType::Integer => "com.yahoo.sketches.tuple.aninteger.IntegerSummary",
            SummaryType::ArrayOfStrings => "com.yahoo.sketches.tuple.strings.ArrayOfStringsSummary",
        }
    }

    /// Looks up the variant recorded under `tag`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        [
            SummaryType::Double,
            SummaryType::Integer,
            SummaryType::ArrayOfStrings,
        ]
        .into_iter()
        .find(|summary_type| summary_type.tag() == tag)
    }

    pub(crate) fn ensure_is(self, expected: SummaryType) -> Result<(), Error> {
        if self == expected {
            Ok(())
        } else {
            Err(Error::deserial(format!(
                "summary type mismatch: expected {expected:?}, got {self:?}"
            )))
        }
    }
}

/// How a numeric summary combines updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SummaryMode {
    /// Adds every update to the value.
    #[default]
    Sum,
    /// Keeps the smallest update.
    Min,
    /// Keeps the largest update.
    Max,
}

impl SummaryMode {
    pub(crate) fn id(self) -> u8 {
        match self {
            SummaryMode::Sum => 0,
            SummaryMode::Min => 1,
            SummaryMode::Max => 2,
        }
    }

    pub(crate) fn from_id(id: u8) -> Result<Self, Error> {
        match id {
            0 => Ok(SummaryMode::Sum),
            1 => Ok(SummaryMode::Min),
            2 => Ok(SummaryMode::Max),
            _ => Err(Error::deserial(format!("invalid summary mode: {id}"))),
        }
    }
}

/// Any of the built-in summaries.
///
/// Use this when the summary variant of a serialized sketch is not known in advance. A sketch of
/// `AnySummary` can only be serialized if all of its summaries are the same variant.
#[derive(Debug, Clone, PartialEq)]
pub enum AnySummary {
    Double(DoubleSummary),
    Integer(IntegerSummary),
    ArrayOfStrings(ArrayOfStringsSummary),
}

impl Summary for AnySummary {
    fn summary_type(&self) -> SummaryType {
        match self {
            AnySummary::Double(_) => SummaryType::Double,
            AnySummary::Integer(_) => SummaryType::Integer,
            AnySummary::ArrayOfStrings(_) => SummaryType::ArrayOfStrings,
        }
    }

    fn serialize(&self) -> Result<Vec<u8>, Error> {
        match self {
            AnySummary::Double(summary) => summary.serialize(),
            AnySummary::Integer(summary) => summary.serialize(),
            AnySummary::ArrayOfStrings(summary) => summary.serialize(),
        }
    }

    fn deserialize(summary_type: SummaryType, bytes: &[u8]) -> Result<(Self, usize), Error> {
        match summary_type {
            SummaryType::Double => DoubleSummary::deserialize(summary_type, bytes)
                .map(|(summary, size)| (AnySummary::Double(summary), size)),
            SummaryType::Integer => IntegerSummary::deserialize(summary_type, bytes)
                .map(|(summary, size)| (AnySummary::Integer(summary), size)),
            SummaryType::ArrayOfStrings => ArrayOfStringsSummary::deserialize(summary_type, bytes)
                .map(|(summary, size)| (AnySummary::ArrayOfStrings(summary), size)),
        }
    }
}

impl From<DoubleSummary> for AnySummary {
    fn from(summary: DoubleSummary) -> Self {
        AnySummary::Double(summary)
    }
}

impl From<IntegerSummary> for AnySummary {
    fn from(summary: IntegerSummary) -> Self {
        AnySummary::Integer(summary)
    }
}

impl From<ArrayOfStringsSummary> for AnySummary {
    fn from(summary: ArrayOfStringsSummary) -> Self {
        AnySummary::ArrayOfStrings(summary)
    }
}
