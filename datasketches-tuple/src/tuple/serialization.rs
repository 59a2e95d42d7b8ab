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

//! Binary serialization format constants for Tuple sketches
//!
//! # Compact Sketch Binary Format
//!
//! All multi-byte fields are written in the native byte order of the producing
//! process; the `IS_BIG_ENDIAN` flag records which one it was.
//!
//! ## Preamble Layout
//!
//! | Byte | Field | Description |
//! |------|-------|-------------|
//! | 0 | preamble_longs | Always 1 |
//! | 1 | serial_version | Serialization version (currently 1) |
//! | 2 | family_id | Family ID (9 for Tuple) |
//! | 3 | sketch_type | Sketch type (1 for CompactSketch) |
//! | 4 | flags | Bit flags (see below) |
//!
//! If IS_THETA_INCLUDED is set, theta follows as a 64-bit integer.
//!
//! If HAS_ENTRIES is set:
//! | Size | Field | Description |
//! |------|-------|-------------|
//! | 1 | tag_length | Length of the summary type tag in bytes |
//! | 4 | count | Number of retained entries (signed) |
//! | tag_length | tag | UTF-8 summary type tag |
//! | 8 * count | keys | Retained hash keys in stored order |
//! | variable | summaries | Serialized summaries, one per key |
//!
//! ## Flags (Byte 4)
//!
//! | Bit | Name | Description |
//! |-----|------|-------------|
//! | 0 | IS_BIG_ENDIAN | Written on a big-endian platform |
//! | 1 | IS_EMPTY | Sketch is empty |
//! | 2 | HAS_ENTRIES | Keys and summaries follow |
//! | 3 | IS_THETA_INCLUDED | Theta follows the flags byte |

use super::SummaryType;
use crate::error::Error;

pub const PREAMBLE_LONGS: u8 = 1;
pub const SERIAL_VERSION: u8 = 1;

pub const FLAG_IS_BIG_ENDIAN: u8 = 1 << 0;
pub const FLAG_IS_EMPTY: u8 = 1 << 1;
pub const FLAG_HAS_ENTRIES: u8 = 1 << 2;
pub const FLAG_IS_THETA_INCLUDED: u8 = 1 << 3;

/// Theta of a sketch that has not been thresholded.
pub const MAX_THETA: u64 = i64::MAX as u64;

/// Bytes before the optional theta field.
pub const PREAMBLE_BYTES: usize = 5;
pub const THETA_SIZE_BYTES: usize = 8;
pub const HASH_SIZE_BYTES: usize = 8;
/// Tag length byte plus the entry count.
pub const ENTRIES_HEADER_BYTES: usize = 1 + 4;

/// The tag length is recorded in a single byte.
pub const MAX_TAG_LENGTH: usize = u8::MAX as usize;

const _: () = {
    assert!(SummaryType::Double.tag().len() <= MAX_TAG_LENGTH);
    assert!(SummaryType::Integer.tag().len() <= MAX_TAG_LENGTH);
    assert!(SummaryType::ArrayOfStrings.tag().len() <= MAX_TAG_LENGTH);
};

/// Kinds of sketches in the tuple family, in the order of their wire ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SketchType {
    QuickSelectSketch,
    CompactSketch,
    ArrayOfDoublesQuickSelectSketch,
    ArrayOfDoublesCompactSketch,
    ArrayOfDoublesUnion,
}

impl SketchType {
    /// Returns the byte written to the sketch type field.
    pub fn id(self) -> u8 {
        match self {
            SketchType::QuickSelectSketch => 0,
            SketchType::CompactSketch => 1,
            SketchType::ArrayOfDoublesQuickSelectSketch => 2,
            SketchType::ArrayOfDoublesCompactSketch => 3,
            SketchType::ArrayOfDoublesUnion => 4,
        }
    }

    /// Looks up a sketch type by its wire id.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(SketchType::QuickSelectSketch),
            1 => Some(SketchType::CompactSketch),
            2 => Some(SketchType::ArrayOfDoublesQuickSelectSketch),
            3 => Some(SketchType::ArrayOfDoublesCompactSketch),
            4 => Some(SketchType::ArrayOfDoublesUnion),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SketchType::QuickSelectSketch => "QuickSelectSketch",
            SketchType::CompactSketch => "CompactSketch",
            SketchType::ArrayOfDoublesQuickSelectSketch => "ArrayOfDoublesQuickSelectSketch",
            SketchType::ArrayOfDoublesCompactSketch => "ArrayOfDoublesCompactSketch",
            SketchType::ArrayOfDoublesUnion => "ArrayOfDoublesUnion",
        }
    }

    /// Checks that the serialized sketch type byte is this type.
    pub fn validate(self, sketch_type: u8) -> Result<(), Error> {
        if sketch_type == self.id() {
            Ok(())
        } else {
            Err(Error::invalid_sketch_type(self.name(), sketch_type))
        }
    }
}
