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

//! Error types for tuple sketch operations

use std::fmt;

/// ErrorKind is all kinds of Error of tuple sketches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An argument or in-memory state cannot be represented in the binary format.
    InvalidArgument,
    /// The serial version of the sketch data is not supported.
    UnsupportedSerialVersion,
    /// The family id, sketch type or preamble size does not describe a compact tuple sketch.
    InvalidFamilyOrType,
    /// The sketch data was written on a platform with a different native byte order.
    ByteOrderMismatch,
    /// The sketch data deserializing is malformed.
    MalformedDeserializeData,
}

impl ErrorKind {
    /// Convert this error kind instance into static str.
    pub const fn into_static(self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::UnsupportedSerialVersion => "UnsupportedSerialVersion",
            ErrorKind::InvalidFamilyOrType => "InvalidFamilyOrType",
            ErrorKind::ByteOrderMismatch => "ByteOrderMismatch",
            ErrorKind::MalformedDeserializeData => "MalformedDeserializeData",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

/// Error is the error struct returned by all tuple sketch functions.
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::default(),
            source: None,
        }
    }

    /// Add more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Set source for error.
    ///
    /// # Panics
    ///
    /// Panics if the source has been set.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::error::Error as _;
    /// use datasketches_tuple::error::{Error, ErrorKind};
    ///
    /// let mut error = Error::new(ErrorKind::MalformedDeserializeData, "bad sketch");
    /// assert!(error.source().is_none());
    /// error = error.set_source(std::io::Error::new(std::io::ErrorKind::Other, "IO error"));
    /// assert!(error.source().is_some());
    /// ```
    pub fn set_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        assert!(self.source.is_none(), "the source error has been set");
        self.source = Some(src.into());
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return error's message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

// Crate-internal constructors shared by the codec and the summaries.
impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub(crate) fn deserial(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedDeserializeData, message)
    }

    pub(crate) fn insufficient_data(tag: impl fmt::Display) -> Self {
        Self::deserial(format!("insufficient data while reading {tag}"))
    }

    pub(crate) fn unsupported_serial_version(expected: u8, actual: u8) -> Self {
        Self::new(
            ErrorKind::UnsupportedSerialVersion,
            format!("serial version mismatch: expected {expected}, got {actual}"),
        )
    }

    pub(crate) fn invalid_family(expected: u8, actual: u8, name: &'static str) -> Self {
        Self::new(
            ErrorKind::InvalidFamilyOrType,
            format!("invalid family: expected {expected} ({name}), got {actual}"),
        )
    }

    pub(crate) fn invalid_preamble_longs(min: u8, max: u8, actual: u8) -> Self {
        Self::new(
            ErrorKind::InvalidFamilyOrType,
            format!("invalid preamble longs: expected [{min}, {max}], got {actual}"),
        )
    }

    pub(crate) fn invalid_sketch_type(expected: &'static str, actual: u8) -> Self {
        let actual_name = match crate::tuple::SketchType::from_id(actual) {
            Some(sketch_type) => sketch_type.name(),
            None => "unknown",
        };
        Self::new(
            ErrorKind::InvalidFamilyOrType,
            format!("sketch type mismatch: expected {expected}, got {actual} ({actual_name})"),
        )
    }

    pub(crate) fn byte_order_mismatch(serialized_big_endian: bool) -> Self {
        let order = |big: bool| if big { "big-endian" } else { "little-endian" };
        Self::new(
            ErrorKind::ByteOrderMismatch,
            format!(
                "byte order mismatch: sketch is {}, platform is {}",
                order(serialized_big_endian),
                order(cfg!(target_endian = "big"))
            ),
        )
    }

    pub(crate) fn unknown_summary_type(tag: &str) -> Self {
        Self::deserial(format!("unknown summary type: {tag:?}"))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // If alternate has been specified, we will print like Debug.
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("context", &self.context);
            de.field("source", &self.source);
            return de.finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "Source:")?;
            writeln!(f, "   {source:#}")?;
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            write!(
                f,
                "{}",
                self.context
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        if let Some(source) = &self.source {
            write!(f, ", source: {source}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|v| v.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_context_and_message() {
        let err = Error::unsupported_serial_version(1, 2).with_context("offset", 1);
        assert_eq!(err.kind(), ErrorKind::UnsupportedSerialVersion);
        let expected = "UnsupportedSerialVersion, context: { offset: 1 } \
            => serial version mismatch: expected 1, got 2";
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_insufficient_data_is_malformed() {
        let err = Error::insufficient_data("theta");
        assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
        assert_eq!(err.message(), "insufficient data while reading theta");
    }

    #[test]
    fn test_invalid_sketch_type_names_actual_type() {
        let err = Error::invalid_sketch_type("CompactSketch", 0);
        assert_eq!(err.kind(), ErrorKind::InvalidFamilyOrType);
        assert!(err.message().contains("QuickSelectSketch"));
    }
}
