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

//! Byte-level building blocks shared by the sketch serializers.
//!
//! Tuple sketches record multi-byte fields in the native byte order of the
//! process that wrote them (see the `IS_BIG_ENDIAN` flag), so the readers and
//! writers here always use [`NativeEndian`].

mod assert;
mod family;

pub(crate) use self::assert::ensure_serial_version_is;
pub(crate) use self::assert::insufficient_data;
pub use self::family::Family;

use std::io;
use std::io::Cursor;
use std::io::Read;

use byteorder::ByteOrder;
use byteorder::NativeEndian;
use byteorder::ReadBytesExt;

pub(crate) struct SketchBytes {
    bytes: Vec<u8>,
}

impl SketchBytes {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn write(&mut self, buf: &[u8]) {
        self.bytes.extend_from_slice(buf);
    }

    pub fn write_u8(&mut self, n: u8) {
        self.bytes.push(n);
    }

    pub fn write_i32_ne(&mut self, n: i32) {
        let mut buf = [0u8; 4];
        NativeEndian::write_i32(&mut buf, n);
        self.write(&buf);
    }

    pub fn write_u64_ne(&mut self, n: u64) {
        let mut buf = [0u8; 8];
        NativeEndian::write_u64(&mut buf, n);
        self.write(&buf);
    }

    pub fn write_f64_ne(&mut self, n: f64) {
        let mut buf = [0u8; 8];
        NativeEndian::write_f64(&mut buf, n);
        self.write(&buf);
    }
}

pub(crate) struct SketchSlice<'a> {
    slice: Cursor<&'a [u8]>,
}

impl<'a> SketchSlice<'a> {
    pub fn new(slice: &'a [u8]) -> Self {
        SketchSlice {
            slice: Cursor::new(slice),
        }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.slice.position() as usize
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.slice.get_ref().len().saturating_sub(self.position())
    }

    /// Returns the unread tail of the underlying slice without consuming it.
    pub fn remaining_slice(&self) -> &'a [u8] {
        let data = *self.slice.get_ref();
        &data[self.position().min(data.len())..]
    }

    pub fn advance(&mut self, n: usize) -> io::Result<()> {
        if n > self.remaining() {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof));
        }
        self.slice.set_position((self.position() + n) as u64);
        Ok(())
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.slice.read_exact(buf)
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        self.slice.read_u8()
    }

    pub fn read_i32_ne(&mut self) -> io::Result<i32> {
        self.slice.read_i32::<NativeEndian>()
    }

    pub fn read_u64_ne(&mut self) -> io::Result<u64> {
        self.slice.read_u64::<NativeEndian>()
    }

    pub fn read_f64_ne(&mut self) -> io::Result<f64> {
        self.slice.read_f64::<NativeEndian>()
    }
}
