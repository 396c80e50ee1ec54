//
// Copyright 2024-2026 The Mudlink Authors. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use byteorder::{BigEndian, ByteOrder};
use bytes::{BufMut, BytesMut};

use crate::consts;
use crate::option::OptionCode;

/// Write-side accumulator for telnet commands and subnegotiations.
///
/// Builds one logical command into a buffer, doubling IAC bytes per RFC 855
/// where required, and hands the finished bytes back with [`finish`] for the
/// caller to pass to the raw-send sink. Build-then-send keeps the "exactly
/// one send per logical command" guarantee explicit.
///
/// [`finish`]: TelnetFormatter::finish
#[derive(Default)]
pub struct TelnetFormatter {
    buffer: BytesMut,
}

impl TelnetFormatter {
    /// Creates an empty formatter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a byte verbatim, no escaping.
    pub fn add_raw(&mut self, byte: u8) {
        self.buffer.put_u8(byte);
    }

    /// Appends a payload byte, doubling it if it is IAC.
    pub fn add_escaped(&mut self, byte: u8) {
        self.add_raw(byte);
        if byte == consts::IAC {
            self.add_raw(byte);
        }
    }

    /// Appends a 16-bit value big-endian, each byte escaped.
    pub fn add_two_byte_escaped(&mut self, value: u16) {
        let mut raw = [0u8; 2];
        BigEndian::write_u16(&mut raw, value);
        self.add_escaped(raw[0]);
        self.add_escaped(raw[1]);
    }

    /// Appends a signed value clamped into the u16 range, escaped.
    pub fn add_clamped_two_byte_escaped(&mut self, value: i32) {
        let clamped = value.clamp(i32::from(u16::MIN), i32::from(u16::MAX));
        self.add_two_byte_escaped(clamped as u16);
    }

    /// Appends every byte of a slice, escaped.
    pub fn add_escaped_bytes(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.add_escaped(*byte);
        }
    }

    /// Appends `IAC <cmd>`.
    pub fn add_command(&mut self, cmd: u8) {
        self.add_raw(consts::IAC);
        self.add_raw(cmd);
    }

    /// Appends `IAC SB <option>`.
    pub fn add_subneg_begin(&mut self, option: OptionCode) {
        self.add_command(consts::SB);
        self.add_raw(option.raw());
    }

    /// Appends `IAC SE`.
    pub fn add_subneg_end(&mut self) {
        self.add_command(consts::SE);
    }

    /// Consumes the formatter and returns the accumulated wire bytes.
    pub fn finish(self) -> BytesMut {
        self.buffer
    }
}
