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

//! MCCP2 (COMPRESS2) zlib inflate integration.

use bytes::BytesMut;
use flate2::{Decompress, FlushDecompress, Status};
use tracing::{debug, warn};

use crate::result::{TelnetError, TelnetResult};
use crate::scratch::ScratchBuffer;

/// Inflate output is staged through a fixed scratch buffer this large.
pub(crate) const INFLATE_CHUNK: usize = 1024;

/// The zlib flush-point marker an empty `Z_SYNC_FLUSH` leaves in the stream;
/// resynchronization scans for it, as zlib's `inflateSync` does.
const FLUSH_POINT: [u8; 4] = [0x00, 0x00, 0xFF, 0xFF];

/// Persistent inflate state for the COMPRESS2 sub-stream.
///
/// The decompressor object lives as long as the engine; renegotiation resets
/// its state rather than reallocating it. While inactive, raw bytes bypass
/// this entirely.
pub struct TelnetInflater {
    stream: Decompress,
    active: bool,
}

impl Default for TelnetInflater {
    fn default() -> Self {
        TelnetInflater {
            stream: Decompress::new(true),
            active: false,
        }
    }
}

impl TelnetInflater {
    /// Creates an inactive inflater.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether raw input is currently routed through inflate.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Arms the inflater after a COMPRESS2 marker: the stream state is reset
    /// (not reallocated) and every subsequent byte is treated as compressed.
    pub fn begin(&mut self) {
        debug!("compressed sub-stream starts");
        self.stream.reset(true);
        self.active = true;
    }

    /// Drops out of compressed mode without touching the stream state.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Inflates as much of `input` as possible, appending plaintext to
    /// `sink`. Returns how many input bytes were consumed; a short count
    /// means the caller must retain the tail for the next delivery.
    ///
    /// A clean `Z_STREAM_END` deactivates the inflater: the remote may
    /// legitimately stop compressing mid-session, and the remaining bytes
    /// are plaintext again. A data error gets one resynchronization attempt
    /// at the next flush point; everything else is connection-fatal.
    pub fn inflate(&mut self, input: &[u8], sink: &mut BytesMut) -> TelnetResult<usize> {
        let mut scratch = ScratchBuffer::<INFLATE_CHUNK>::new();
        let mut consumed = 0;
        let mut resynced = false;
        while consumed < input.len() && self.active {
            let before_in = self.stream.total_in();
            let before_out = self.stream.total_out();
            let result = self.stream.decompress(
                &input[consumed..],
                scratch.storage_mut(),
                FlushDecompress::None,
            );
            match result {
                Ok(status) => {
                    let took = (self.stream.total_in() - before_in) as usize;
                    let made = (self.stream.total_out() - before_out) as usize;
                    consumed += took;
                    scratch.set_filled(made);
                    sink.extend_from_slice(scratch.filled());
                    scratch.clear();
                    match status {
                        Status::StreamEnd => {
                            debug!("compressed sub-stream ended cleanly");
                            self.active = false;
                        }
                        Status::Ok => {}
                        Status::BufError => {
                            if took == 0 && made == 0 {
                                // needs more input than we have buffered
                                break;
                            }
                        }
                    }
                }
                Err(err) => {
                    if resynced {
                        return Err(TelnetError::Inflate {
                            reason: err.to_string(),
                        });
                    }
                    resynced = true;
                    match find_flush_point(&input[consumed..]) {
                        Some(offset) => {
                            warn!("corrupt compressed data, resyncing at next flush point");
                            consumed += offset;
                            self.stream.reset(false);
                        }
                        None => {
                            return Err(TelnetError::Inflate {
                                reason: err.to_string(),
                            });
                        }
                    }
                }
            }
        }
        Ok(consumed)
    }
}

/// Offset just past the next flush-point marker, if one is present.
fn find_flush_point(input: &[u8]) -> Option<usize> {
    input
        .windows(FLUSH_POINT.len())
        .position(|window| window == FLUSH_POINT)
        .map(|pos| pos + FLUSH_POINT.len())
}
