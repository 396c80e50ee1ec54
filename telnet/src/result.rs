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

/// Result type for engine operations.
pub type TelnetResult<T> = Result<T, TelnetError>;

/// Connection-fatal errors.
///
/// Malformed input from the peer (bad negotiation sequences, corrupt
/// subnegotiation payloads, garbage GMCP) is never an error at this level: a
/// possibly-misbehaving peer must not be able to abort the session with a
/// single bad sequence, so those are logged and dropped inside the engine.
/// An `Err` from the engine means the connection cannot continue.
#[derive(Debug, thiserror::Error)]
pub enum TelnetError {
    /// The compressed sub-stream is corrupt beyond recovery. Continuing
    /// would desynchronize the stream.
    #[error("stream decompression failed: {reason}")]
    Inflate {
        /// What the inflater reported.
        reason: String,
    },

    /// The peer sent something our own negotiation logic promises can never
    /// arrive (e.g. CHARSET TTABLE-IS, which we never request). This
    /// indicates a local logic bug, not peer misbehavior.
    #[error("protocol contract violation: {reason}")]
    ContractViolation {
        /// Which contract was broken.
        reason: &'static str,
    },

    /// Transport-level failure surfaced through the codec traits.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
