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

use bytes::BytesMut;

use crate::option::OptionCode;

///
/// One decoded telnet frame: a literal data byte, a two-byte command, a
/// three-byte negotiation, or a complete subnegotiation with its unescaped
/// payload.
///
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TelnetFrame {
    /// Literal data byte (IAC IAC has already been collapsed).
    Data(u8),
    /// No operation.
    NoOperation,
    /// End of urgent data stream.
    DataMark,
    /// Break.
    Break,
    /// Interrupt the current process.
    InterruptProcess,
    /// Cancel pending output.
    AbortOutput,
    /// Liveness probe; the engine answers it.
    AreYouThere,
    /// Erase the previous character.
    EraseCharacter,
    /// Erase the previous line.
    EraseLine,
    /// Prompt boundary for half-duplex peers.
    GoAhead,
    /// Prompt boundary when EOR has been negotiated.
    EndOfRecord,
    /// Peer wants to enable an option on its side.
    Will(OptionCode),
    /// Peer refuses (or disables) an option on its side.
    Wont(OptionCode),
    /// Peer asks us to enable an option.
    Do(OptionCode),
    /// Peer asks us to disable an option.
    Dont(OptionCode),
    /// Complete `IAC SB <option> ... IAC SE` block; the payload has doubled
    /// IACs collapsed and excludes the option byte.
    Subnegotiate(OptionCode, BytesMut),
}
