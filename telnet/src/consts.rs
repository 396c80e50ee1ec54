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

//! Telnet wire constants (RFC 854/855 and friends).

/// End of subnegotiation.
pub const SE: u8 = 240;
/// No operation.
pub const NOP: u8 = 241;
/// Data mark (Synch).
pub const DM: u8 = 242;
/// Break.
pub const BRK: u8 = 243;
/// Interrupt process.
pub const IP: u8 = 244;
/// Abort output.
pub const AO: u8 = 245;
/// Are you there.
pub const AYT: u8 = 246;
/// Erase character.
pub const EC: u8 = 247;
/// Erase line.
pub const EL: u8 = 248;
/// Go ahead.
pub const GA: u8 = 249;
/// Begin subnegotiation.
pub const SB: u8 = 250;
/// Option negotiation: sender wants to enable an option on its side.
pub const WILL: u8 = 251;
/// Option negotiation: sender refuses an option on its side.
pub const WONT: u8 = 252;
/// Option negotiation: sender asks the receiver to enable an option.
pub const DO: u8 = 253;
/// Option negotiation: sender asks the receiver to disable an option.
pub const DONT: u8 = 254;
/// Interpret as command.
pub const IAC: u8 = 255;

/// End of record marker (RFC 885), sent after prompts when negotiated.
pub const EOR: u8 = 239;

/// Carriage return.
pub const CR: u8 = 0x0D;
/// Line feed.
pub const LF: u8 = 0x0A;

/// Telnet option codes negotiated by this engine.
pub mod option {
    /// Echo (RFC 857).
    pub const ECHO: u8 = 1;
    /// Suppress go-ahead (RFC 858).
    pub const SUPPRESS_GA: u8 = 3;
    /// Status (RFC 859).
    pub const STATUS: u8 = 5;
    /// Timing mark (RFC 860).
    pub const TIMING_MARK: u8 = 6;
    /// Terminal type (RFC 1091).
    pub const TERMINAL_TYPE: u8 = 24;
    /// End of record (RFC 885).
    pub const EOR: u8 = 25;
    /// Negotiate about window size (RFC 1073).
    pub const NAWS: u8 = 31;
    /// Linemode (RFC 1184).
    pub const LINEMODE: u8 = 34;
    /// Charset (RFC 2066).
    pub const CHARSET: u8 = 42;
    /// MUD server status protocol.
    pub const MSSP: u8 = 70;
    /// MUD client compression protocol, version 2 (zlib).
    pub const COMPRESS2: u8 = 86;
    /// Generic MUD communication protocol.
    pub const GMCP: u8 = 201;
}

/// Subnegotiation verb bytes shared by STATUS, TERMINAL-TYPE and CHARSET.
pub mod subneg {
    /// `IS` reply verb.
    pub const IS: u8 = 0;
    /// `SEND` request verb (STATUS, TERMINAL-TYPE).
    pub const SEND: u8 = 1;
    /// `REQUEST` verb (CHARSET; same value as SEND).
    pub const REQUEST: u8 = 1;
    /// CHARSET `ACCEPTED`.
    pub const ACCEPTED: u8 = 2;
    /// CHARSET `REJECTED`.
    pub const REJECTED: u8 = 3;
    /// CHARSET `TTABLE-IS` (never requested by us).
    pub const TTABLE_IS: u8 = 4;
    /// CHARSET `TTABLE-REJECTED`.
    pub const TTABLE_REJECTED: u8 = 5;
    /// CHARSET `TTABLE-ACK`.
    pub const TTABLE_ACK: u8 = 6;
    /// CHARSET `TTABLE-NAK`.
    pub const TTABLE_NAK: u8 = 7;
}

/// Linemode (RFC 1184) subnegotiation bytes.
pub mod linemode {
    /// `MODE` suboption.
    pub const MODE: u8 = 1;
    /// `EDIT` mode bit: the client edits lines locally.
    pub const MODE_EDIT: u8 = 1;
}

/// Human-readable command name for diagnostics.
pub fn command_name(cmd: u8) -> &'static str {
    match cmd {
        SE => "SE",
        NOP => "NOP",
        DM => "DM",
        BRK => "BRK",
        IP => "IP",
        AO => "AO",
        AYT => "AYT",
        EC => "EC",
        EL => "EL",
        GA => "GA",
        SB => "SB",
        WILL => "WILL",
        WONT => "WONT",
        DO => "DO",
        DONT => "DONT",
        IAC => "IAC",
        EOR => "EOR",
        _ => "?",
    }
}
