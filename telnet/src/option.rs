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

//! Option codes and per-connection negotiation state tables.

use std::fmt;

use crate::consts;

/// A telnet option code. A distinct value type so option codes cannot be
/// confused with command bytes or other byte-sized codes.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct OptionCode(u8);

impl OptionCode {
    /// Echo (RFC 857).
    pub const ECHO: OptionCode = OptionCode(consts::option::ECHO);
    /// Suppress go-ahead (RFC 858).
    pub const SUPPRESS_GA: OptionCode = OptionCode(consts::option::SUPPRESS_GA);
    /// Status (RFC 859).
    pub const STATUS: OptionCode = OptionCode(consts::option::STATUS);
    /// Timing mark (RFC 860).
    pub const TIMING_MARK: OptionCode = OptionCode(consts::option::TIMING_MARK);
    /// Terminal type (RFC 1091).
    pub const TERMINAL_TYPE: OptionCode = OptionCode(consts::option::TERMINAL_TYPE);
    /// End of record (RFC 885).
    pub const EOR: OptionCode = OptionCode(consts::option::EOR);
    /// Negotiate about window size (RFC 1073).
    pub const NAWS: OptionCode = OptionCode(consts::option::NAWS);
    /// Linemode (RFC 1184).
    pub const LINEMODE: OptionCode = OptionCode(consts::option::LINEMODE);
    /// Charset (RFC 2066).
    pub const CHARSET: OptionCode = OptionCode(consts::option::CHARSET);
    /// MUD server status protocol.
    pub const MSSP: OptionCode = OptionCode(consts::option::MSSP);
    /// MCCP2 zlib compression.
    pub const COMPRESS2: OptionCode = OptionCode(consts::option::COMPRESS2);
    /// Generic MUD communication protocol.
    pub const GMCP: OptionCode = OptionCode(consts::option::GMCP);

    /// Raw option byte.
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Name for diagnostics; unrecognized options print their number.
    pub fn name(self) -> &'static str {
        match self.0 {
            consts::option::ECHO => "ECHO",
            consts::option::SUPPRESS_GA => "SUPPRESS_GA",
            consts::option::STATUS => "STATUS",
            consts::option::TIMING_MARK => "TIMING_MARK",
            consts::option::TERMINAL_TYPE => "TERMINAL_TYPE",
            consts::option::EOR => "EOR",
            consts::option::NAWS => "NAWS",
            consts::option::LINEMODE => "LINEMODE",
            consts::option::CHARSET => "CHARSET",
            consts::option::MSSP => "MSSP",
            consts::option::COMPRESS2 => "COMPRESS2",
            consts::option::GMCP => "GMCP",
            _ => "",
        }
    }
}

impl From<u8> for OptionCode {
    fn from(byte: u8) -> Self {
        OptionCode(byte)
    }
}

impl From<OptionCode> for u8 {
    fn from(option: OptionCode) -> Self {
        option.0
    }
}

impl fmt::Display for OptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        if name.is_empty() {
            write!(f, "{}", self.0)
        } else {
            f.write_str(name)
        }
    }
}

impl fmt::Debug for OptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// The four parallel negotiation-state tables, indexed by raw option byte.
///
/// `my_state`/`his_state` track which side currently has each option enabled;
/// `announced`/`he_announced` record whether a WILL/WONT has already been sent
/// in that direction. A DO/DONT is sent at most once per state transition:
/// re-announcing an already-settled option is suppressed by consulting these
/// tables first, which is the anti-loop mechanism mandated by RFC 854.
#[derive(Clone)]
pub struct OptionTables {
    my_state: [bool; 256],
    his_state: [bool; 256],
    announced: [bool; 256],
    he_announced: [bool; 256],
}

impl Default for OptionTables {
    fn default() -> Self {
        OptionTables {
            my_state: [false; 256],
            his_state: [false; 256],
            announced: [false; 256],
            he_announced: [false; 256],
        }
    }
}

impl OptionTables {
    /// Whether this option is enabled on our side.
    pub fn my(&self, option: OptionCode) -> bool {
        self.my_state[option.raw() as usize]
    }

    /// Whether the peer has this option enabled.
    pub fn his(&self, option: OptionCode) -> bool {
        self.his_state[option.raw() as usize]
    }

    /// Whether we have already announced WILL/WONT for this option.
    pub fn announced(&self, option: OptionCode) -> bool {
        self.announced[option.raw() as usize]
    }

    /// Whether the peer has already announced WILL/WONT for this option.
    pub fn he_announced(&self, option: OptionCode) -> bool {
        self.he_announced[option.raw() as usize]
    }

    /// Sets the local enable state.
    pub fn set_my(&mut self, option: OptionCode, enabled: bool) {
        self.my_state[option.raw() as usize] = enabled;
    }

    /// Sets the peer enable state.
    pub fn set_his(&mut self, option: OptionCode, enabled: bool) {
        self.his_state[option.raw() as usize] = enabled;
    }

    /// Records that we announced this option.
    pub fn set_announced(&mut self, option: OptionCode, announced: bool) {
        self.announced[option.raw() as usize] = announced;
    }

    /// Records that the peer announced this option.
    pub fn set_he_announced(&mut self, option: OptionCode, announced: bool) {
        self.he_announced[option.raw() as usize] = announced;
    }

    /// Iterates every option code with its (my, his) enable state set.
    pub fn enabled_entries(&self) -> impl Iterator<Item = (OptionCode, bool, bool)> + '_ {
        (0u16..256).filter_map(move |i| {
            let my = self.my_state[i as usize];
            let his = self.his_state[i as usize];
            (my || his).then(|| (OptionCode(i as u8), my, his))
        })
    }

    /// Clears all four tables (used by `reset()` on reconnect).
    pub fn reset(&mut self) {
        *self = OptionTables::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_start_clear() {
        let tables = OptionTables::default();
        assert!(!tables.my(OptionCode::ECHO));
        assert!(!tables.his(OptionCode::ECHO));
        assert!(!tables.announced(OptionCode::ECHO));
        assert!(!tables.he_announced(OptionCode::ECHO));
    }

    #[test]
    fn reset_clears_everything() {
        let mut tables = OptionTables::default();
        tables.set_my(OptionCode::NAWS, true);
        tables.set_his(OptionCode::GMCP, true);
        tables.set_announced(OptionCode::NAWS, true);
        tables.set_he_announced(OptionCode::GMCP, true);
        tables.reset();
        assert!(!tables.my(OptionCode::NAWS));
        assert!(!tables.his(OptionCode::GMCP));
        assert!(!tables.announced(OptionCode::NAWS));
        assert!(!tables.he_announced(OptionCode::GMCP));
    }

    #[test]
    fn enabled_entries_reports_both_sides() {
        let mut tables = OptionTables::default();
        tables.set_my(OptionCode::NAWS, true);
        tables.set_his(OptionCode::SUPPRESS_GA, true);
        let entries: Vec<_> = tables.enabled_entries().collect();
        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&(OptionCode::SUPPRESS_GA, false, true)));
        assert!(entries.contains(&(OptionCode::NAWS, true, false)));
    }

    #[test]
    fn option_code_display() {
        assert_eq!(OptionCode::CHARSET.to_string(), "CHARSET");
        assert_eq!(OptionCode::from(99).to_string(), "99");
    }
}
