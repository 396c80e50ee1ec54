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

//! The per-endpoint telnet protocol engine.
//!
//! Converts a raw, untrusted byte stream from one peer into a clean
//! application-data stream plus side-channel events, and symmetrically
//! produces correctly escaped wire bytes for transmission. One engine exists
//! per connection endpoint (user side, mud side); each runs independently
//! with its own option state, charset, inflate state and GMCP registry.
//!
//! Endpoint policy is injected once as a [`TelnetHandler`]; the engine never
//! blocks and is only ever touched from the thread that owns its socket.

use byteorder::{BigEndian, ByteOrder};
use bytes::{BufMut, BytesMut};
use mudlink_gmcp::{
    GmcpError, GmcpMessage, GmcpMessageType, GmcpModule, GmcpModuleSet, GmcpModuleType,
    GmcpModuleVersion, GmcpModuleVersionList,
};
use tokio_util::codec::Decoder;
use tracing::{debug, trace, warn};

use crate::charset::TextCodec;
use crate::codec::TelnetCodec;
use crate::compress::TelnetInflater;
use crate::consts;
use crate::formatter::TelnetFormatter;
use crate::frame::TelnetFrame;
use crate::handler::TelnetHandler;
use crate::option::{OptionCode, OptionTables};
use crate::result::{TelnetError, TelnetResult};

/// Options we accept the peer enabling on its side (`WILL` → `DO`).
const HIS_ALLOWED: &[OptionCode] = &[
    OptionCode::SUPPRESS_GA,
    OptionCode::STATUS,
    OptionCode::TERMINAL_TYPE,
    OptionCode::NAWS,
    OptionCode::ECHO,
    OptionCode::CHARSET,
    OptionCode::COMPRESS2,
    OptionCode::GMCP,
    OptionCode::MSSP,
    OptionCode::LINEMODE,
    OptionCode::EOR,
];

/// Options we accept enabling on our side (`DO` → `WILL`). ECHO is absent:
/// the remote never tells us to echo, echo is purely something we offer.
const MY_ALLOWED: &[OptionCode] = &[
    OptionCode::SUPPRESS_GA,
    OptionCode::STATUS,
    OptionCode::TERMINAL_TYPE,
    OptionCode::NAWS,
    OptionCode::CHARSET,
    OptionCode::GMCP,
    OptionCode::LINEMODE,
    OptionCode::EOR,
];

/// The telnet protocol state machine for one connection endpoint.
pub struct TelnetEngine<H: TelnetHandler> {
    handler: H,
    codec: TelnetCodec,
    options: OptionTables,
    text_codec: TextCodec,
    inflater: TelnetInflater,
    gmcp_modules: GmcpModuleSet,
    gmcp_supported: GmcpModuleVersionList,
    /// Staging for raw socket bytes; only the compressed path can leave a
    /// tail here between deliveries.
    raw: BytesMut,
    /// Clean application bytes awaiting the next GA/EOR flush.
    clean: BytesMut,
    term_type: String,
    window: (u16, u16),
    sent_bytes: u64,
}

impl<H: TelnetHandler> TelnetEngine<H> {
    /// Creates an engine with the given endpoint policy and charset codec.
    pub fn new(handler: H, text_codec: TextCodec) -> Self {
        TelnetEngine {
            handler,
            codec: TelnetCodec::new(),
            options: OptionTables::default(),
            text_codec,
            inflater: TelnetInflater::new(),
            gmcp_modules: GmcpModuleSet::new(),
            gmcp_supported: GmcpModuleVersionList::default(),
            raw: BytesMut::new(),
            clean: BytesMut::new(),
            term_type: "unknown".to_owned(),
            window: (80, 24),
            sent_bytes: 0,
        }
    }

    /// Abandons all negotiated state: option tables, parse state, buffers,
    /// the GMCP module registry and the compression flag. Safe to call at
    /// any time, used whenever the underlying connection is dropped.
    pub fn reset(&mut self) {
        self.options.reset();
        self.codec.reset();
        self.inflater.deactivate();
        self.gmcp_modules.clear();
        self.gmcp_supported.clear();
        self.raw.clear();
        self.clean.clear();
        self.sent_bytes = 0;
    }

    // #### queries and configuration ########################################

    /// The injected endpoint policy.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutable access to the injected endpoint policy.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// The active charset codec.
    pub fn text_codec(&self) -> &TextCodec {
        &self.text_codec
    }

    /// Mutable access to the charset codec (configuration changes).
    pub fn text_codec_mut(&mut self) -> &mut TextCodec {
        &mut self.text_codec
    }

    /// Whether this option is currently enabled on our side.
    pub fn my_option(&self, option: OptionCode) -> bool {
        self.options.my(option)
    }

    /// Whether this option is currently enabled on the peer's side.
    pub fn his_option(&self, option: OptionCode) -> bool {
        self.options.his(option)
    }

    /// Total raw bytes handed to the transport so far.
    pub fn sent_bytes(&self) -> u64 {
        self.sent_bytes
    }

    /// The terminal type reported on TERMINAL-TYPE SEND.
    pub fn terminal_type(&self) -> &str {
        &self.term_type
    }

    /// Sets the terminal type reported on TERMINAL-TYPE SEND.
    pub fn set_terminal_type(&mut self, term_type: impl Into<String>) {
        self.term_type = term_type.into();
    }

    /// Remembers the window dimensions reported by NAWS. They are needed
    /// even while NAWS is disabled, in case it gets enabled later.
    pub fn set_window_size(&mut self, width: u16, height: u16) {
        self.window = (width, height);
    }

    /// The remembered NAWS dimensions.
    pub fn window_size(&self) -> (u16, u16) {
        self.window
    }

    /// Modules the peer registered via `Core.Supports.*`.
    pub fn gmcp_modules(&self) -> impl Iterator<Item = &GmcpModule> {
        self.gmcp_modules.iter()
    }

    /// True iff GMCP is negotiated on our side and this module family was
    /// enabled with a version.
    pub fn is_gmcp_module_enabled(&self, ty: GmcpModuleType) -> bool {
        self.options.my(OptionCode::GMCP)
            && self.gmcp_supported.get(ty) != GmcpModuleVersion::DEFAULT
    }

    // #### receive path ######################################################

    /// Feeds arbitrary-length peer input. Clean data reaches the handler's
    /// `send_to_mapper` at every GA/EOR boundary and once at end of input;
    /// negotiation replies go out through `send_raw_data` as side effects.
    ///
    /// Malformed telnet never errors: a misbehaving peer must not be able to
    /// kill the session with one bad sequence. An `Err` here means the
    /// connection is dead (unrecoverable decompression state or a local
    /// contract violation).
    pub fn on_read(&mut self, data: &[u8]) -> TelnetResult<()> {
        self.raw.extend_from_slice(data);
        self.process_raw()?;
        if !self.clean.is_empty() {
            self.flush_clean(false);
        }
        Ok(())
    }

    fn process_raw(&mut self) -> TelnetResult<()> {
        loop {
            if self.inflater.is_active() {
                let input = self.raw.split();
                let mut inflated = BytesMut::new();
                let consumed = self.inflater.inflate(&input, &mut inflated)?;
                self.parse_buffer(&mut inflated)?;
                if consumed < input.len() {
                    // either the sub-stream ended (tail is plaintext) or the
                    // inflater needs more input than we have
                    self.raw.extend_from_slice(&input[consumed..]);
                    if self.inflater.is_active() {
                        return Ok(());
                    }
                    continue;
                }
                return Ok(());
            }

            // plaintext parse; stops early if a COMPRESS2 marker arms the
            // inflater so that the very next byte goes through inflate
            while !self.inflater.is_active() {
                match self.codec.decode(&mut self.raw)? {
                    Some(frame) => self.handle_frame(frame)?,
                    None => return Ok(()),
                }
            }
        }
    }

    fn parse_buffer(&mut self, buffer: &mut BytesMut) -> TelnetResult<()> {
        while let Some(frame) = self.codec.decode(buffer)? {
            self.handle_frame(frame)?;
        }
        Ok(())
    }

    fn handle_frame(&mut self, frame: TelnetFrame) -> TelnetResult<()> {
        match frame {
            TelnetFrame::Data(byte) => self.clean.put_u8(byte),
            TelnetFrame::GoAhead | TelnetFrame::EndOfRecord => self.flush_clean(true),
            TelnetFrame::AreYouThere => self.send_are_you_there(),
            TelnetFrame::Will(option) => self.on_will(option),
            TelnetFrame::Wont(option) => self.on_wont(option),
            TelnetFrame::Do(option) => self.on_do(option),
            TelnetFrame::Dont(option) => self.on_dont(option),
            TelnetFrame::Subnegotiate(option, payload) => {
                self.process_subnegotiation(option, &payload)?;
            }
            other => trace!("ignoring telnet command {other:?}"),
        }
        Ok(())
    }

    fn flush_clean(&mut self, go_ahead: bool) {
        let chunk = self.clean.split();
        self.handler.send_to_mapper(&chunk, go_ahead);
    }

    // #### option negotiation ###############################################

    /// The peer wants to enable an option on its side.
    fn on_will(&mut self, option: OptionCode) {
        debug!("received WILL {option}");
        self.options.set_he_announced(option, true);
        if self.options.his(option) {
            // option announcement may not repeat unless requested (RFC 854)
            debug!("his option {option} was already enabled");
            return;
        }
        if !self.options.my(option) {
            if HIS_ALLOWED.contains(&option) {
                self.send_option(consts::DO, option);
                self.options.set_his(option, true);
                match option {
                    OptionCode::ECHO => self.handler.receive_echo_mode(false),
                    OptionCode::LINEMODE => self.send_linemode_edit(),
                    OptionCode::GMCP => self.announce_gmcp(),
                    _ => {}
                }
            } else {
                self.send_option(consts::DONT, option);
                self.options.set_his(option, false);
            }
        } else if option == OptionCode::TERMINAL_TYPE {
            self.send_terminal_type_request();
        }
    }

    /// The peer refuses (or disables) an option on its side.
    fn on_wont(&mut self, option: OptionCode) {
        debug!("received WONT {option}");
        if !self.options.my(option)
            && (self.options.his(option) || !self.options.he_announced(option))
        {
            // acknowledge with DONT where RFC 854 requires it
            self.send_option(consts::DONT, option);
            self.options.set_his(option, false);
            if option == OptionCode::ECHO {
                self.handler.receive_echo_mode(true);
            }
        }
        self.options.set_he_announced(option, true);
    }

    /// The peer wants us to enable an option on our side.
    fn on_do(&mut self, option: OptionCode) {
        debug!("received DO {option}");
        if option == OptionCode::TIMING_MARK {
            // a liveness ping, always accepted
            self.send_option(consts::WILL, option);
            return;
        }
        if !self.options.my(option) {
            if MY_ALLOWED.contains(&option) {
                self.send_option(consts::WILL, option);
                self.options.set_my(option, true);
                self.options.set_announced(option, true);
            } else {
                self.send_option(consts::WONT, option);
                self.options.set_my(option, false);
                self.options.set_announced(option, true);
            }
        } else {
            debug!("my option {option} was already enabled");
        }
        if self.options.my(OptionCode::NAWS) && option == OptionCode::NAWS {
            let (width, height) = self.window;
            self.send_window_size(width, height);
        } else if self.options.my(OptionCode::CHARSET) && option == OptionCode::CHARSET {
            self.send_charset_request();
        }
    }

    /// The peer wants us to disable an option on our side.
    fn on_dont(&mut self, option: OptionCode) {
        debug!("received DONT {option}");
        if self.options.my(option) || !self.options.announced(option) {
            self.send_option(consts::WONT, option);
            self.options.set_announced(option, true);
        }
        self.options.set_my(option, false);
    }

    /// Initiates a negotiation from our side. Idempotent per option: once
    /// announced and enabled, repeated requests are suppressed to avoid
    /// negotiation storms.
    pub fn request_option(&mut self, verb: u8, option: OptionCode) {
        if self.options.announced(option) && self.options.my(option) {
            return;
        }
        self.options.set_my(option, true);
        self.options.set_announced(option, true);
        self.send_option(verb, option);
    }

    /// Unconditional low-level negotiation send; no table changes.
    pub fn send_option(&mut self, verb: u8, option: OptionCode) {
        debug!("sending {} {option}", consts::command_name(verb));
        let mut formatter = TelnetFormatter::new();
        formatter.add_command(verb);
        formatter.add_raw(option.raw());
        self.send_raw(&formatter.finish());
    }

    // #### subnegotiation dispatch ##########################################

    fn process_subnegotiation(&mut self, option: OptionCode, payload: &[u8]) -> TelnetResult<()> {
        trace!("subnegotiation for {option}, {} bytes", payload.len());
        match option {
            OptionCode::STATUS => {
                if payload.first() == Some(&consts::subneg::SEND) {
                    // request to send all enabled options; if the peer sends
                    // its own list instead we just ignore it
                    self.send_option_status();
                }
            }
            OptionCode::TERMINAL_TYPE => {
                if self.options.my(OptionCode::TERMINAL_TYPE) {
                    match payload.first() {
                        Some(&consts::subneg::SEND) => self.send_terminal_type(),
                        Some(&consts::subneg::IS) => {
                            self.handler.receive_terminal_type(&payload[1..]);
                        }
                        _ => {}
                    }
                }
            }
            OptionCode::NAWS => {
                if self.options.my(OptionCode::NAWS) {
                    if payload.len() == 4 {
                        let width = BigEndian::read_u16(&payload[0..2]);
                        let height = BigEndian::read_u16(&payload[2..4]);
                        self.handler.receive_window_size(width, height);
                    } else {
                        warn!("corrupted NAWS payload of {} bytes dropped", payload.len());
                    }
                }
            }
            OptionCode::CHARSET => {
                if self.options.my(OptionCode::CHARSET) {
                    self.process_charset_subnegotiation(payload)?;
                }
            }
            OptionCode::COMPRESS2 => {
                if self.options.his(OptionCode::COMPRESS2) {
                    // every byte after this marker is compressed; the marker
                    // itself was the last plaintext parse
                    self.inflater.begin();
                } else {
                    warn!("COMPRESS2 marker without negotiation, ignoring");
                }
            }
            OptionCode::GMCP => {
                if payload.is_empty() {
                    warn!("empty GMCP subnegotiation dropped");
                } else {
                    let msg = GmcpMessage::from_raw_bytes(payload);
                    self.track_gmcp_supports(&msg);
                    self.handler.receive_gmcp_message(msg);
                }
            }
            OptionCode::MSSP => {
                self.handler.receive_mud_server_status(payload);
            }
            other => {
                trace!("unhandled subnegotiation for {other} ignored");
            }
        }
        Ok(())
    }

    fn process_charset_subnegotiation(&mut self, payload: &[u8]) -> TelnetResult<()> {
        match payload.first() {
            Some(&consts::subneg::REQUEST) => {
                // TTABLE requests (a '[' right after REQUEST) are unsupported
                if payload.len() >= 3 && payload[1] != b'[' {
                    let sep = payload[1];
                    for charset in payload[2..].split(|byte| *byte == sep) {
                        if self.text_codec.supports(charset) {
                            self.text_codec.set_encoding_by_name(charset);
                            self.send_charset_accepted(charset);
                            return Ok(());
                        }
                    }
                    debug!("no requested charset is supported, rejecting");
                }
                self.send_charset_rejected();
            }
            Some(&consts::subneg::ACCEPTED) => {
                if payload.len() > 1 {
                    self.text_codec.set_encoding_by_name(&payload[1..]);
                }
            }
            Some(&consts::subneg::REJECTED) => {
                debug!("peer rejected our charset request");
            }
            Some(&consts::subneg::TTABLE_IS) => {
                // we never request a translation table, so receiving one
                // means our own negotiation logic is broken
                return Err(TelnetError::ContractViolation {
                    reason: "received CHARSET TTABLE-IS without requesting it",
                });
            }
            _ => {
                warn!("malformed CHARSET subnegotiation dropped");
            }
        }
        Ok(())
    }

    // #### GMCP module registry #############################################

    /// Registers or unregisters a `Core.Supports.*` module token. Enabling
    /// requires a version by protocol convention; the offending token is
    /// otherwise rejected without affecting the connection.
    pub fn receive_gmcp_module(&mut self, token: &str, enabled: bool) -> Result<(), GmcpError> {
        let module = GmcpModule::parse(token);
        if enabled {
            if !module.has_version() {
                return Err(GmcpError::MissingVersion {
                    name: module.normalized_name().to_owned(),
                });
            }
            if let Some(ty) = module.module_type() {
                self.gmcp_supported.set(ty, module.version());
            }
            self.gmcp_modules.insert(module);
        } else {
            if let Some(ty) = module.module_type() {
                self.gmcp_supported.set(ty, GmcpModuleVersion::DEFAULT);
            }
            self.gmcp_modules.remove(module.normalized_name());
        }
        Ok(())
    }

    fn track_gmcp_supports(&mut self, msg: &GmcpMessage) {
        let enabled = match msg.message_type() {
            Some(GmcpMessageType::CoreSupportsSet) => {
                self.gmcp_modules.clear();
                self.gmcp_supported.clear();
                true
            }
            Some(GmcpMessageType::CoreSupportsAdd) => true,
            Some(GmcpMessageType::CoreSupportsRemove) => false,
            _ => return,
        };
        let entries: Vec<String> = msg
            .json()
            .and_then(|json| json.document())
            .and_then(|doc| doc.as_array())
            .map(|list| {
                list.iter()
                    .filter_map(|value| value.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default();
        if entries.is_empty() {
            warn!("{} carried no module list", msg.name());
            return;
        }
        for token in entries {
            if let Err(err) = self.receive_gmcp_module(&token, enabled) {
                warn!("dropping GMCP module update: {err}");
            }
        }
    }

    fn announce_gmcp(&mut self) {
        let advertisements = self.handler.on_gmcp_enabled();
        for msg in advertisements {
            self.send_gmcp(&msg);
        }
    }

    // #### send path #########################################################

    /// Escapes embedded IACs, optionally appends the negotiated prompt
    /// marker (`IAC EOR`, else `IAC GA` unless suppressed), and hands the
    /// wire bytes to the transport. Output length is input length plus one
    /// byte per embedded 0xFF plus 0-2 trailing marker bytes.
    pub fn submit(&mut self, data: &[u8], go_ahead: bool) {
        let mut formatter = TelnetFormatter::new();
        formatter.add_escaped_bytes(data);
        if go_ahead {
            if self.options.his(OptionCode::EOR) {
                formatter.add_command(consts::EOR);
            } else if !self.options.his(OptionCode::SUPPRESS_GA) {
                formatter.add_command(consts::GA);
            }
        }
        self.send_raw(&formatter.finish());
    }

    /// Announces our echo state toward the peer: `WONT ECHO` when the peer
    /// should echo locally, `WILL ECHO` when we echo on its behalf. Used by
    /// the user-facing side to mirror the mud's echo mode.
    pub fn announce_echo(&mut self, local_echo: bool) {
        let verb = if local_echo { consts::WONT } else { consts::WILL };
        self.send_option(verb, OptionCode::ECHO);
        self.options.set_my(OptionCode::ECHO, !local_echo);
        self.options.set_announced(OptionCode::ECHO, true);
    }

    /// Sends a GMCP message inside a subnegotiation.
    pub fn send_gmcp(&mut self, msg: &GmcpMessage) {
        let mut formatter = TelnetFormatter::new();
        formatter.add_subneg_begin(OptionCode::GMCP);
        formatter.add_escaped_bytes(&msg.to_raw_bytes());
        formatter.add_subneg_end();
        self.send_raw(&formatter.finish());
    }

    /// Sends `IAC SB NAWS W1 W0 H1 H0 IAC SE` (RFC 1073), each dimension
    /// byte doubled if it happens to be 255.
    pub fn send_window_size(&mut self, width: u16, height: u16) {
        self.window = (width, height);
        let mut formatter = TelnetFormatter::new();
        formatter.add_subneg_begin(OptionCode::NAWS);
        formatter.add_two_byte_escaped(width);
        formatter.add_two_byte_escaped(height);
        formatter.add_subneg_end();
        self.send_raw(&formatter.finish());
    }

    /// Replies with our terminal type (TERMINAL-TYPE IS).
    pub fn send_terminal_type(&mut self) {
        let term = self.text_codec.encode(&self.term_type);
        let mut formatter = TelnetFormatter::new();
        formatter.add_subneg_begin(OptionCode::TERMINAL_TYPE);
        formatter.add_escaped(consts::subneg::IS);
        formatter.add_escaped_bytes(&term);
        formatter.add_subneg_end();
        self.send_raw(&formatter.finish());
    }

    /// Asks the peer for its terminal type (TERMINAL-TYPE SEND).
    pub fn send_terminal_type_request(&mut self) {
        let mut formatter = TelnetFormatter::new();
        formatter.add_subneg_begin(OptionCode::TERMINAL_TYPE);
        formatter.add_escaped(consts::subneg::SEND);
        formatter.add_subneg_end();
        self.send_raw(&formatter.finish());
    }

    /// Offers our supported charsets (RFC 2066 REQUEST), `;`-delimited.
    pub fn send_charset_request(&mut self) {
        const DELIMITER: u8 = b';';
        let mut formatter = TelnetFormatter::new();
        formatter.add_subneg_begin(OptionCode::CHARSET);
        formatter.add_raw(consts::subneg::REQUEST);
        for charset in self.text_codec.supported_encodings() {
            formatter.add_escaped(DELIMITER);
            formatter.add_escaped_bytes(charset.as_bytes());
        }
        formatter.add_subneg_end();
        self.send_raw(&formatter.finish());
    }

    fn send_charset_accepted(&mut self, charset: &[u8]) {
        let mut formatter = TelnetFormatter::new();
        formatter.add_subneg_begin(OptionCode::CHARSET);
        formatter.add_raw(consts::subneg::ACCEPTED);
        formatter.add_escaped_bytes(charset);
        formatter.add_subneg_end();
        self.send_raw(&formatter.finish());
    }

    fn send_charset_rejected(&mut self) {
        let mut formatter = TelnetFormatter::new();
        formatter.add_subneg_begin(OptionCode::CHARSET);
        formatter.add_raw(consts::subneg::REJECTED);
        formatter.add_subneg_end();
        self.send_raw(&formatter.finish());
    }

    /// Consolidated `STATUS IS` reply listing every enabled option on both
    /// sides (RFC 859).
    fn send_option_status(&mut self) {
        let entries: Vec<(OptionCode, bool, bool)> = self.options.enabled_entries().collect();
        let mut formatter = TelnetFormatter::new();
        formatter.add_subneg_begin(OptionCode::STATUS);
        formatter.add_raw(consts::subneg::IS);
        for (option, my, his) in entries {
            if my {
                formatter.add_raw(consts::WILL);
                formatter.add_escaped(option.raw());
            }
            if his {
                formatter.add_raw(consts::DO);
                formatter.add_escaped(option.raw());
            }
        }
        formatter.add_subneg_end();
        self.send_raw(&formatter.finish());
    }

    /// Requests RFC 1184 EDIT mode so the client keeps editing lines locally.
    fn send_linemode_edit(&mut self) {
        let mut formatter = TelnetFormatter::new();
        formatter.add_subneg_begin(OptionCode::LINEMODE);
        formatter.add_raw(consts::linemode::MODE);
        formatter.add_escaped(consts::linemode::MODE_EDIT);
        formatter.add_subneg_end();
        self.send_raw(&formatter.finish());
    }

    fn send_are_you_there(&mut self) {
        self.send_raw(b"I'm here! Please be more patient!\r\n");
    }

    fn send_raw(&mut self, data: &[u8]) {
        self.sent_bytes += data.len() as u64;
        self.handler.send_raw_data(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::{CharacterEncoding, TextCodecStrategy};

    #[derive(Default)]
    struct Recorder {
        raw: Vec<u8>,
        clean: Vec<(Vec<u8>, bool)>,
        echo: Vec<bool>,
        windows: Vec<(u16, u16)>,
    }

    impl TelnetHandler for Recorder {
        fn send_raw_data(&mut self, data: &[u8]) {
            self.raw.extend_from_slice(data);
        }
        fn send_to_mapper(&mut self, data: &[u8], go_ahead: bool) {
            self.clean.push((data.to_vec(), go_ahead));
        }
        fn receive_echo_mode(&mut self, echo: bool) {
            self.echo.push(echo);
        }
        fn receive_window_size(&mut self, width: u16, height: u16) {
            self.windows.push((width, height));
        }
    }

    fn engine() -> TelnetEngine<Recorder> {
        TelnetEngine::new(
            Recorder::default(),
            TextCodec::new(TextCodecStrategy::AutoSelect, CharacterEncoding::Latin1),
        )
    }

    #[test]
    fn plain_data_reaches_mapper() {
        let mut engine = engine();
        engine.on_read(b"hello").unwrap();
        assert_eq!(engine.handler().clean, vec![(b"hello".to_vec(), false)]);
    }

    #[test]
    fn ga_flushes_with_prompt_flag() {
        let mut engine = engine();
        engine
            .on_read(&[b'>', b' ', consts::IAC, consts::GA, b'x'])
            .unwrap();
        assert_eq!(
            engine.handler().clean,
            vec![(b"> ".to_vec(), true), (b"x".to_vec(), false)]
        );
    }

    #[test]
    fn echo_will_toggles_echo_mode_off() {
        let mut engine = engine();
        engine
            .on_read(&[consts::IAC, consts::WILL, consts::option::ECHO])
            .unwrap();
        assert_eq!(engine.handler().echo, vec![false]);
        assert_eq!(
            engine.handler().raw,
            vec![consts::IAC, consts::DO, consts::option::ECHO]
        );
        assert!(engine.his_option(OptionCode::ECHO));
    }

    #[test]
    fn unsupported_will_is_refused() {
        let mut engine = engine();
        // option 99 is not in the allow-list
        engine.on_read(&[consts::IAC, consts::WILL, 99]).unwrap();
        assert_eq!(engine.handler().raw, vec![consts::IAC, consts::DONT, 99]);
    }

    #[test]
    fn timing_mark_is_always_accepted() {
        let mut engine = engine();
        engine
            .on_read(&[consts::IAC, consts::DO, consts::option::TIMING_MARK])
            .unwrap();
        assert_eq!(
            engine.handler().raw,
            vec![consts::IAC, consts::WILL, consts::option::TIMING_MARK]
        );
        assert!(!engine.my_option(OptionCode::TIMING_MARK));
    }

    #[test]
    fn dont_for_unannounced_option_is_acknowledged_once() {
        let mut engine = engine();
        engine
            .on_read(&[consts::IAC, consts::DONT, consts::option::NAWS])
            .unwrap();
        assert_eq!(
            engine.handler().raw,
            vec![consts::IAC, consts::WONT, consts::option::NAWS]
        );
        engine.handler_mut().raw.clear();
        engine
            .on_read(&[consts::IAC, consts::DONT, consts::option::NAWS])
            .unwrap();
        assert!(engine.handler().raw.is_empty());
    }

    #[test]
    fn gmcp_module_requires_version_to_enable() {
        let mut engine = engine();
        assert!(engine.receive_gmcp_module("Char", true).is_err());
        assert!(engine.receive_gmcp_module("Char 1", true).is_ok());
        assert!(engine.receive_gmcp_module("Char", false).is_ok());
    }

    #[test]
    fn gmcp_module_enabled_requires_option() {
        let mut engine = engine();
        engine.receive_gmcp_module("Char 1", true).unwrap();
        // GMCP option itself is still off
        assert!(!engine.is_gmcp_module_enabled(GmcpModuleType::Char));
        engine
            .on_read(&[consts::IAC, consts::DO, consts::option::GMCP])
            .unwrap();
        assert!(engine.is_gmcp_module_enabled(GmcpModuleType::Char));
    }

    #[test]
    fn reset_is_idempotent_and_clears_state() {
        let mut engine = engine();
        engine
            .on_read(&[consts::IAC, consts::WILL, consts::option::ECHO])
            .unwrap();
        assert!(engine.his_option(OptionCode::ECHO));
        engine.reset();
        engine.reset();
        assert!(!engine.his_option(OptionCode::ECHO));
        assert_eq!(engine.sent_bytes(), 0);
    }
}
