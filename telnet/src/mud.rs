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

//! Mud-facing endpoint policy.

use mudlink_gmcp::{GmcpMessage, GmcpMessageType};

use crate::charset::{CharacterEncoding, TextCodec, TextCodecStrategy};
use crate::engine::TelnetEngine;
use crate::handler::TelnetHandler;
use crate::option::OptionCode;
use crate::result::TelnetResult;
use crate::{MUDLINK_VERSION, consts};

/// Modules advertised to the mud once GMCP comes up.
const ADVERTISED_MODULES: &str = r#"["Char 1","Event 1","External.Discord 1","Room.Chars 1"]"#;

/// Policy wrapper that injects our GMCP capability advertisement while
/// delegating everything else to the application's handler.
pub struct MudSide<H: TelnetHandler> {
    inner: H,
}

impl<H: TelnetHandler> MudSide<H> {
    /// The wrapped application handler.
    pub fn inner(&self) -> &H {
        &self.inner
    }

    /// Mutable access to the wrapped application handler.
    pub fn inner_mut(&mut self) -> &mut H {
        &mut self.inner
    }
}

impl<H: TelnetHandler> TelnetHandler for MudSide<H> {
    fn send_raw_data(&mut self, data: &[u8]) {
        self.inner.send_raw_data(data);
    }
    fn send_to_mapper(&mut self, data: &[u8], go_ahead: bool) {
        self.inner.send_to_mapper(data, go_ahead);
    }
    fn receive_echo_mode(&mut self, echo: bool) {
        self.inner.receive_echo_mode(echo);
    }
    fn receive_gmcp_message(&mut self, msg: GmcpMessage) {
        self.inner.receive_gmcp_message(msg);
    }
    fn receive_terminal_type(&mut self, term: &[u8]) {
        self.inner.receive_terminal_type(term);
    }
    fn receive_window_size(&mut self, width: u16, height: u16) {
        self.inner.receive_window_size(width, height);
    }
    fn receive_mud_server_status(&mut self, payload: &[u8]) {
        self.inner.receive_mud_server_status(payload);
    }
    fn on_gmcp_enabled(&mut self) -> Vec<GmcpMessage> {
        let mut messages = vec![
            GmcpMessage::with_json(
                GmcpMessageType::CoreHello,
                format!(r#"{{"client":"Mudlink","version":"{MUDLINK_VERSION}"}}"#),
            ),
            GmcpMessage::with_json(GmcpMessageType::CoreSupportsSet, ADVERTISED_MODULES),
        ];
        messages.extend(self.inner.on_gmcp_enabled());
        messages
    }
}

/// The mud-facing telnet endpoint.
///
/// MUME is Latin-1 only, so the charset codec is pinned; RFC 2066 is still
/// announced so the server knows which encoding our bytes are in.
pub struct MudTelnet<H: TelnetHandler> {
    engine: TelnetEngine<MudSide<H>>,
}

impl<H: TelnetHandler> MudTelnet<H> {
    /// Creates the mud-side endpoint around the application handler.
    pub fn new(handler: H) -> Self {
        let codec = TextCodec::new(TextCodecStrategy::ForceLatin1, CharacterEncoding::Latin1);
        let mut engine = TelnetEngine::new(MudSide { inner: handler }, codec);
        engine.set_terminal_type(format!("Mudlink-{MUDLINK_VERSION}"));
        MudTelnet { engine }
    }

    /// Announces our capabilities after the socket connects. The mud opts
    /// to not send `DO CHARSET` itself because of older broken clients, so
    /// we lead with `WILL`.
    pub fn on_connected(&mut self) {
        self.engine
            .request_option(consts::WILL, OptionCode::CHARSET);
        self.engine.request_option(consts::WILL, OptionCode::GMCP);
    }

    /// Feeds bytes that arrived from the mud socket.
    pub fn on_analyze_mud_stream(&mut self, data: &[u8]) -> TelnetResult<()> {
        self.engine.on_read(data)
    }

    /// Sends already-Latin-1 command bytes to the mud.
    pub fn on_send_to_mud(&mut self, data: &[u8]) {
        self.engine.submit(data, false);
    }

    /// Relays the user's window size. The size is remembered even when NAWS
    /// is off, in case it gets negotiated later.
    pub fn on_relay_naws(&mut self, width: u16, height: u16) {
        self.engine.set_window_size(width, height);
        if self.engine.my_option(OptionCode::NAWS) {
            self.engine.send_window_size(width, height);
        }
    }

    /// Relays the user's terminal type, tagged with our own version.
    pub fn on_relay_term_type(&mut self, term_type: &str) {
        self.engine
            .set_terminal_type(format!("{term_type}/Mudlink-{MUDLINK_VERSION}"));
        if self.engine.my_option(OptionCode::TERMINAL_TYPE) {
            self.engine.send_terminal_type();
        }
    }

    /// Relays a GMCP message coming from the user side.
    pub fn on_relay_gmcp(&mut self, msg: &GmcpMessage) {
        self.engine.send_gmcp(msg);
    }

    /// Drops all negotiated state after a disconnect.
    pub fn reset(&mut self) {
        self.engine.reset();
    }

    /// The underlying engine, for state queries.
    pub fn engine(&self) -> &TelnetEngine<MudSide<H>> {
        &self.engine
    }

    /// Mutable access to the underlying engine.
    pub fn engine_mut(&mut self) -> &mut TelnetEngine<MudSide<H>> {
        &mut self.engine
    }
}
