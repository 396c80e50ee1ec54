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

//! User-facing endpoint policy.

use mudlink_gmcp::{GmcpMessage, GmcpMessageType, GmcpModule};
use tracing::warn;

use crate::charset::{CharacterEncoding, TextCodec, TextCodecStrategy};
use crate::engine::TelnetEngine;
use crate::handler::TelnetHandler;
use crate::option::OptionCode;
use crate::result::TelnetResult;
use crate::consts;

/// Policy wrapper that normalizes `Core.Supports.*` messages before they
/// leave this endpoint.
///
/// The filtered module list relayed toward the mud is always a freshly
/// constructed message built from the parsed entries; the registry set
/// itself is owned by the engine and never shared.
pub struct UserSide<H: TelnetHandler> {
    inner: H,
}

impl<H: TelnetHandler> UserSide<H> {
    /// The wrapped application handler.
    pub fn inner(&self) -> &H {
        &self.inner
    }

    /// Mutable access to the wrapped application handler.
    pub fn inner_mut(&mut self) -> &mut H {
        &mut self.inner
    }

    fn rebuild_supports(msg: &GmcpMessage) -> Option<GmcpMessage> {
        let ty = msg.message_type()?;
        if !matches!(
            ty,
            GmcpMessageType::CoreSupportsSet
                | GmcpMessageType::CoreSupportsAdd
                | GmcpMessageType::CoreSupportsRemove
        ) {
            return None;
        }
        let entries = msg.json()?.document()?.as_array()?;
        let normalized: Vec<serde_json::Value> = entries
            .iter()
            .filter_map(|value| value.as_str())
            .map(|token| serde_json::Value::from(GmcpModule::parse(token).to_wire_string()))
            .collect();
        let json = serde_json::Value::from(normalized).to_string();
        Some(GmcpMessage::with_json(ty, json))
    }
}

impl<H: TelnetHandler> TelnetHandler for UserSide<H> {
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
        match Self::rebuild_supports(&msg) {
            Some(rebuilt) => self.inner.receive_gmcp_message(rebuilt),
            None if matches!(
                msg.message_type(),
                Some(
                    GmcpMessageType::CoreSupportsSet
                        | GmcpMessageType::CoreSupportsAdd
                        | GmcpMessageType::CoreSupportsRemove
                )
            ) =>
            {
                // a supports message whose payload would not parse; the
                // registry update already logged it, nothing to relay
                warn!("dropping malformed {} from client", msg.name());
            }
            None => self.inner.receive_gmcp_message(msg),
        }
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
        self.inner.on_gmcp_enabled()
    }
}

/// The user-facing telnet endpoint.
///
/// The proxy represents all game data as Latin-1 internally; this endpoint
/// transcodes to whatever the user's client negotiated via RFC 2066.
pub struct UserTelnet<H: TelnetHandler> {
    engine: TelnetEngine<UserSide<H>>,
}

impl<H: TelnetHandler> UserTelnet<H> {
    /// Creates the user-side endpoint around the application handler,
    /// starting from the configured default encoding.
    pub fn new(handler: H, default_encoding: CharacterEncoding) -> Self {
        let codec = TextCodec::new(TextCodecStrategy::AutoSelect, default_encoding);
        UserTelnet {
            engine: TelnetEngine::new(UserSide { inner: handler }, codec),
        }
    }

    /// Negotiates the options we want from the user's client.
    pub fn on_connected(&mut self) {
        self.engine
            .request_option(consts::DO, OptionCode::TERMINAL_TYPE);
        self.engine.request_option(consts::DO, OptionCode::NAWS);
        self.engine.request_option(consts::DO, OptionCode::CHARSET);
        self.engine.request_option(consts::WILL, OptionCode::GMCP);
    }

    /// Feeds bytes that arrived from the user's client.
    pub fn on_analyze_user_stream(&mut self, data: &[u8]) -> TelnetResult<()> {
        self.engine.on_read(data)
    }

    /// Sends internal Latin-1 data to the user's client, transcoded into
    /// its negotiated encoding.
    pub fn on_send_to_user(&mut self, data: &[u8], go_ahead: bool) {
        let text: String = data.iter().map(|byte| char::from(*byte)).collect();
        let encoded = self.engine.text_codec().encode(&text);
        self.engine.submit(&encoded, go_ahead);
    }

    /// Mirrors the mud's echo mode toward the client: `echo` is true when
    /// the client should echo its own input again.
    pub fn on_relay_echo_mode(&mut self, echo: bool) {
        self.engine.announce_echo(echo);
    }

    /// Relays a GMCP message coming from the mud side.
    pub fn on_relay_gmcp(&mut self, msg: &GmcpMessage) {
        self.engine.send_gmcp(msg);
    }

    /// Drops all negotiated state after a disconnect.
    pub fn reset(&mut self) {
        self.engine.reset();
    }

    /// The underlying engine, for state queries.
    pub fn engine(&self) -> &TelnetEngine<UserSide<H>> {
        &self.engine
    }

    /// Mutable access to the underlying engine.
    pub fn engine_mut(&mut self) -> &mut TelnetEngine<UserSide<H>> {
        &mut self.engine
    }
}
