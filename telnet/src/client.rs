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

//! Endpoint policy for the integrated client.

use crate::charset::{CharacterEncoding, TextCodec, TextCodecStrategy};
use crate::engine::TelnetEngine;
use crate::handler::TelnetHandler;
use crate::option::OptionCode;
use crate::result::TelnetResult;

/// The telnet endpoint behind the built-in client widget. It connects to the
/// proxy's own listener, so the proxy drives all option negotiation and this
/// side only answers.
pub struct ClientTelnet<H: TelnetHandler> {
    engine: TelnetEngine<H>,
}

impl<H: TelnetHandler> ClientTelnet<H> {
    /// Creates the client endpoint with the configured charset strategy.
    pub fn new(handler: H, strategy: TextCodecStrategy, default_encoding: CharacterEncoding) -> Self {
        let codec = TextCodec::new(strategy, default_encoding);
        let mut engine = TelnetEngine::new(handler, codec);
        engine.set_terminal_type("Mudlink");
        ClientTelnet { engine }
    }

    /// Feeds bytes read from the socket.
    pub fn on_read(&mut self, data: &[u8]) -> TelnetResult<()> {
        self.engine.on_read(data)
    }

    /// Sends user input toward the mud, encoded for the active charset.
    pub fn send_to_mud(&mut self, text: &str) {
        let encoded = self.engine.text_codec().encode(text);
        self.engine.submit(&encoded, false);
    }

    /// Tracks window resizes; reports them only while NAWS is negotiated,
    /// but always remembers them for a later enable.
    pub fn on_window_size_changed(&mut self, width: u16, height: u16) {
        self.engine.set_window_size(width, height);
        if self.engine.my_option(OptionCode::NAWS) {
            self.engine.send_window_size(width, height);
        }
    }

    /// Restores local echo and drops negotiated state after a disconnect.
    pub fn on_disconnected(&mut self) {
        self.engine.reset();
        self.engine.handler_mut().receive_echo_mode(true);
    }

    /// The underlying engine, for state queries.
    pub fn engine(&self) -> &TelnetEngine<H> {
        &self.engine
    }

    /// Mutable access to the underlying engine.
    pub fn engine_mut(&mut self) -> &mut TelnetEngine<H> {
        &mut self.engine
    }
}
