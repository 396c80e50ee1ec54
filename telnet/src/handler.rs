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

use mudlink_gmcp::GmcpMessage;

/// Endpoint policy injected into a [`TelnetEngine`].
///
/// One engine instance exists per connection endpoint (user side and mud
/// side); each is constructed with its own handler carrying the
/// endpoint-appropriate behavior. Only the two data sinks are mandatory;
/// every side-channel hook defaults to a no-op.
///
/// [`TelnetEngine`]: crate::TelnetEngine
pub trait TelnetHandler {
    /// Outbound transport sink: raw, already-escaped wire bytes.
    fn send_raw_data(&mut self, data: &[u8]);

    /// Cleaned application data, flushed at every GA/EOR boundary.
    /// `go_ahead` is true when the chunk ended at such a boundary.
    fn send_to_mapper(&mut self, data: &[u8], go_ahead: bool);

    /// The peer switched echo mode: `echo` is true when the local side is
    /// expected to echo its own input again.
    fn receive_echo_mode(&mut self, _echo: bool) {}

    /// A GMCP message arrived and parsed.
    fn receive_gmcp_message(&mut self, _msg: GmcpMessage) {}

    /// The peer reported its terminal type (TERMINAL-TYPE IS).
    fn receive_terminal_type(&mut self, _term: &[u8]) {}

    /// The peer reported its window size (NAWS).
    fn receive_window_size(&mut self, _width: u16, _height: u16) {}

    /// Raw MSSP payload; variable parsing belongs to a collaborator.
    fn receive_mud_server_status(&mut self, _payload: &[u8]) {}

    /// The peer enabled GMCP. Returned messages are sent immediately as
    /// capability advertisements (typically `Core.Hello` plus
    /// `Core.Supports.Set`).
    fn on_gmcp_enabled(&mut self) -> Vec<GmcpMessage> {
        Vec::new()
    }
}
