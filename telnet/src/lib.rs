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

//! # Mudlink Telnet Protocol Engine
//!
//! A stateful, byte-oriented telnet implementation (RFC 854/855) for a MUD
//! mapping proxy that sits between a player's client and a MUME server,
//! relaying traffic transparently while extracting the cleaned game text and
//! protocol side channels.
//!
//! ## Overview
//!
//! The proxy runs one [`TelnetEngine`] per connection endpoint: one facing
//! the user's client and one facing the mud. Each engine owns its own option
//! state, charset, compression state and GMCP registry, and is driven by the
//! thread that owns its socket; nothing here blocks or locks.
//!
//! The layers, bottom up:
//!
//! - [`TelnetCodec`]: the byte-level Mealy machine. Distinguishes literal
//!   data from IAC command sequences one byte at a time and produces
//!   [`TelnetFrame`]s. Implements `tokio_util::codec::{Decoder, Encoder}`
//!   so it can also sit inside a `Framed` transport.
//! - [`TelnetFormatter`]: the write-side accumulator. Builds one logical
//!   command with RFC 855 IAC doubling; the caller sends the finished bytes
//!   exactly once.
//! - [`TelnetEngine`]: option negotiation policy over the four per-option
//!   state tables, subnegotiation dispatch (STATUS, TERMINAL-TYPE, NAWS,
//!   CHARSET, COMPRESS2, GMCP, MSSP), the MCCP2 inflate integration and the
//!   GA/EOR-delimited clean-data stream. Endpoint behavior is injected once
//!   as a [`TelnetHandler`].
//! - [`MudTelnet`] / [`UserTelnet`] / [`ClientTelnet`]: thin policy bindings
//!   selecting which side requests which options, which charsets are
//!   advertised, and how GMCP capability lists are rebuilt for relaying.
//!
//! ## Negotiation
//!
//! Option state lives in four 256-entry tables (`my`, `his`, `announced`,
//! `he_announced`). A DO/DONT is sent at most once per state transition;
//! re-announcing an already-settled option is suppressed, which is the
//! anti-loop rule RFC 854 mandates. The allow-lists live in the engine and
//! differ per direction (the peer may enable ECHO, we never accept being
//! told to).
//!
//! ## Error handling
//!
//! Malformed input from the peer never aborts the session: bad sequences
//! are logged and dropped where they are detected. Only two conditions are
//! fatal and surface as [`TelnetError`]: unrecoverable zlib state in the
//! COMPRESS2 sub-stream, and protocol replies that could only mean our own
//! negotiation logic is broken.

#![warn(future_incompatible, rust_2018_idioms, missing_docs)]

mod charset;
mod client;
mod codec;
mod compress;
pub mod consts;
mod engine;
mod formatter;
mod frame;
mod handler;
mod mud;
mod option;
mod result;
mod scratch;
mod user;

pub use self::charset::{
    CharacterEncoding, LATIN_1_ENCODING, TextCodec, TextCodecStrategy, US_ASCII_ENCODING,
    UTF_8_ENCODING,
};
pub use self::client::ClientTelnet;
pub use self::codec::TelnetCodec;
pub use self::compress::TelnetInflater;
pub use self::engine::TelnetEngine;
pub use self::formatter::TelnetFormatter;
pub use self::frame::TelnetFrame;
pub use self::handler::TelnetHandler;
pub use self::mud::{MudSide, MudTelnet};
pub use self::option::{OptionCode, OptionTables};
pub use self::result::{TelnetError, TelnetResult};
pub use self::scratch::ScratchBuffer;
pub use self::user::{UserSide, UserTelnet};

/// Version string reported in terminal types and GMCP hello payloads.
pub const MUDLINK_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::{TelnetCodec, TelnetFrame, consts};
    use bytes::BytesMut;
    use tokio_util::codec::Decoder;

    #[tokio::test]
    async fn codec_decodes_a_login_exchange() {
        let mut codec = TelnetCodec::new();
        let mut input = BytesMut::from(
            &[
                b'L',
                b'o',
                b'g',
                b'i',
                b'n',
                b':',
                consts::CR,
                consts::LF,
                consts::IAC,
                consts::WILL,
                consts::option::ECHO,
                b'>',
                consts::IAC,
                consts::GA,
            ][..],
        );
        let mut frames = Vec::new();
        while let Some(frame) = codec.decode(&mut input).unwrap() {
            frames.push(frame);
        }
        assert_eq!(frames.len(), 11);
        assert_eq!(frames[8], TelnetFrame::Will(super::OptionCode::ECHO));
        assert_eq!(frames[9], TelnetFrame::Data(b'>'));
        assert_eq!(frames[10], TelnetFrame::GoAhead);
    }
}
