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

//! Byte-level telnet frame codec.
//!
//! This is the Mealy machine underneath the [`TelnetEngine`]: it turns an
//! untrusted byte stream into [`TelnetFrame`]s one byte at a time and encodes
//! frames back into correctly escaped wire bytes. Negotiation *policy* (who
//! replies what to which option) lives in the engine; the codec only frames.
//!
//! The decoder also implements `tokio_util::codec::{Decoder, Encoder}` so a
//! `Framed` transport can drive it directly.
//!
//! Per RFC 855 an `IAC <cmd>` encountered *inside* a subnegotiation is still a
//! command: `IAC SB IAC WILL ECHO f o o IAC IAC b a r IAC SE` decodes as
//! `Will(ECHO)` followed by a subnegotiation whose payload is `foo\xFFbar`.
//!
//! [`TelnetEngine`]: crate::TelnetEngine

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

use crate::consts;
use crate::frame::TelnetFrame;
use crate::option::OptionCode;
use crate::result::TelnetError;

/// Decoder state. Always returns to `NormalData` after a command or
/// subnegotiation completes; there is no terminal state.
#[derive(Clone, Copy, Debug)]
enum DecoderState {
    /// Plain data.
    NormalData,
    /// Saw one IAC; next byte is a command.
    InterpretAsCommand,
    /// Saw IAC WILL/WONT/DO/DONT; next byte is the option.
    Negotiate(u8),
    /// Saw IAC SB; next byte is the option.
    Subnegotiate,
    /// Inside a subnegotiation for this option, accumulating payload.
    SubnegotiateArgument(u8),
    /// Saw IAC inside a subnegotiation; might be an escape, the terminator,
    /// or an embedded command.
    SubnegotiateArgumentIac(u8),
    /// Saw IAC WILL/WONT/DO/DONT inside a subnegotiation (RFC 855 treats it
    /// as a command even there); next byte is the option.
    SubnegotiateCommand(u8, u8),
}

/// Stateful telnet frame codec. One instance per connection endpoint; not
/// thread-safe, and never needs to be (see the engine's threading model).
pub struct TelnetCodec {
    state: DecoderState,
    subneg_buffer: BytesMut,
}

impl Default for TelnetCodec {
    fn default() -> Self {
        TelnetCodec {
            state: DecoderState::NormalData,
            subneg_buffer: BytesMut::new(),
        }
    }
}

impl TelnetCodec {
    /// Creates a codec in the `NormalData` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Abandons any partially parsed command or subnegotiation.
    pub fn reset(&mut self) {
        self.state = DecoderState::NormalData;
        self.subneg_buffer.clear();
    }

    fn two_byte_command(byte: u8) -> Option<TelnetFrame> {
        match byte {
            consts::NOP => Some(TelnetFrame::NoOperation),
            consts::DM => Some(TelnetFrame::DataMark),
            consts::BRK => Some(TelnetFrame::Break),
            consts::IP => Some(TelnetFrame::InterruptProcess),
            consts::AO => Some(TelnetFrame::AbortOutput),
            consts::AYT => Some(TelnetFrame::AreYouThere),
            consts::EC => Some(TelnetFrame::EraseCharacter),
            consts::EL => Some(TelnetFrame::EraseLine),
            consts::GA => Some(TelnetFrame::GoAhead),
            consts::EOR => Some(TelnetFrame::EndOfRecord),
            _ => None,
        }
    }

    fn negotiation_frame(verb: u8, option: OptionCode) -> TelnetFrame {
        match verb {
            consts::WILL => TelnetFrame::Will(option),
            consts::WONT => TelnetFrame::Wont(option),
            consts::DO => TelnetFrame::Do(option),
            _ => TelnetFrame::Dont(option),
        }
    }
}

impl Decoder for TelnetCodec {
    type Item = TelnetFrame;
    type Error = TelnetError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<TelnetFrame>, Self::Error> {
        while src.remaining() > 0 {
            let byte = src.get_u8();
            match (self.state, byte) {
                (DecoderState::NormalData, consts::IAC) => {
                    self.state = DecoderState::InterpretAsCommand;
                }
                (DecoderState::NormalData, _) => {
                    return Ok(Some(TelnetFrame::Data(byte)));
                }
                (DecoderState::InterpretAsCommand, consts::IAC) => {
                    // IAC IAC is a literal 255 data byte
                    self.state = DecoderState::NormalData;
                    return Ok(Some(TelnetFrame::Data(consts::IAC)));
                }
                (
                    DecoderState::InterpretAsCommand,
                    consts::WILL | consts::WONT | consts::DO | consts::DONT,
                ) => {
                    self.state = DecoderState::Negotiate(byte);
                }
                (DecoderState::InterpretAsCommand, consts::SB) => {
                    self.state = DecoderState::Subnegotiate;
                }
                (DecoderState::InterpretAsCommand, consts::SE) => {
                    // stray SE without SB
                    warn!("received IAC SE outside a subnegotiation, ignoring");
                    self.state = DecoderState::NormalData;
                }
                (DecoderState::InterpretAsCommand, _) => {
                    self.state = DecoderState::NormalData;
                    match Self::two_byte_command(byte) {
                        Some(frame) => return Ok(Some(frame)),
                        None => {
                            warn!("received unknown telnet command {byte:#04X}, ignoring");
                        }
                    }
                }
                (DecoderState::Negotiate(verb), _) => {
                    self.state = DecoderState::NormalData;
                    return Ok(Some(Self::negotiation_frame(verb, OptionCode::from(byte))));
                }
                (DecoderState::Subnegotiate, _) => {
                    self.state = DecoderState::SubnegotiateArgument(byte);
                }
                (DecoderState::SubnegotiateArgument(option), consts::IAC) => {
                    self.state = DecoderState::SubnegotiateArgumentIac(option);
                }
                (DecoderState::SubnegotiateArgument(_), _) => {
                    self.subneg_buffer.put_u8(byte);
                }
                (DecoderState::SubnegotiateArgumentIac(option), consts::IAC) => {
                    self.state = DecoderState::SubnegotiateArgument(option);
                    self.subneg_buffer.put_u8(consts::IAC);
                }
                (DecoderState::SubnegotiateArgumentIac(option), consts::SE) => {
                    self.state = DecoderState::NormalData;
                    let payload = self.subneg_buffer.split();
                    return Ok(Some(TelnetFrame::Subnegotiate(
                        OptionCode::from(option),
                        payload,
                    )));
                }
                (
                    DecoderState::SubnegotiateArgumentIac(option),
                    consts::WILL | consts::WONT | consts::DO | consts::DONT,
                ) => {
                    self.state = DecoderState::SubnegotiateCommand(option, byte);
                }
                (DecoderState::SubnegotiateArgumentIac(option), _) => {
                    // RFC 855: IAC <cmd> is still a command inside SB
                    self.state = DecoderState::SubnegotiateArgument(option);
                    match Self::two_byte_command(byte) {
                        Some(frame) => return Ok(Some(frame)),
                        None => {
                            warn!(
                                "received unknown telnet command {byte:#04X} inside \
                                 a subnegotiation, ignoring"
                            );
                        }
                    }
                }
                (DecoderState::SubnegotiateCommand(option, verb), _) => {
                    self.state = DecoderState::SubnegotiateArgument(option);
                    return Ok(Some(Self::negotiation_frame(verb, OptionCode::from(byte))));
                }
            }
        }
        Ok(None)
    }
}

impl Encoder<TelnetFrame> for TelnetCodec {
    type Error = TelnetError;

    fn encode(&mut self, item: TelnetFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            TelnetFrame::Data(byte) => {
                dst.reserve(2);
                if byte == consts::IAC {
                    dst.put_u8(consts::IAC);
                }
                dst.put_u8(byte);
            }
            TelnetFrame::NoOperation => put_command(dst, consts::NOP),
            TelnetFrame::DataMark => put_command(dst, consts::DM),
            TelnetFrame::Break => put_command(dst, consts::BRK),
            TelnetFrame::InterruptProcess => put_command(dst, consts::IP),
            TelnetFrame::AbortOutput => put_command(dst, consts::AO),
            TelnetFrame::AreYouThere => put_command(dst, consts::AYT),
            TelnetFrame::EraseCharacter => put_command(dst, consts::EC),
            TelnetFrame::EraseLine => put_command(dst, consts::EL),
            TelnetFrame::GoAhead => put_command(dst, consts::GA),
            TelnetFrame::EndOfRecord => put_command(dst, consts::EOR),
            TelnetFrame::Will(option) => put_negotiation(dst, consts::WILL, option),
            TelnetFrame::Wont(option) => put_negotiation(dst, consts::WONT, option),
            TelnetFrame::Do(option) => put_negotiation(dst, consts::DO, option),
            TelnetFrame::Dont(option) => put_negotiation(dst, consts::DONT, option),
            TelnetFrame::Subnegotiate(option, payload) => {
                dst.reserve(5 + payload.len());
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SB);
                dst.put_u8(option.raw());
                for byte in &payload {
                    // RFC 855: payload bytes of 255 are doubled
                    if *byte == consts::IAC {
                        dst.put_u8(consts::IAC);
                    }
                    dst.put_u8(*byte);
                }
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SE);
            }
        }
        Ok(())
    }
}

fn put_command(dst: &mut BytesMut, cmd: u8) {
    dst.reserve(2);
    dst.put_u8(consts::IAC);
    dst.put_u8(cmd);
}

fn put_negotiation(dst: &mut BytesMut, verb: u8, option: OptionCode) {
    dst.reserve(3);
    dst.put_u8(consts::IAC);
    dst.put_u8(verb);
    dst.put_u8(option.raw());
}
