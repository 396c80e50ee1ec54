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

//! Property tests for the escaping wire contract.

use mudlink_telnet::{
    CharacterEncoding, TelnetEngine, TelnetHandler, TextCodec, TextCodecStrategy, consts,
};
use proptest::prelude::*;

#[derive(Default)]
struct Recorder {
    raw: Vec<u8>,
    clean: Vec<u8>,
}

impl TelnetHandler for Recorder {
    fn send_raw_data(&mut self, data: &[u8]) {
        self.raw.extend_from_slice(data);
    }
    fn send_to_mapper(&mut self, data: &[u8], _go_ahead: bool) {
        self.clean.extend_from_slice(data);
    }
}

fn engine() -> TelnetEngine<Recorder> {
    TelnetEngine::new(
        Recorder::default(),
        TextCodec::new(TextCodecStrategy::AutoSelect, CharacterEncoding::Latin1),
    )
}

fn strip_iac_doubling(wire: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(wire.len());
    let mut iter = wire.iter().peekable();
    while let Some(byte) = iter.next() {
        out.push(*byte);
        if *byte == consts::IAC && iter.peek() == Some(&&consts::IAC) {
            iter.next();
        }
    }
    out
}

proptest! {
    /// For any payload with k embedded 0xFF bytes, the escaped wire form is
    /// exactly k bytes longer and unescapes back to the payload.
    #[test]
    fn submit_output_length_and_content(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let mut engine = engine();
        let iac_count = data.iter().filter(|b| **b == consts::IAC).count();
        engine.submit(&data, false);
        let wire = engine.handler().raw.clone();
        prop_assert_eq!(wire.len(), data.len() + iac_count);
        prop_assert_eq!(strip_iac_doubling(&wire), data);
    }

    /// Feeding the escaped output back through a second engine's receive
    /// path reproduces the original payload exactly.
    #[test]
    fn submit_output_reparses_to_original(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let mut sender = engine();
        sender.submit(&data, false);
        let wire = sender.handler().raw.clone();

        let mut receiver = engine();
        receiver.on_read(&wire).unwrap();
        prop_assert_eq!(receiver.handler().clean.clone(), data);
    }

    /// Delivery fragmentation never changes the decoded result.
    #[test]
    fn arbitrary_chunking_is_equivalent(
        data in proptest::collection::vec(any::<u8>(), 0..256),
        split in 0usize..256,
    ) {
        let mut sender = engine();
        sender.submit(&data, false);
        let wire = sender.handler().raw.clone();
        let split = split.min(wire.len());

        let mut whole = engine();
        whole.on_read(&wire).unwrap();

        let mut pieces = engine();
        pieces.on_read(&wire[..split]).unwrap();
        pieces.on_read(&wire[split..]).unwrap();

        prop_assert_eq!(&whole.handler().clean, &pieces.handler().clean);
    }
}
