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

use bytes::BytesMut;
use tracing::warn;

/// The byte prefix every MPI header starts with.
const MPI_PREFIX: &[u8] = b"~$#E";

/// Line-ending classification of a cleaned-stream chunk, as produced by the
/// upstream telnet filter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[allow(missing_docs)]
pub enum TelnetDataKind {
    Prompt,
    MenuPrompt,
    Login,
    LoginPassword,
    Crlf,
    Lfcr,
    Lf,
    Telnet,
    Delay,
    Split,
    Unknown,
}

impl TelnetDataKind {
    /// MPI headers may only begin at the start of a line, so the previous
    /// chunk must have ended in a linefeed.
    fn ends_in_linefeed(self) -> bool {
        matches!(self, TelnetDataKind::Lf | TelnetDataKind::Crlf)
    }
}

/// One cleaned-stream chunk with its line-ending classification.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TelnetData {
    /// The chunk bytes.
    pub line: BytesMut,
    /// How the chunk ended.
    pub kind: TelnetDataKind,
}

/// Filter configuration.
#[derive(Clone, Copy, Debug)]
pub struct MpiFilterConfig {
    /// Whether remote editing is enabled at all; when off, MPI envelopes
    /// pass through as ordinary game text.
    pub remote_editing: bool,
}

impl Default for MpiFilterConfig {
    fn default() -> Self {
        MpiFilterConfig {
            remote_editing: true,
        }
    }
}

/// Downstream consumer of the filtered stream.
pub trait MpiHandler {
    /// Ordinary game text (everything that is not an MPI envelope).
    fn on_game_text(&mut self, data: TelnetData);

    /// A complete remote-edit session: session id, title, body.
    fn on_edit_message(&mut self, _session_id: i32, _title: &str, _body: &str) {}

    /// A complete remote-view message: title, body.
    fn on_view_message(&mut self, _title: &str, _body: &str) {}
}

/// Splits MUME's MPI remote-editing envelopes out of the mud→user cleaned
/// stream, reassembling payloads that span multiple deliveries.
///
/// Two states: scanning (default) and mid-envelope with a countdown of
/// payload bytes still expected. This is a best-effort protocol: malformed
/// envelopes are dropped with a warning and never dispatched partially.
pub struct MpiFilter {
    config: MpiFilterConfig,
    previous_kind: TelnetDataKind,
    parsing_mpi: bool,
    command: u8,
    remaining: usize,
    buffer: BytesMut,
}

impl Default for MpiFilter {
    fn default() -> Self {
        Self::new(MpiFilterConfig::default())
    }
}

impl MpiFilter {
    /// Creates a filter in the scanning state.
    pub fn new(config: MpiFilterConfig) -> Self {
        MpiFilter {
            config,
            previous_kind: TelnetDataKind::Prompt,
            parsing_mpi: false,
            command: 0,
            remaining: 0,
            buffer: BytesMut::new(),
        }
    }

    /// Feeds one cleaned-stream chunk. Non-MPI data (including any excess
    /// bytes beyond a declared MPI length) is re-emitted through
    /// `handler.on_game_text`; completed envelopes dispatch to the edit/view
    /// hooks.
    pub fn analyze<H: MpiHandler>(&mut self, data: TelnetData, handler: &mut H) {
        let kind = data.kind;
        if self.parsing_mpi {
            if data.line.len() <= self.remaining {
                self.remaining -= data.line.len();
                self.buffer.extend_from_slice(&data.line);
            } else {
                let consumed = self.remaining;
                self.buffer.extend_from_slice(&data.line[..consumed]);
                self.remaining = 0;
                // the excess belongs to ordinary game text again
                handler.on_game_text(TelnetData {
                    line: BytesMut::from(&data.line[consumed..]),
                    kind: data.kind,
                });
            }
            if self.remaining == 0 {
                self.parsing_mpi = false;
                let buffer = self.buffer.split();
                self.parse_message(&buffer, handler);
            }
        } else {
            // the protocol requires a LF before the start of an MPI message
            if self.previous_kind.ends_in_linefeed()
                && data.line.len() >= 6
                && data.line.starts_with(MPI_PREFIX)
            {
                self.buffer.clear();
                self.command = data.line[4];
                self.remaining = parse_decimal(&data.line[5..]);
                if self.config.remote_editing
                    && (self.command == b'V' || self.command == b'E')
                {
                    self.parsing_mpi = true;
                }
            }
            if !self.parsing_mpi {
                handler.on_game_text(data);
            }
        }

        self.previous_kind = kind;
    }

    fn parse_message<H: MpiHandler>(&self, buffer: &[u8], handler: &mut H) {
        match self.command {
            b'E' => parse_edit_message(buffer, handler),
            b'V' => parse_view_message(buffer, handler),
            command => {
                warn!("unsupported remote editing message command {command:?}");
            }
        }
    }
}

fn parse_edit_message<H: MpiHandler>(buffer: &[u8], handler: &mut H) {
    if buffer.first() != Some(&b'M') {
        warn!("expected 'M' at the start of a remote edit message");
        return;
    }
    let Some(session_end) = find_lf(buffer, 1) else {
        warn!("unable to detect remote editing session end");
        return;
    };
    let session_id = parse_decimal_i32(&buffer[1..session_end]);
    let Some(description_end) = find_lf(buffer, session_end + 1) else {
        warn!("unable to detect remote editing description end");
        return;
    };
    // MPI is always Latin-1
    let title = latin1_to_string(&buffer[session_end + 1..description_end]);
    let body = latin1_to_string(&buffer[description_end + 1..]);
    handler.on_edit_message(session_id, &title, &body);
}

fn parse_view_message<H: MpiHandler>(buffer: &[u8], handler: &mut H) {
    let Some(description_end) = find_lf(buffer, 0) else {
        warn!("unable to detect remote viewing description end");
        return;
    };
    let title = latin1_to_string(&buffer[..description_end]);
    let body = latin1_to_string(&buffer[description_end + 1..]);
    handler.on_view_message(&title, &body);
}

fn find_lf(buffer: &[u8], from: usize) -> Option<usize> {
    buffer
        .get(from..)?
        .iter()
        .position(|byte| *byte == b'\n')
        .map(|pos| from + pos)
}

fn parse_decimal(bytes: &[u8]) -> usize {
    let text: String = bytes
        .iter()
        .map(|byte| char::from(*byte))
        .collect::<String>();
    text.trim().parse().unwrap_or(0)
}

fn parse_decimal_i32(bytes: &[u8]) -> i32 {
    let text = latin1_to_string(bytes);
    text.trim().parse().unwrap_or(0)
}

fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| char::from(*byte)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        text: Vec<(Vec<u8>, TelnetDataKind)>,
        edits: Vec<(i32, String, String)>,
        views: Vec<(String, String)>,
    }

    impl MpiHandler for Recorder {
        fn on_game_text(&mut self, data: TelnetData) {
            self.text.push((data.line.to_vec(), data.kind));
        }
        fn on_edit_message(&mut self, session_id: i32, title: &str, body: &str) {
            self.edits
                .push((session_id, title.to_owned(), body.to_owned()));
        }
        fn on_view_message(&mut self, title: &str, body: &str) {
            self.views.push((title.to_owned(), body.to_owned()));
        }
    }

    fn chunk(line: &[u8], kind: TelnetDataKind) -> TelnetData {
        TelnetData {
            line: BytesMut::from(line),
            kind,
        }
    }

    #[test]
    fn plain_text_passes_through() {
        let mut filter = MpiFilter::default();
        let mut recorder = Recorder::default();
        filter.analyze(chunk(b"A dark room.\r\n", TelnetDataKind::Crlf), &mut recorder);
        assert_eq!(recorder.text.len(), 1);
        assert!(recorder.edits.is_empty());
    }

    #[test]
    fn edit_envelope_is_split_from_game_text() {
        let mut filter = MpiFilter::default();
        let mut recorder = Recorder::default();
        filter.analyze(chunk(b"before\n", TelnetDataKind::Lf), &mut recorder);
        filter.analyze(chunk(b"~$#EE10\n", TelnetDataKind::Lf), &mut recorder);
        filter.analyze(chunk(b"M1\nfoo\nbar", TelnetDataKind::Unknown), &mut recorder);
        assert_eq!(
            recorder.edits,
            vec![(1, "foo".to_owned(), "bar".to_owned())]
        );
        // only the "before" line reached the game-text stream
        assert_eq!(recorder.text.len(), 1);
    }

    #[test]
    fn header_requires_preceding_linefeed() {
        let mut filter = MpiFilter::default();
        let mut recorder = Recorder::default();
        // previous chunk was a prompt, so the header is ordinary text
        filter.analyze(chunk(b"~$#EE10\n", TelnetDataKind::Lf), &mut recorder);
        assert_eq!(recorder.text.len(), 1);
        assert!(recorder.edits.is_empty());
    }

    #[test]
    fn envelope_split_across_deliveries_matches_single_delivery() {
        let deliver =
            |chunks: &[&[u8]]| -> Vec<(i32, String, String)> {
                let mut filter = MpiFilter::default();
                let mut recorder = Recorder::default();
                filter.analyze(chunk(b"before\n", TelnetDataKind::Lf), &mut recorder);
                filter.analyze(chunk(b"~$#EE10\n", TelnetDataKind::Lf), &mut recorder);
                for piece in chunks {
                    filter.analyze(chunk(piece, TelnetDataKind::Unknown), &mut recorder);
                }
                recorder.edits
            };
        let single = deliver(&[b"M1\nfoo\nbar"]);
        let split = deliver(&[b"M1\nfo", b"o\nbar"]);
        assert_eq!(single, split);
        assert_eq!(single, vec![(1, "foo".to_owned(), "bar".to_owned())]);
    }

    #[test]
    fn excess_bytes_are_reinjected_as_game_text() {
        let mut filter = MpiFilter::default();
        let mut recorder = Recorder::default();
        filter.analyze(chunk(b"before\n", TelnetDataKind::Lf), &mut recorder);
        filter.analyze(chunk(b"~$#EV6\n", TelnetDataKind::Lf), &mut recorder);
        filter.analyze(
            chunk(b"t\nbodyAfter the envelope\r\n", TelnetDataKind::Crlf),
            &mut recorder,
        );
        assert_eq!(recorder.views, vec![("t".to_owned(), "body".to_owned())]);
        assert_eq!(
            recorder.text.last().unwrap().0,
            b"After the envelope\r\n".to_vec()
        );
    }

    #[test]
    fn view_message_parses_title_and_body() {
        let mut filter = MpiFilter::default();
        let mut recorder = Recorder::default();
        filter.analyze(chunk(b"x\n", TelnetDataKind::Lf), &mut recorder);
        filter.analyze(chunk(b"~$#EV12\n", TelnetDataKind::Lf), &mut recorder);
        filter.analyze(chunk(b"title\nline1\n", TelnetDataKind::Lf), &mut recorder);
        assert_eq!(
            recorder.views,
            vec![("title".to_owned(), "line1\n".to_owned())]
        );
    }

    #[test]
    fn malformed_edit_message_is_dropped() {
        let mut filter = MpiFilter::default();
        let mut recorder = Recorder::default();
        filter.analyze(chunk(b"x\n", TelnetDataKind::Lf), &mut recorder);
        filter.analyze(chunk(b"~$#EE7\n", TelnetDataKind::Lf), &mut recorder);
        // no LF after the session id field
        filter.analyze(chunk(b"M1 foo.", TelnetDataKind::Unknown), &mut recorder);
        assert!(recorder.edits.is_empty());
    }

    #[test]
    fn remote_editing_disabled_passes_envelopes_through() {
        let mut filter = MpiFilter::new(MpiFilterConfig {
            remote_editing: false,
        });
        let mut recorder = Recorder::default();
        filter.analyze(chunk(b"x\n", TelnetDataKind::Lf), &mut recorder);
        filter.analyze(chunk(b"~$#EE10\n", TelnetDataKind::Lf), &mut recorder);
        filter.analyze(chunk(b"M1\nfoo\nbar", TelnetDataKind::Unknown), &mut recorder);
        assert!(recorder.edits.is_empty());
        assert_eq!(recorder.text.len(), 3);
    }

    #[test]
    fn latin1_payload_survives_decoding() {
        let mut filter = MpiFilter::default();
        let mut recorder = Recorder::default();
        filter.analyze(chunk(b"x\n", TelnetDataKind::Lf), &mut recorder);
        filter.analyze(chunk(b"~$#EV8\n", TelnetDataKind::Lf), &mut recorder);
        filter.analyze(chunk(b"t\xE9xt\n\xE9\xE8\xE7", TelnetDataKind::Unknown), &mut recorder);
        assert_eq!(
            recorder.views,
            vec![("t\u{e9}xt".to_owned(), "\u{e9}\u{e8}\u{e7}".to_owned())]
        );
    }
}
