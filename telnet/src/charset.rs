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

//! Transcoding between wire bytes and text, with an `AutoSelect` mode driven
//! by RFC 2066 CHARSET negotiation.

use tracing::debug;

/// RFC 2066 name for 7-bit ASCII.
pub const US_ASCII_ENCODING: &str = "US-ASCII";
/// RFC 2066 name for Latin-1.
pub const LATIN_1_ENCODING: &str = "ISO-8859-1";
/// RFC 2066 name for UTF-8.
pub const UTF_8_ENCODING: &str = "UTF-8";

/// The character encoding currently active on the wire.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CharacterEncoding {
    /// 7-bit US-ASCII; Latin-1 text is transliterated on encode.
    Ascii,
    /// ISO-8859-1.
    Latin1,
    /// UTF-8.
    Utf8,
}

impl CharacterEncoding {
    /// The RFC 2066 name for this encoding.
    pub fn name(self) -> &'static str {
        match self {
            CharacterEncoding::Ascii => US_ASCII_ENCODING,
            CharacterEncoding::Latin1 => LATIN_1_ENCODING,
            CharacterEncoding::Utf8 => UTF_8_ENCODING,
        }
    }

    fn from_name(name: &[u8]) -> Option<Self> {
        let name = std::str::from_utf8(name).ok()?;
        if name.eq_ignore_ascii_case(US_ASCII_ENCODING) {
            Some(CharacterEncoding::Ascii)
        } else if name.eq_ignore_ascii_case(LATIN_1_ENCODING) {
            Some(CharacterEncoding::Latin1)
        } else if name.eq_ignore_ascii_case(UTF_8_ENCODING) {
            Some(CharacterEncoding::Utf8)
        } else {
            None
        }
    }
}

/// How an endpoint selects its encoding.
///
/// `AutoSelect` starts from a configured default and then follows whatever
/// RFC 2066 negotiation settles on; the `Force*` strategies advertise exactly
/// one encoding and never move off it (MUME itself is Latin-1 only).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextCodecStrategy {
    /// Negotiable; advertises Latin-1, UTF-8 and US-ASCII.
    AutoSelect,
    /// Pinned to US-ASCII.
    ForceUsAscii,
    /// Pinned to Latin-1.
    ForceLatin1,
    /// Pinned to UTF-8.
    ForceUtf8,
}

/// Strategy object selecting ASCII/Latin-1/UTF-8 transcoding.
#[derive(Clone, Debug)]
pub struct TextCodec {
    strategy: TextCodecStrategy,
    encoding: CharacterEncoding,
}

impl TextCodec {
    /// Creates a codec for the given strategy. `AutoSelect` starts at the
    /// given default encoding.
    pub fn new(strategy: TextCodecStrategy, default_encoding: CharacterEncoding) -> Self {
        let encoding = match strategy {
            TextCodecStrategy::AutoSelect => default_encoding,
            TextCodecStrategy::ForceUsAscii => CharacterEncoding::Ascii,
            TextCodecStrategy::ForceLatin1 => CharacterEncoding::Latin1,
            TextCodecStrategy::ForceUtf8 => CharacterEncoding::Utf8,
        };
        TextCodec { strategy, encoding }
    }

    /// The active encoding.
    pub fn encoding(&self) -> CharacterEncoding {
        self.encoding
    }

    /// Switches the active encoding (configuration changes, not negotiation).
    pub fn set_encoding(&mut self, encoding: CharacterEncoding) {
        self.encoding = encoding;
    }

    /// Encodings this endpoint may advertise in a CHARSET REQUEST, in
    /// preference order.
    pub fn supported_encodings(&self) -> &'static [&'static str] {
        match self.strategy {
            TextCodecStrategy::AutoSelect => {
                &[LATIN_1_ENCODING, UTF_8_ENCODING, US_ASCII_ENCODING]
            }
            TextCodecStrategy::ForceLatin1 => &[LATIN_1_ENCODING],
            TextCodecStrategy::ForceUtf8 => &[UTF_8_ENCODING],
            TextCodecStrategy::ForceUsAscii => &[US_ASCII_ENCODING],
        }
    }

    /// Whether the peer's charset name is one we can switch to
    /// (case-insensitive).
    pub fn supports(&self, charset: &[u8]) -> bool {
        let Ok(name) = std::str::from_utf8(charset) else {
            return false;
        };
        self.supported_encodings()
            .iter()
            .any(|mine| mine.eq_ignore_ascii_case(name))
    }

    /// Switches the active encoding by RFC 2066 name. Returns false (and
    /// changes nothing) for unknown names.
    pub fn set_encoding_by_name(&mut self, charset: &[u8]) -> bool {
        match CharacterEncoding::from_name(charset) {
            Some(encoding) => {
                debug!("switching charset to {}", encoding.name());
                self.encoding = encoding;
                true
            }
            None => false,
        }
    }

    /// Encodes text into wire bytes for the active encoding. Characters the
    /// target cannot represent become `?`; ASCII output transliterates
    /// Latin-1 letters first.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self.encoding {
            CharacterEncoding::Utf8 => text.as_bytes().to_vec(),
            CharacterEncoding::Latin1 => text
                .chars()
                .map(|ch| if (ch as u32) < 256 { ch as u8 } else { b'?' })
                .collect(),
            CharacterEncoding::Ascii => text
                .chars()
                .map(|ch| {
                    if ch.is_ascii() {
                        ch as u8
                    } else {
                        latin1_to_ascii(ch).unwrap_or(b'?')
                    }
                })
                .collect(),
        }
    }

    /// Decodes wire bytes into text for the active encoding. Latin-1 and
    /// ASCII promote byte-per-char; UTF-8 decodes lossily.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self.encoding {
            CharacterEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            CharacterEncoding::Latin1 | CharacterEncoding::Ascii => {
                bytes.iter().map(|b| char::from(*b)).collect()
            }
        }
    }
}

/// Best-effort transliteration of Latin-1 letters to ASCII.
fn latin1_to_ascii(ch: char) -> Option<u8> {
    let out = match ch {
        '\u{a1}' => b'!',
        '\u{ab}' | '\u{bb}' => b'"',
        '\u{ad}' => b'-',
        '\u{b4}' => b'\'',
        '\u{bf}' => b'?',
        'À'..='Å' => b'A',
        'Æ' => b'A',
        'Ç' => b'C',
        'È'..='Ë' => b'E',
        'Ì'..='Ï' => b'I',
        'Ð' => b'D',
        'Ñ' => b'N',
        'Ò'..='Ö' | 'Ø' => b'O',
        'Ù'..='Ü' => b'U',
        'Ý' => b'Y',
        'Þ' => b'T',
        'ß' => b's',
        'à'..='å' => b'a',
        'æ' => b'a',
        'ç' => b'c',
        'è'..='ë' => b'e',
        'ì'..='ï' => b'i',
        'ð' => b'd',
        'ñ' => b'n',
        'ò'..='ö' | 'ø' => b'o',
        'ù'..='ü' => b'u',
        'ý' | 'ÿ' => b'y',
        'þ' => b't',
        _ => return None,
    };
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_strategies_advertise_one_encoding() {
        let codec = TextCodec::new(TextCodecStrategy::ForceLatin1, CharacterEncoding::Latin1);
        assert_eq!(codec.supported_encodings(), &[LATIN_1_ENCODING]);
        assert_eq!(codec.encoding(), CharacterEncoding::Latin1);
    }

    #[test]
    fn auto_select_prefers_latin1() {
        let codec = TextCodec::new(TextCodecStrategy::AutoSelect, CharacterEncoding::Latin1);
        assert_eq!(
            codec.supported_encodings(),
            &[LATIN_1_ENCODING, UTF_8_ENCODING, US_ASCII_ENCODING]
        );
    }

    #[test]
    fn supports_is_case_insensitive() {
        let codec = TextCodec::new(TextCodecStrategy::AutoSelect, CharacterEncoding::Latin1);
        assert!(codec.supports(b"utf-8"));
        assert!(codec.supports(b"ISO-8859-1"));
        assert!(!codec.supports(b"KOI8-R"));
    }

    #[test]
    fn set_encoding_by_name() {
        let mut codec = TextCodec::new(TextCodecStrategy::AutoSelect, CharacterEncoding::Latin1);
        assert!(codec.set_encoding_by_name(b"US-ASCII"));
        assert_eq!(codec.encoding(), CharacterEncoding::Ascii);
        assert!(!codec.set_encoding_by_name(b"EBCDIC"));
        assert_eq!(codec.encoding(), CharacterEncoding::Ascii);
    }

    #[test]
    fn latin1_roundtrip() {
        let codec = TextCodec::new(TextCodecStrategy::ForceLatin1, CharacterEncoding::Latin1);
        let encoded = codec.encode("héllo");
        assert_eq!(encoded, vec![b'h', 0xE9, b'l', b'l', b'o']);
        assert_eq!(codec.decode(&encoded), "héllo");
    }

    #[test]
    fn ascii_transliterates_accents() {
        let codec = TextCodec::new(TextCodecStrategy::ForceUsAscii, CharacterEncoding::Ascii);
        assert_eq!(codec.encode("héllo Ñoño"), b"hello Nono".to_vec());
        assert_eq!(codec.encode("日本"), b"??".to_vec());
    }

    #[test]
    fn utf8_passthrough() {
        let codec = TextCodec::new(TextCodecStrategy::ForceUtf8, CharacterEncoding::Utf8);
        assert_eq!(codec.encode("héllo"), "héllo".as_bytes().to_vec());
        assert_eq!(codec.decode("héllo".as_bytes()), "héllo");
    }
}
