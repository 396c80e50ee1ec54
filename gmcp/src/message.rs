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

//! GMCP message model: one `Package.Sub.Message [<json>]` wire token.

use std::fmt;

use tracing::debug;

/// Well-known message types, matched case-insensitively against the package
/// name. Anything unmatched remains a valid free-form message so that
/// server-specific extensions relay untouched.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[allow(missing_docs)]
pub enum GmcpMessageType {
    CharLogin,
    CharName,
    CharStatusVars,
    CharVitals,
    CoreGoodbye,
    CoreHello,
    CoreSupportsAdd,
    CoreSupportsRemove,
    CoreSupportsSet,
    EventDarkness,
    EventMoon,
    EventMoved,
    EventSun,
    ExternalDiscordHello,
    MudlinkCommGroupTell,
    RoomCharsAdd,
    RoomCharsRemove,
    RoomCharsSet,
    RoomCharsUpdate,
    RoomInfo,
    RoomUpdateExits,
}

/// (type, normalized name, friendly wire name)
const MESSAGE_TYPE_TABLE: &[(GmcpMessageType, &str, &str)] = &[
    (GmcpMessageType::CharLogin, "char.login", "Char.Login"),
    (GmcpMessageType::CharName, "char.name", "Char.Name"),
    (
        GmcpMessageType::CharStatusVars,
        "char.statusvars",
        "Char.StatusVars",
    ),
    (GmcpMessageType::CharVitals, "char.vitals", "Char.Vitals"),
    (GmcpMessageType::CoreGoodbye, "core.goodbye", "Core.Goodbye"),
    (GmcpMessageType::CoreHello, "core.hello", "Core.Hello"),
    (
        GmcpMessageType::CoreSupportsAdd,
        "core.supports.add",
        "Core.Supports.Add",
    ),
    (
        GmcpMessageType::CoreSupportsRemove,
        "core.supports.remove",
        "Core.Supports.Remove",
    ),
    (
        GmcpMessageType::CoreSupportsSet,
        "core.supports.set",
        "Core.Supports.Set",
    ),
    (
        GmcpMessageType::EventDarkness,
        "event.darkness",
        "Event.Darkness",
    ),
    (GmcpMessageType::EventMoon, "event.moon", "Event.Moon"),
    (GmcpMessageType::EventMoved, "event.moved", "Event.Moved"),
    (GmcpMessageType::EventSun, "event.sun", "Event.Sun"),
    (
        GmcpMessageType::ExternalDiscordHello,
        "external.discord.hello",
        "External.Discord.Hello",
    ),
    (
        GmcpMessageType::MudlinkCommGroupTell,
        "mudlink.comm.grouptell",
        "Mudlink.Comm.GroupTell",
    ),
    (
        GmcpMessageType::RoomCharsAdd,
        "room.chars.add",
        "Room.Chars.Add",
    ),
    (
        GmcpMessageType::RoomCharsRemove,
        "room.chars.remove",
        "Room.Chars.Remove",
    ),
    (
        GmcpMessageType::RoomCharsSet,
        "room.chars.set",
        "Room.Chars.Set",
    ),
    (
        GmcpMessageType::RoomCharsUpdate,
        "room.chars.update",
        "Room.Chars.Update",
    ),
    (GmcpMessageType::RoomInfo, "room.info", "Room.Info"),
    (
        GmcpMessageType::RoomUpdateExits,
        "room.update.exits",
        "Room.Update.Exits",
    ),
];

impl GmcpMessageType {
    /// The mixed-case name this type uses on the wire.
    pub fn friendly(self) -> &'static str {
        MESSAGE_TYPE_TABLE
            .iter()
            .find(|(ty, _, _)| *ty == self)
            .map(|(_, _, friendly)| *friendly)
            .expect("every message type is in the table")
    }

    fn classify(name: &str) -> Option<Self> {
        MESSAGE_TYPE_TABLE
            .iter()
            .find(|(_, normalized, _)| normalized.eq_ignore_ascii_case(name))
            .map(|(ty, _, _)| *ty)
    }
}

/// A JSON payload: the exact wire string plus the eagerly parsed document.
///
/// The raw string is authoritative for relaying. Re-serializing the parsed
/// document would alter whitespace and key order and has broken downstream
/// client parsers before, so the raw form is what goes back on the wire.
#[derive(Clone, Debug, PartialEq)]
pub struct GmcpJson {
    raw: String,
    document: Option<serde_json::Value>,
}

impl GmcpJson {
    /// Wraps a raw JSON string, parsing it eagerly. Invalid JSON is kept as
    /// raw text with no document; the message itself stays usable.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let document = match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!("GMCP payload is not valid JSON: {err}");
                None
            }
        };
        GmcpJson { raw, document }
    }

    /// The exact bytes received (or to be sent) on the wire.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed document, if the payload was valid JSON.
    pub fn document(&self) -> Option<&serde_json::Value> {
        self.document.as_ref()
    }
}

/// An immutable GMCP message: package name, optional JSON payload, and the
/// classification computed once at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct GmcpMessage {
    name: String,
    json: Option<GmcpJson>,
    ty: Option<GmcpMessageType>,
}

impl GmcpMessage {
    /// A payload-less message for a well-known type.
    pub fn new(ty: GmcpMessageType) -> Self {
        GmcpMessage {
            name: ty.friendly().to_owned(),
            json: None,
            ty: Some(ty),
        }
    }

    /// A message for a well-known type carrying a JSON payload.
    pub fn with_json(ty: GmcpMessageType, json: impl Into<String>) -> Self {
        GmcpMessage {
            name: ty.friendly().to_owned(),
            json: Some(GmcpJson::new(json)),
            ty: Some(ty),
        }
    }

    /// A free-form message (package name as given, classified if known).
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let ty = GmcpMessageType::classify(&name);
        GmcpMessage {
            name,
            json: None,
            ty,
        }
    }

    /// A free-form message with a JSON payload.
    pub fn from_name_and_json(name: impl Into<String>, json: impl Into<String>) -> Self {
        let name = name.into();
        let ty = GmcpMessageType::classify(&name);
        GmcpMessage {
            name,
            json: Some(GmcpJson::new(json)),
            ty,
        }
    }

    /// Parses a wire token: the first space splits name from payload, the
    /// payload itself may legitimately contain spaces.
    pub fn from_raw_bytes(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        match text.split_once(' ') {
            Some((name, json)) => Self::from_name_and_json(name, json),
            None => Self::from_name(text),
        }
    }

    /// Serializes to the wire form, preserving the payload byte-for-byte.
    pub fn to_raw_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            self.name.len() + self.json.as_ref().map_or(0, |j| 1 + j.raw().len()),
        );
        out.extend_from_slice(self.name.as_bytes());
        if let Some(json) = &self.json {
            out.push(b' ');
            out.extend_from_slice(json.raw().as_bytes());
        }
        out
    }

    /// Package name as it appeared on the wire (case preserved).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// JSON payload, if present.
    pub fn json(&self) -> Option<&GmcpJson> {
        self.json.as_ref()
    }

    /// Classification, if this is a well-known message.
    pub fn message_type(&self) -> Option<GmcpMessageType> {
        self.ty
    }

    /// Whether this message is of the given well-known type.
    pub fn is(&self, ty: GmcpMessageType) -> bool {
        self.ty == Some(ty)
    }
}

impl fmt::Display for GmcpMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(json) = &self.json {
            write!(f, " {}", json.raw())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_payload() {
        let msg = GmcpMessage::from_raw_bytes(b"Char.Vitals {\"hp\":100,\"mp\":50}");
        assert_eq!(msg.name(), "Char.Vitals");
        assert!(msg.is(GmcpMessageType::CharVitals));
        let json = msg.json().unwrap();
        assert_eq!(json.raw(), r#"{"hp":100,"mp":50}"#);
        assert_eq!(json.document().unwrap()["hp"], 100);
    }

    #[test]
    fn parse_without_payload() {
        let msg = GmcpMessage::from_raw_bytes(b"Core.Goodbye");
        assert!(msg.is(GmcpMessageType::CoreGoodbye));
        assert!(msg.json().is_none());
    }

    #[test]
    fn classification_is_case_insensitive() {
        let msg = GmcpMessage::from_raw_bytes(b"CORE.hello {}");
        assert!(msg.is(GmcpMessageType::CoreHello));
        // wire casing is preserved
        assert_eq!(msg.name(), "CORE.hello");
    }

    #[test]
    fn unknown_packages_stay_valid() {
        let msg = GmcpMessage::from_raw_bytes(b"Comm.Channel.Text {\"channel\":\"ooc\"}");
        assert_eq!(msg.message_type(), None);
        assert_eq!(msg.name(), "Comm.Channel.Text");
    }

    #[test]
    fn payload_spaces_are_not_split() {
        let msg = GmcpMessage::from_raw_bytes(b"Room.Info {\"name\": \"Town Square\"}");
        assert_eq!(msg.json().unwrap().raw(), r#"{"name": "Town Square"}"#);
    }

    #[test]
    fn relayed_payload_is_byte_exact() {
        // odd whitespace and key order must survive a parse/serialize round trip
        let wire = b"Char.Vitals {\"b\":2,  \"a\": 1 }";
        let msg = GmcpMessage::from_raw_bytes(wire);
        assert_eq!(msg.to_raw_bytes(), wire.to_vec());
    }

    #[test]
    fn invalid_json_is_kept_raw() {
        let msg = GmcpMessage::from_raw_bytes(b"Char.Vitals {not json");
        let json = msg.json().unwrap();
        assert_eq!(json.raw(), "{not json");
        assert!(json.document().is_none());
    }

    #[test]
    fn constructed_message_serializes() {
        let msg = GmcpMessage::with_json(GmcpMessageType::CoreHello, r#"{"client":"Mudlink"}"#);
        assert_eq!(
            msg.to_raw_bytes(),
            b"Core.Hello {\"client\":\"Mudlink\"}".to_vec()
        );
    }
}
