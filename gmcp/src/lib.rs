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

//! # Mudlink GMCP Model
//!
//! GMCP (Generic MUD Communication Protocol) message and module model used by
//! the Mudlink telnet engine.
//!
//! GMCP rides inside telnet subnegotiations (option 201) and carries wire
//! tokens of the form `<package>[.<subpackage>].<Message> [<json>]`. This
//! crate models two things:
//!
//! - [`GmcpMessage`]: one wire token, split at the first space into a package
//!   name and an optional JSON payload. The raw payload string is retained
//!   verbatim so a relayed message is byte-for-byte identical to what the
//!   server sent, while an eagerly parsed [`serde_json::Value`] is kept for
//!   structured access.
//! - [`GmcpModule`]: one entry of a `Core.Supports.*` capability list
//!   (`"Char 1"` → name `char`, version `1`), with set semantics keyed by
//!   the lowercased normalized name.
//!
//! ## References
//!
//! - [GMCP Protocol Specification](https://tintin.mudhalla.net/protocols/gmcp/)

#![warn(future_incompatible, rust_2018_idioms, missing_docs)]

mod escape;
mod message;
mod module;

pub use self::escape::escape_gmcp_string_data;
pub use self::message::{GmcpJson, GmcpMessage, GmcpMessageType};
pub use self::module::{
    GmcpError, GmcpModule, GmcpModuleSet, GmcpModuleType, GmcpModuleVersion, GmcpModuleVersionList,
};
