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

//! # Mudlink MPI Filter
//!
//! MUME's MPI remote-editing protocol rides out-of-band inside the ordinary
//! game text: after a line boundary, the server may emit a
//! `~$#E<cmd><decimal-length>\n` header followed by exactly that many payload
//! bytes, carrying a remote *edit* (`E`) or *view* (`V`) session. This crate
//! filters those envelopes out of the already-detelnetted mud→user stream,
//! reassembling payloads that arrive split across deliveries, and passes
//! everything else through untouched.
//!
//! All MPI text is Latin-1 regardless of the negotiated telnet charset.

#![warn(future_incompatible, rust_2018_idioms, missing_docs)]

mod filter;

pub use self::filter::{MpiFilter, MpiFilterConfig, MpiHandler, TelnetData, TelnetDataKind};
