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

//! GMCP module (capability) model: `Core.Supports.*` entries.

use std::collections::HashMap;
use std::fmt;

/// Module families the proxy itself cares about. Anything else is still
/// tracked for pass-through relaying but never drives local behavior.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GmcpModuleType {
    /// `Char` - character name, vitals and stats.
    Char,
    /// `Event` - world events (darkness, moves, moon, sun).
    Event,
    /// `External.Discord` - Discord rich-presence hand-off.
    ExternalDiscord,
    /// `Mudlink.Comm` - proxy-internal group communication.
    MudlinkComm,
    /// `Room.Chars` - characters present in the current room.
    RoomChars,
}

impl GmcpModuleType {
    /// Number of known module families.
    pub const COUNT: usize = 5;

    /// All known module families, in declaration order.
    pub const ALL: [GmcpModuleType; Self::COUNT] = [
        GmcpModuleType::Char,
        GmcpModuleType::Event,
        GmcpModuleType::ExternalDiscord,
        GmcpModuleType::MudlinkComm,
        GmcpModuleType::RoomChars,
    ];

    /// Lowercase canonical form used as set/lookup identity.
    pub fn normalized(self) -> &'static str {
        match self {
            GmcpModuleType::Char => "char",
            GmcpModuleType::Event => "event",
            GmcpModuleType::ExternalDiscord => "external.discord",
            GmcpModuleType::MudlinkComm => "mudlink.comm",
            GmcpModuleType::RoomChars => "room.chars",
        }
    }

    /// Mixed-case form used on the wire.
    pub fn friendly(self) -> &'static str {
        match self {
            GmcpModuleType::Char => "Char",
            GmcpModuleType::Event => "Event",
            GmcpModuleType::ExternalDiscord => "External.Discord",
            GmcpModuleType::MudlinkComm => "Mudlink.Comm",
            GmcpModuleType::RoomChars => "Room.Chars",
        }
    }

    fn from_normalized(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.normalized().eq_ignore_ascii_case(name))
    }

    /// Stable index for [`GmcpModuleVersionList`].
    pub fn index(self) -> usize {
        match self {
            GmcpModuleType::Char => 0,
            GmcpModuleType::Event => 1,
            GmcpModuleType::ExternalDiscord => 2,
            GmcpModuleType::MudlinkComm => 3,
            GmcpModuleType::RoomChars => 4,
        }
    }
}

impl fmt::Display for GmcpModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.friendly())
    }
}

/// Negotiated module version. Zero means "not negotiated": every enable must
/// carry an explicit version per protocol convention.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct GmcpModuleVersion(u32);

impl GmcpModuleVersion {
    /// The "not negotiated" sentinel.
    pub const DEFAULT: GmcpModuleVersion = GmcpModuleVersion(0);

    /// Wraps a raw version number.
    pub const fn new(value: u32) -> Self {
        GmcpModuleVersion(value)
    }

    /// Raw version number.
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for GmcpModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Versions negotiated for each known module family, indexed by
/// [`GmcpModuleType`]. A default entry means the family was never enabled.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GmcpModuleVersionList {
    versions: [GmcpModuleVersion; GmcpModuleType::COUNT],
}

impl GmcpModuleVersionList {
    /// Negotiated version for a module family.
    pub fn get(&self, ty: GmcpModuleType) -> GmcpModuleVersion {
        self.versions[ty.index()]
    }

    /// Records the negotiated version for a module family.
    pub fn set(&mut self, ty: GmcpModuleType, version: GmcpModuleVersion) {
        self.versions[ty.index()] = version;
    }

    /// Clears every entry back to "not negotiated".
    pub fn clear(&mut self) {
        self.versions = Default::default();
    }
}

/// Errors reported while updating the module registry. These are recoverable:
/// the offending update is dropped and the connection continues.
#[derive(Debug, thiserror::Error)]
pub enum GmcpError {
    /// A module was enabled without the mandatory version number.
    #[error("module {name:?} was enabled without a version")]
    MissingVersion {
        /// Normalized name of the offending module.
        name: String,
    },
}

/// One `Core.Supports.*` entry: a normalized module name plus an optional
/// version. Identity (equality, hashing, set membership) is the normalized
/// name alone; the original casing is not preserved anywhere.
#[derive(Clone, Debug)]
pub struct GmcpModule {
    normalized_name: String,
    version: GmcpModuleVersion,
    ty: Option<GmcpModuleType>,
}

impl GmcpModule {
    /// Parses `"Name"` or `"Name Version"`. The version is an unsigned
    /// base-10 integer; a negative or unparseable version clamps to 0.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        let (name, version) = match token.split_once(' ') {
            Some((name, rest)) => {
                let version = rest
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .filter(|v| *v > 0)
                    .map_or(0, |v| u32::try_from(v).unwrap_or(u32::MAX));
                (name, version)
            }
            None => (token, 0),
        };
        Self::new(name, GmcpModuleVersion::new(version))
    }

    /// Builds a module from a name and version.
    pub fn new(name: &str, version: GmcpModuleVersion) -> Self {
        let normalized_name = name.to_ascii_lowercase();
        let ty = GmcpModuleType::from_normalized(&normalized_name);
        GmcpModule {
            normalized_name,
            version,
            ty,
        }
    }

    /// Builds a module for a known family.
    pub fn from_type(ty: GmcpModuleType, version: GmcpModuleVersion) -> Self {
        GmcpModule {
            normalized_name: ty.normalized().to_owned(),
            version,
            ty: Some(ty),
        }
    }

    /// The module family, if this is one the proxy knows about.
    pub fn module_type(&self) -> Option<GmcpModuleType> {
        self.ty
    }

    /// Whether this module is relevant to the proxy itself.
    pub fn is_supported(&self) -> bool {
        self.ty.is_some()
    }

    /// Whether an explicit version was negotiated.
    pub fn has_version(&self) -> bool {
        self.version > GmcpModuleVersion::DEFAULT
    }

    /// Negotiated version (default when absent).
    pub fn version(&self) -> GmcpModuleVersion {
        self.version
    }

    /// Lowercase canonical name.
    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    /// Wire form: `name` or `name version`.
    pub fn to_wire_string(&self) -> String {
        if self.has_version() {
            format!("{} {}", self.normalized_name, self.version)
        } else {
            self.normalized_name.clone()
        }
    }
}

impl PartialEq for GmcpModule {
    fn eq(&self, other: &Self) -> bool {
        self.normalized_name == other.normalized_name
    }
}

impl Eq for GmcpModule {}

impl fmt::Display for GmcpModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire_string())
    }
}

/// A set of modules keyed by normalized name. Inserting a module with a name
/// already present replaces the old entry (the version may differ).
#[derive(Clone, Debug, Default)]
pub struct GmcpModuleSet {
    modules: HashMap<String, GmcpModule>,
}

impl GmcpModuleSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a module.
    pub fn insert(&mut self, module: GmcpModule) {
        self.modules
            .insert(module.normalized_name().to_owned(), module);
    }

    /// Removes a module by normalized name.
    pub fn remove(&mut self, normalized_name: &str) {
        self.modules.remove(normalized_name);
    }

    /// Whether a module with this normalized name is present.
    pub fn contains(&self, normalized_name: &str) -> bool {
        self.modules.contains_key(normalized_name)
    }

    /// Drops every module.
    pub fn clear(&mut self) {
        self.modules.clear();
    }

    /// Number of modules in the set.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterates the modules in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &GmcpModule> {
        self.modules.values()
    }
}

impl FromIterator<GmcpModule> for GmcpModuleSet {
    fn from_iter<T: IntoIterator<Item = GmcpModule>>(iter: T) -> Self {
        let mut set = GmcpModuleSet::new();
        for module in iter {
            set.insert(module);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_name_and_version() {
        let module = GmcpModule::parse("Char.Skills 2");
        assert_eq!(module.normalized_name(), "char.skills");
        assert_eq!(module.version(), GmcpModuleVersion::new(2));
        assert!(module.has_version());
    }

    #[test]
    fn parse_name_only() {
        let module = GmcpModule::parse("Room");
        assert_eq!(module.normalized_name(), "room");
        assert_eq!(module.version(), GmcpModuleVersion::DEFAULT);
        assert!(!module.has_version());
    }

    #[test]
    fn negative_version_clamps_to_zero() {
        let module = GmcpModule::parse("Char -3");
        assert_eq!(module.version(), GmcpModuleVersion::DEFAULT);
        assert!(!module.has_version());
    }

    #[test]
    fn known_modules_classify() {
        assert_eq!(
            GmcpModule::parse("Char 1").module_type(),
            Some(GmcpModuleType::Char)
        );
        assert_eq!(
            GmcpModule::parse("ROOM.CHARS 1").module_type(),
            Some(GmcpModuleType::RoomChars)
        );
        assert_eq!(GmcpModule::parse("Comm.Channel 1").module_type(), None);
    }

    #[test]
    fn identity_is_name_not_version() {
        assert_eq!(GmcpModule::parse("Char 1"), GmcpModule::parse("char 2"));
    }

    #[test]
    fn set_replaces_on_insert() {
        let mut set = GmcpModuleSet::new();
        set.insert(GmcpModule::parse("Char 1"));
        set.insert(GmcpModule::parse("Char 2"));
        assert_eq!(set.len(), 1);
        let stored = set.iter().next().unwrap();
        assert_eq!(stored.version(), GmcpModuleVersion::new(2));
    }

    #[test]
    fn unknown_modules_are_still_stored() {
        let mut set = GmcpModuleSet::new();
        set.insert(GmcpModule::parse("Comm.Channel 1"));
        assert!(set.contains("comm.channel"));
    }

    #[test]
    fn version_list_roundtrip() {
        let mut list = GmcpModuleVersionList::default();
        assert_eq!(list.get(GmcpModuleType::Char), GmcpModuleVersion::DEFAULT);
        list.set(GmcpModuleType::Char, GmcpModuleVersion::new(1));
        assert_eq!(list.get(GmcpModuleType::Char), GmcpModuleVersion::new(1));
        list.clear();
        assert_eq!(list.get(GmcpModuleType::Char), GmcpModuleVersion::DEFAULT);
    }
}
