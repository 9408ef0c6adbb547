//! Frozen converter registry

use std::collections::{BTreeMap, HashMap};

use abibridge_core::{BridgeError, BridgeResult, Direction, Side, StructVersionKey};
use abibridge_layout::{
    CallbackTranscriber, ConverterPair, LayoutRules, PairDirection, StructLayout, Transcribe,
};

use crate::RegistryBuilder;

/// What is registered under one key
#[derive(Clone, Debug)]
pub enum Entry {
    Pair(ConverterPair),
    Callback(CallbackTranscriber),
}

impl Entry {
    pub fn key(&self) -> StructVersionKey {
        match self {
            Entry::Pair(pair) => pair.key(),
            Entry::Callback(cb) => cb.key(),
        }
    }

    pub fn layout(&self, side: Side) -> &StructLayout {
        match self {
            Entry::Pair(pair) => pair.layout(side),
            Entry::Callback(cb) => cb.layout(side),
        }
    }

    #[inline]
    pub fn size(&self, side: Side) -> usize {
        self.layout(side).size
    }

    /// Whether a transcription exists for `direction`
    pub fn supports(&self, direction: Direction) -> bool {
        match self {
            Entry::Pair(_) => true,
            Entry::Callback(cb) => cb.direction() == direction,
        }
    }

    pub fn transcriber(&self, direction: Direction) -> BridgeResult<Transcriber<'_>> {
        match self {
            Entry::Pair(pair) => Ok(Transcriber::Pair(pair.direction(direction))),
            Entry::Callback(cb) if cb.direction() == direction => Ok(Transcriber::Callback(cb)),
            Entry::Callback(cb) => Err(BridgeError::DirectionUnavailable {
                key: cb.key(),
                direction,
            }),
        }
    }
}

/// Transcription handed to a dispatcher for one (type, version, direction)
#[derive(Clone, Copy, Debug)]
pub enum Transcriber<'a> {
    Pair(PairDirection<'a>),
    Callback(&'a CallbackTranscriber),
}

impl Transcribe for Transcriber<'_> {
    fn key(&self) -> StructVersionKey {
        match self {
            Transcriber::Pair(p) => p.key(),
            Transcriber::Callback(cb) => cb.key(),
        }
    }

    fn direction(&self) -> Direction {
        match self {
            Transcriber::Pair(p) => p.direction(),
            Transcriber::Callback(cb) => cb.direction(),
        }
    }

    fn source_size(&self) -> usize {
        match self {
            Transcriber::Pair(p) => p.source_size(),
            Transcriber::Callback(cb) => cb.source_size(),
        }
    }

    fn destination_size(&self) -> usize {
        match self {
            Transcriber::Pair(p) => p.destination_size(),
            Transcriber::Callback(cb) => cb.destination_size(),
        }
    }

    fn transcribe(&self, src: &[u8], dst: &mut [u8]) -> BridgeResult<()> {
        match self {
            Transcriber::Pair(p) => p.transcribe(src, dst),
            Transcriber::Callback(cb) => cb.transcribe(src, dst),
        }
    }
}

/// Immutable set of converters, populated once by `RegistryBuilder`
#[derive(Clone, Debug)]
pub struct Registry {
    rules: LayoutRules,
    entries: HashMap<&'static str, BTreeMap<u32, Entry>>,
    len: usize,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new(LayoutRules::default())
    }

    pub(crate) fn from_entries(rules: LayoutRules, list: Vec<Entry>) -> BridgeResult<Self> {
        let mut entries: HashMap<&'static str, BTreeMap<u32, Entry>> = HashMap::new();
        let mut len = 0;
        for entry in list {
            let key = entry.key();
            let versions = entries.entry(key.name).or_default();
            if versions.contains_key(&key.version) {
                return Err(BridgeError::DuplicateRegistration(key));
            }
            versions.insert(key.version, entry);
            len += 1;
        }
        Ok(Registry {
            rules,
            entries,
            len,
        })
    }

    pub fn rules(&self) -> &LayoutRules {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, key: StructVersionKey) -> Option<&Entry> {
        self.find(key.name, key.version)
    }

    /// Look up with a borrowed name, e.g. one read from a C string
    pub fn find(&self, name: &str, version: u32) -> Option<&Entry> {
        self.entries.get(name)?.get(&version)
    }

    fn entry(&self, name: &str, version: u32) -> BridgeResult<&Entry> {
        self.find(name, version)
            .ok_or_else(|| BridgeError::UnknownStruct(name.to_string(), version))
    }

    pub fn pair(&self, key: StructVersionKey) -> BridgeResult<&ConverterPair> {
        match self.entry(key.name, key.version)? {
            Entry::Pair(pair) => Ok(pair),
            Entry::Callback(_) => Err(BridgeError::WrongKind {
                key,
                expected: "converter pair",
            }),
        }
    }

    pub fn callback(&self, key: StructVersionKey) -> BridgeResult<&CallbackTranscriber> {
        match self.entry(key.name, key.version)? {
            Entry::Callback(cb) => Ok(cb),
            Entry::Pair(_) => Err(BridgeError::WrongKind {
                key,
                expected: "callback",
            }),
        }
    }

    pub fn transcriber(
        &self,
        key: StructVersionKey,
        direction: Direction,
    ) -> BridgeResult<Transcriber<'_>> {
        self.lookup(key.name, key.version, direction)
    }

    pub fn lookup(
        &self,
        name: &str,
        version: u32,
        direction: Direction,
    ) -> BridgeResult<Transcriber<'_>> {
        self.entry(name, version)?.transcriber(direction)
    }

    /// Registered versions of one type, ascending
    pub fn versions(&self, name: &str) -> Vec<u32> {
        self.entries
            .get(name)
            .map(|v| v.keys().copied().collect())
            .unwrap_or_default()
    }

    /// All keys, sorted
    pub fn keys(&self) -> Vec<StructVersionKey> {
        let mut keys: Vec<_> = self
            .entries
            .values()
            .flat_map(|versions| versions.values().map(Entry::key))
            .collect();
        keys.sort();
        keys
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values().flat_map(|versions| versions.values())
    }
}
