//! Registry population

use std::collections::HashMap;

use abibridge_core::{BridgeError, BridgeResult, Direction, Side, StructVersionKey};
use abibridge_layout::{CallbackTranscriber, ConverterPair, LayoutDescriptor, LayoutRules};

use crate::{Entry, Registry};

/// Sizes a struct must have on each side, taken from the API headers
/// or from a host mirror type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeCheck {
    pub foreign: usize,
    pub native: usize,
}

impl SizeCheck {
    pub fn new(foreign: usize, native: usize) -> Self {
        SizeCheck { foreign, native }
    }

    fn side(&self, side: Side) -> usize {
        match side {
            Side::Foreign => self.foreign,
            Side::Native => self.native,
        }
    }
}

/// Field offsets a struct must have on one side, keyed by dotted path
/// (`m_NetAdr.m_unIP`), typically taken with `offset_of!` on a host mirror
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OffsetCheck {
    pub side: Side,
    pub offsets: Vec<(&'static str, usize)>,
}

impl OffsetCheck {
    pub fn new(side: Side, offsets: Vec<(&'static str, usize)>) -> Self {
        OffsetCheck { side, offsets }
    }

    pub fn native(offsets: Vec<(&'static str, usize)>) -> Self {
        OffsetCheck::new(Side::Native, offsets)
    }

    pub fn foreign(offsets: Vec<(&'static str, usize)>) -> Self {
        OffsetCheck::new(Side::Foreign, offsets)
    }
}

#[derive(Clone, Copy, Debug)]
enum Shape {
    Pair,
    Callback(Direction),
}

#[derive(Clone, Copy, Debug)]
struct Registration {
    descriptor: &'static LayoutDescriptor,
    shape: Shape,
}

/// Collects registrations; nothing is looked up until `build`
#[derive(Debug)]
pub struct RegistryBuilder {
    rules: LayoutRules,
    pending: Vec<Registration>,
    checks: HashMap<StructVersionKey, SizeCheck>,
    offsets: Vec<(StructVersionKey, OffsetCheck)>,
}

impl RegistryBuilder {
    pub fn new(rules: LayoutRules) -> Self {
        RegistryBuilder {
            rules,
            pending: Vec::new(),
            checks: HashMap::new(),
            offsets: Vec::new(),
        }
    }

    pub fn rules(&self) -> &LayoutRules {
        &self.rules
    }

    pub fn register_pair(&mut self, descriptor: &'static LayoutDescriptor) -> &mut Self {
        self.pending.push(Registration {
            descriptor,
            shape: Shape::Pair,
        });
        self
    }

    pub fn register_callback(
        &mut self,
        descriptor: &'static LayoutDescriptor,
        direction: Direction,
    ) -> &mut Self {
        self.pending.push(Registration {
            descriptor,
            shape: Shape::Callback(direction),
        });
        self
    }

    /// Assert the computed sizes of `key` when the registry is built
    pub fn expect_sizes(&mut self, key: StructVersionKey, sizes: SizeCheck) -> &mut Self {
        self.checks.insert(key, sizes);
        self
    }

    /// Assert field offsets of `key` when the registry is built
    pub fn expect_offsets(&mut self, key: StructVersionKey, check: OffsetCheck) -> &mut Self {
        self.offsets.push((key, check));
        self
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Lay out every registration, verify asserted sizes and offsets, freeze
    pub fn build(self) -> BridgeResult<Registry> {
        self.rules.validate()?;

        let mut entries = Vec::with_capacity(self.pending.len());
        for reg in &self.pending {
            let entry = match reg.shape {
                Shape::Pair => Entry::Pair(ConverterPair::new(reg.descriptor, &self.rules)?),
                Shape::Callback(direction) => Entry::Callback(CallbackTranscriber::new(
                    reg.descriptor,
                    direction,
                    &self.rules,
                )?),
            };
            tracing::debug!(
                key = %entry.key(),
                foreign = entry.size(Side::Foreign),
                native = entry.size(Side::Native),
                "registered {}",
                match reg.shape {
                    Shape::Pair => "converter pair",
                    Shape::Callback(_) => "callback transcriber",
                }
            );
            entries.push(entry);
        }

        let find = |key: StructVersionKey| {
            entries
                .iter()
                .find(|e| e.key() == key)
                .ok_or_else(|| BridgeError::UnknownStruct(key.name.to_string(), key.version))
        };

        for (key, check) in &self.checks {
            let entry = find(*key)?;
            for side in [Side::Foreign, Side::Native] {
                let actual = entry.size(side);
                let expected = check.side(side);
                if actual != expected {
                    tracing::warn!(%key, %side, expected, actual, "layout size mismatch");
                    return Err(BridgeError::LayoutMismatch {
                        key: *key,
                        side,
                        expected,
                        actual,
                    });
                }
            }
        }

        for (key, check) in &self.offsets {
            let entry = find(*key)?;
            let layout = entry.layout(check.side);
            for &(field, expected) in &check.offsets {
                let actual = layout
                    .field_range(field)
                    .ok_or_else(|| BridgeError::UnknownField {
                        key: *key,
                        field: field.to_string(),
                    })?
                    .start;
                if actual != expected {
                    tracing::warn!(
                        %key,
                        side = %check.side,
                        field,
                        expected,
                        actual,
                        "field offset mismatch"
                    );
                    return Err(BridgeError::OffsetMismatch {
                        key: *key,
                        side: check.side,
                        field: field.to_string(),
                        expected,
                        actual,
                    });
                }
            }
        }

        let registry = Registry::from_entries(self.rules, entries)?;
        tracing::info!(structs = registry.len(), "converter registry built");
        Ok(registry)
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        RegistryBuilder::new(LayoutRules::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abibridge_layout::{FieldSpec, PackingRule, ScalarWidth};
    use std::mem::{offset_of, size_of};

    static PING: LayoutDescriptor = LayoutDescriptor {
        key: StructVersionKey::new("ping_t", 1),
        fields: &[FieldSpec::u64("sent_at"), FieldSpec::i32("rtt")],
    };

    static EMPTY: LayoutDescriptor = LayoutDescriptor {
        key: StructVersionKey::new("empty_t", 1),
        fields: &[],
    };

    static HANDLE: LayoutDescriptor = LayoutDescriptor {
        key: StructVersionKey::new("handle_t", 4),
        fields: &[FieldSpec::handle("h", ScalarWidth::W4)],
    };

    #[repr(C)]
    #[allow(dead_code)]
    struct Ping {
        sent_at: u64,
        rtt: i32,
    }

    #[test]
    fn test_build_with_size_checks() {
        let mut builder = RegistryBuilder::default();
        builder
            .register_pair(&PING)
            .expect_sizes(PING.key, SizeCheck::new(16, size_of::<Ping>()));
        assert_eq!(builder.len(), 1);
        let reg = builder.build().unwrap();
        assert_eq!(reg.pair(PING.key).unwrap().foreign_size(), 16);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let mut builder = RegistryBuilder::default();
        builder
            .register_pair(&PING)
            .expect_sizes(PING.key, SizeCheck::new(12, size_of::<Ping>()));
        assert_eq!(
            builder.build().unwrap_err(),
            BridgeError::LayoutMismatch {
                key: PING.key,
                side: Side::Foreign,
                expected: 12,
                actual: 16,
            }
        );
    }

    #[test]
    fn test_check_for_unregistered_key() {
        let mut builder = RegistryBuilder::default();
        builder
            .register_pair(&HANDLE)
            .expect_sizes(PING.key, SizeCheck::new(16, 16));
        assert_eq!(
            builder.build().unwrap_err(),
            BridgeError::UnknownStruct("ping_t".into(), 1)
        );
    }

    static NETADR_SWAPPED: LayoutDescriptor = LayoutDescriptor {
        key: StructVersionKey::new("servernetadr_t", 999),
        fields: &[
            FieldSpec::u32("m_unIP"),
            FieldSpec::u16("m_usConnectionPort"),
            FieldSpec::u16("m_usQueryPort"),
        ],
    };

    #[repr(C)]
    #[allow(dead_code)]
    struct NetAdr {
        connection_port: u16,
        query_port: u16,
        ip: u32,
    }

    fn netadr_offsets() -> OffsetCheck {
        OffsetCheck::native(vec![
            ("m_usConnectionPort", offset_of!(NetAdr, connection_port)),
            ("m_usQueryPort", offset_of!(NetAdr, query_port)),
            ("m_unIP", offset_of!(NetAdr, ip)),
        ])
    }

    #[test]
    fn test_reordered_fields_rejected() {
        // Same total size as the host struct, fields in the wrong order
        let mut builder = RegistryBuilder::default();
        builder
            .register_pair(&NETADR_SWAPPED)
            .expect_sizes(NETADR_SWAPPED.key, SizeCheck::new(8, size_of::<NetAdr>()))
            .expect_offsets(NETADR_SWAPPED.key, netadr_offsets());
        assert_eq!(
            builder.build().unwrap_err(),
            BridgeError::OffsetMismatch {
                key: NETADR_SWAPPED.key,
                side: Side::Native,
                field: "m_usConnectionPort".into(),
                expected: 0,
                actual: 4,
            }
        );
    }

    #[test]
    fn test_offsets_accepted() {
        static NETADR: LayoutDescriptor = LayoutDescriptor {
            key: StructVersionKey::new("servernetadr_t", 1),
            fields: &[
                FieldSpec::u16("m_usConnectionPort"),
                FieldSpec::u16("m_usQueryPort"),
                FieldSpec::u32("m_unIP"),
            ],
        };
        let mut builder = RegistryBuilder::default();
        builder
            .register_pair(&NETADR)
            .expect_offsets(NETADR.key, netadr_offsets())
            .expect_offsets(
                NETADR.key,
                OffsetCheck::foreign(vec![("m_usQueryPort", 2), ("m_unIP", 4)]),
            );
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_offset_check_unknown_field() {
        let mut builder = RegistryBuilder::default();
        builder
            .register_pair(&PING)
            .expect_offsets(PING.key, OffsetCheck::native(vec![("received_at", 8)]));
        assert_eq!(
            builder.build().unwrap_err(),
            BridgeError::UnknownField {
                key: PING.key,
                field: "received_at".into(),
            }
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut builder = RegistryBuilder::default();
        builder
            .register_pair(&PING)
            .register_callback(&PING, Direction::NativeToForeign);
        assert_eq!(
            builder.build().unwrap_err(),
            BridgeError::DuplicateRegistration(PING.key)
        );
    }

    #[test]
    fn test_empty_descriptor_rejected() {
        let mut builder = RegistryBuilder::default();
        builder.register_pair(&EMPTY);
        assert_eq!(
            builder.build().unwrap_err(),
            BridgeError::EmptyLayout(EMPTY.key)
        );
    }

    #[test]
    fn test_invalid_rules_rejected() {
        let mut builder = RegistryBuilder::new(LayoutRules {
            foreign: PackingRule::Packed(12),
            native: PackingRule::Host,
        });
        builder.register_pair(&HANDLE);
        assert_eq!(
            builder.build().unwrap_err(),
            BridgeError::InvalidPacking(12)
        );
    }

    #[test]
    fn test_empty_builder() {
        let builder = RegistryBuilder::default();
        assert!(builder.is_empty());
        assert_eq!(builder.rules(), &LayoutRules::default());
        let reg = builder.build().unwrap();
        assert!(reg.is_empty());
    }
}
