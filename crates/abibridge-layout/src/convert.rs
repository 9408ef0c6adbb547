//! Converter pairs
//!
//! A converter pair is built once per struct version from its descriptor.
//! Construction lays the descriptor out under both packing rules and
//! records a plan: one `FieldCopy` per leaf field, and for nested fields
//! the nested descriptor's own `ConverterPair`. Running the plan walks
//! the fields in declared order and writes each destination field once.

use abibridge_core::{BridgeError, BridgeResult, Direction, Side, StructVersionKey};

use crate::{FieldCopy, FieldKind, LayoutDescriptor, LayoutRules, StructLayout};

/// A transcription bound to one key and one direction
pub trait Transcribe: Send + Sync {
    fn key(&self) -> StructVersionKey;

    fn direction(&self) -> Direction;

    fn source_size(&self) -> usize;

    fn destination_size(&self) -> usize;

    /// Fill `dst` from `src`
    fn transcribe(&self, src: &[u8], dst: &mut [u8]) -> BridgeResult<()>;
}

#[derive(Clone, Debug)]
enum Step {
    Copy(FieldCopy),
    Nested {
        foreign: usize,
        native: usize,
        pair: Box<ConverterPair>,
    },
}

/// Bidirectional converter for one struct version
#[derive(Clone, Debug)]
pub struct ConverterPair {
    descriptor: &'static LayoutDescriptor,
    foreign: StructLayout,
    native: StructLayout,
    steps: Vec<Step>,
}

impl ConverterPair {
    pub fn new(descriptor: &'static LayoutDescriptor, rules: &LayoutRules) -> BridgeResult<Self> {
        let foreign = StructLayout::compute(descriptor, rules.foreign)?;
        let native = StructLayout::compute(descriptor, rules.native)?;

        let mut steps = Vec::with_capacity(descriptor.len());
        for ((field, f), n) in descriptor
            .fields
            .iter()
            .zip(&foreign.slots)
            .zip(&native.slots)
        {
            debug_assert_eq!(f.size, n.size, "{} width differs", field.name);
            let step = match field.kind {
                FieldKind::Nested(inner) => Step::Nested {
                    foreign: f.offset,
                    native: n.offset,
                    pair: Box::new(ConverterPair::new(inner, rules)?),
                },
                _ => Step::Copy(FieldCopy {
                    name: field.name,
                    foreign: f.offset,
                    native: n.offset,
                    len: f.size,
                }),
            };
            steps.push(step);
        }

        Ok(ConverterPair {
            descriptor,
            foreign,
            native,
            steps,
        })
    }

    #[inline]
    pub fn key(&self) -> StructVersionKey {
        self.descriptor.key
    }

    #[inline]
    pub fn descriptor(&self) -> &'static LayoutDescriptor {
        self.descriptor
    }

    pub fn layout(&self, side: Side) -> &StructLayout {
        match side {
            Side::Foreign => &self.foreign,
            Side::Native => &self.native,
        }
    }

    #[inline]
    pub fn size(&self, side: Side) -> usize {
        self.layout(side).size
    }

    #[inline]
    pub fn foreign_size(&self) -> usize {
        self.foreign.size
    }

    #[inline]
    pub fn native_size(&self) -> usize {
        self.native.size
    }

    /// Converter of a nested field, if `name` is one
    pub fn nested(&self, name: &str) -> Option<&ConverterPair> {
        self.descriptor
            .fields
            .iter()
            .zip(&self.steps)
            .find_map(|(field, step)| match step {
                Step::Nested { pair, .. } if field.name == name => Some(pair.as_ref()),
                _ => None,
            })
    }

    pub fn foreign_to_native(&self, src: &[u8], dst: &mut [u8]) -> BridgeResult<()> {
        self.convert(Direction::ForeignToNative, src, dst)
    }

    pub fn native_to_foreign(&self, src: &[u8], dst: &mut [u8]) -> BridgeResult<()> {
        self.convert(Direction::NativeToForeign, src, dst)
    }

    /// Convert in either direction
    /// Nothing is written unless both buffers are large enough
    pub fn convert(&self, direction: Direction, src: &[u8], dst: &mut [u8]) -> BridgeResult<()> {
        check_len(self.size(direction.source()), src.len())?;
        check_len(self.size(direction.destination()), dst.len())?;
        self.run(direction, src, dst);
        Ok(())
    }

    /// Convert between raw buffers sized by the caller
    ///
    /// # Safety
    /// `src` must be valid for reads of the source layout size and `dst`
    /// valid for writes of the destination layout size; the regions must
    /// not overlap.
    pub unsafe fn convert_raw(&self, direction: Direction, src: *const u8, dst: *mut u8) {
        let src = std::slice::from_raw_parts(src, self.size(direction.source()));
        let dst = std::slice::from_raw_parts_mut(dst, self.size(direction.destination()));
        self.run(direction, src, dst);
    }

    /// View of this pair fixed to one direction
    pub fn direction(&self, direction: Direction) -> PairDirection<'_> {
        PairDirection {
            pair: self,
            direction,
        }
    }

    fn run(&self, direction: Direction, src: &[u8], dst: &mut [u8]) {
        for step in &self.steps {
            match step {
                Step::Copy(copy) => copy.apply(direction, src, dst),
                Step::Nested {
                    foreign,
                    native,
                    pair,
                } => {
                    let (from, to) = match direction {
                        Direction::ForeignToNative => (*foreign, *native),
                        Direction::NativeToForeign => (*native, *foreign),
                    };
                    let from_len = pair.size(direction.source());
                    let to_len = pair.size(direction.destination());
                    pair.run(
                        direction,
                        &src[from..from + from_len],
                        &mut dst[to..to + to_len],
                    );
                }
            }
        }
    }
}

#[inline]
fn check_len(expected: usize, actual: usize) -> BridgeResult<()> {
    if actual < expected {
        return Err(BridgeError::BufferTooShort { expected, actual });
    }
    Ok(())
}

/// A converter pair fixed to one direction
#[derive(Clone, Copy, Debug)]
pub struct PairDirection<'a> {
    pair: &'a ConverterPair,
    direction: Direction,
}

impl<'a> PairDirection<'a> {
    pub fn pair(&self) -> &'a ConverterPair {
        self.pair
    }
}

impl Transcribe for PairDirection<'_> {
    fn key(&self) -> StructVersionKey {
        self.pair.key()
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn source_size(&self) -> usize {
        self.pair.size(self.direction.source())
    }

    fn destination_size(&self) -> usize {
        self.pair.size(self.direction.destination())
    }

    fn transcribe(&self, src: &[u8], dst: &mut [u8]) -> BridgeResult<()> {
        self.pair.convert(self.direction, src, dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldSpec, PackingRule, ScalarWidth};
    use proptest::prelude::*;

    static ADDR: LayoutDescriptor = LayoutDescriptor {
        key: StructVersionKey::new("addr_t", 1),
        fields: &[
            FieldSpec::u16("port"),
            FieldSpec::u16("query_port"),
            FieldSpec::u32("ip"),
        ],
    };

    static RECORD: LayoutDescriptor = LayoutDescriptor {
        key: StructVersionKey::new("record_t", 2),
        fields: &[
            FieldSpec::boolean("active"),
            FieldSpec::u64("id"),
            FieldSpec::nested("addr", &ADDR),
            FieldSpec::bytes("label", 13),
            FieldSpec::handle("owner", ScalarWidth::W8),
            FieldSpec::i32("count"),
            FieldSpec::pointer("user_data"),
        ],
    };

    /// Native side with a tight pack so offsets really differ
    fn skewed_rules() -> LayoutRules {
        LayoutRules {
            foreign: PackingRule::Packed(8),
            native: PackingRule::Packed(1),
        }
    }

    fn record_pair() -> ConverterPair {
        ConverterPair::new(&RECORD, &skewed_rules()).unwrap()
    }

    fn patterned(len: usize, seed: u8) -> Vec<u8> {
        (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect()
    }

    #[test]
    fn test_sizes() {
        let pair = record_pair();
        let ptr = crate::POINTER_SIZE;
        // active(1) id(8) addr(8) label(13) owner(8) count(4) user_data(ptr)
        assert_eq!(pair.native_size(), 42 + ptr);
        // 0 / 8 / 16 / 24..37 / 40 / 48 / 52 aligned to the pointer
        let user_data = crate::align_up(52, ptr);
        assert_eq!(pair.foreign.slot("owner").unwrap().offset, 40);
        assert_eq!(pair.foreign.slot("user_data").unwrap().offset, user_data);
        assert_eq!(pair.foreign_size(), crate::align_up(user_data + ptr, 8));
        assert_eq!(pair.size(Side::Native), pair.native_size());
    }

    #[test]
    fn test_roundtrip_restores_every_field() {
        let pair = record_pair();
        let foreign = patterned(pair.foreign_size(), 7);
        let mut native = vec![0u8; pair.native_size()];
        pair.foreign_to_native(&foreign, &mut native).unwrap();

        let mut back = vec![0u8; pair.foreign_size()];
        pair.native_to_foreign(&native, &mut back).unwrap();

        for (path, _, range) in pair.layout(Side::Foreign).leaves() {
            assert_eq!(back[range.clone()], foreign[range], "field {}", path);
        }
    }

    #[test]
    fn test_field_values_land_at_native_offsets() {
        let pair = record_pair();
        let foreign = patterned(pair.foreign_size(), 1);
        let mut native = vec![0u8; pair.native_size()];
        pair.foreign_to_native(&foreign, &mut native).unwrap();

        let f = pair.layout(Side::Foreign);
        let n = pair.layout(Side::Native);
        for path in ["active", "id", "addr.ip", "label", "owner", "count", "user_data"] {
            let fr = f.field_range(path).unwrap();
            let nr = n.field_range(path).unwrap();
            assert_eq!(native[nr], foreign[fr], "field {}", path);
        }
    }

    #[test]
    fn test_nested_matches_standalone_pair() {
        let pair = record_pair();
        let addr_pair = ConverterPair::new(&ADDR, &skewed_rules()).unwrap();
        assert_eq!(pair.nested("addr").unwrap().key(), addr_pair.key());
        assert!(pair.nested("label").is_none());

        let foreign = patterned(pair.foreign_size(), 99);
        let mut native = vec![0u8; pair.native_size()];
        pair.foreign_to_native(&foreign, &mut native).unwrap();

        let fr = pair.layout(Side::Foreign).field_range("addr").unwrap();
        let nr = pair.layout(Side::Native).field_range("addr").unwrap();
        let mut standalone = vec![0u8; addr_pair.native_size()];
        addr_pair
            .foreign_to_native(&foreign[fr], &mut standalone)
            .unwrap();
        assert_eq!(native[nr], standalone[..]);
    }

    #[test]
    fn test_short_buffers_rejected_without_writes() {
        let pair = record_pair();
        let foreign = patterned(pair.foreign_size(), 3);
        let mut native = vec![0xEEu8; pair.native_size() - 1];
        let err = pair.foreign_to_native(&foreign, &mut native).unwrap_err();
        assert_eq!(
            err,
            BridgeError::BufferTooShort {
                expected: pair.native_size(),
                actual: pair.native_size() - 1,
            }
        );
        assert!(native.iter().all(|&b| b == 0xEE));

        let mut native = vec![0u8; pair.native_size()];
        assert!(matches!(
            pair.foreign_to_native(&foreign[..10], &mut native),
            Err(BridgeError::BufferTooShort { actual: 10, .. })
        ));
    }

    #[test]
    fn test_oversized_destination_keeps_tail() {
        let pair = record_pair();
        let foreign = patterned(pair.foreign_size(), 5);
        let mut native = vec![0xCCu8; pair.native_size() + 4];
        pair.foreign_to_native(&foreign, &mut native).unwrap();
        assert_eq!(&native[pair.native_size()..], &[0xCC; 4]);
    }

    #[test]
    fn test_padding_untouched() {
        let pair = record_pair();
        let native = patterned(pair.native_size(), 11);
        let mut foreign = vec![0x5Au8; pair.foreign_size()];
        pair.native_to_foreign(&native, &mut foreign).unwrap();
        // bytes 1..8 sit between `active` and `id`
        assert_eq!(&foreign[1..8], &[0x5A; 7]);
    }

    #[test]
    fn test_raw_conversion_matches_checked() {
        let pair = record_pair();
        let foreign = patterned(pair.foreign_size(), 42);
        let mut checked = vec![0u8; pair.native_size()];
        pair.foreign_to_native(&foreign, &mut checked).unwrap();

        let mut raw = vec![0u8; pair.native_size()];
        unsafe {
            pair.convert_raw(Direction::ForeignToNative, foreign.as_ptr(), raw.as_mut_ptr());
        }
        assert_eq!(raw, checked);
    }

    #[test]
    fn test_direction_view() {
        let pair = record_pair();
        let view = pair.direction(Direction::NativeToForeign);
        assert_eq!(view.key(), RECORD.key);
        assert_eq!(view.source_size(), pair.native_size());
        assert_eq!(view.destination_size(), pair.foreign_size());

        let native = patterned(pair.native_size(), 8);
        let mut a = vec![0u8; pair.foreign_size()];
        let mut b = vec![0u8; pair.foreign_size()];
        view.transcribe(&native, &mut a).unwrap();
        pair.native_to_foreign(&native, &mut b).unwrap();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_roundtrip_identity(foreign in proptest::collection::vec(any::<u8>(), 64)) {
            let pair = record_pair();
            let mut native = vec![0u8; pair.native_size()];
            pair.foreign_to_native(&foreign, &mut native).unwrap();
            let mut back = vec![0u8; pair.foreign_size()];
            pair.native_to_foreign(&native, &mut back).unwrap();
            for (_, _, range) in pair.layout(Side::Foreign).leaves() {
                prop_assert_eq!(&back[range.clone()], &foreign[range]);
            }
        }

        #[test]
        fn prop_field_independence(
            native in proptest::collection::vec(any::<u8>(), 42 + crate::POINTER_SIZE),
            which in 0usize..9,
            flip in 1u8..=255,
        ) {
            let pair = record_pair();
            let leaves = pair.layout(Side::Native).leaves();
            let (path, _, range) = &leaves[which];

            let mut before = vec![0u8; pair.foreign_size()];
            pair.native_to_foreign(&native, &mut before).unwrap();

            let mut mutated = native.clone();
            mutated[range.start] ^= flip;
            let mut after = vec![0u8; pair.foreign_size()];
            pair.native_to_foreign(&mutated, &mut after).unwrap();

            let foreign = pair.layout(Side::Foreign);
            for (other, _, r) in foreign.leaves() {
                if &other == path {
                    prop_assert_ne!(&before[r.clone()], &after[r]);
                } else {
                    prop_assert_eq!(&before[r.clone()], &after[r]);
                }
            }
        }

        #[test]
        fn prop_handle_bits_preserved(owner in any::<u64>()) {
            let pair = record_pair();
            let mut foreign = vec![0u8; pair.foreign_size()];
            let fr = pair.layout(Side::Foreign).field_range("owner").unwrap();
            foreign[fr.clone()].copy_from_slice(&owner.to_ne_bytes());

            let mut native = vec![0u8; pair.native_size()];
            pair.foreign_to_native(&foreign, &mut native).unwrap();
            let nr = pair.layout(Side::Native).field_range("owner").unwrap();
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&native[nr]);
            prop_assert_eq!(u64::from_ne_bytes(raw), owner);
        }
    }
}
