//! Callback transcribers
//!
//! Asynchronous notification payloads only ever travel one way, so their
//! converter exposes a single `transcribe` bound to that direction. The
//! reverse direction has no entry point at all.

use abibridge_core::{BridgeResult, Direction, Side, StructVersionKey};

use crate::{ConverterPair, LayoutDescriptor, LayoutRules, StructLayout, Transcribe};

/// One-directional converter for a callback payload
#[derive(Clone, Debug)]
pub struct CallbackTranscriber {
    inner: ConverterPair,
    direction: Direction,
}

impl CallbackTranscriber {
    pub fn new(
        descriptor: &'static LayoutDescriptor,
        direction: Direction,
        rules: &LayoutRules,
    ) -> BridgeResult<Self> {
        Ok(CallbackTranscriber {
            inner: ConverterPair::new(descriptor, rules)?,
            direction,
        })
    }

    #[inline]
    pub fn key(&self) -> StructVersionKey {
        self.inner.key()
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn descriptor(&self) -> &'static LayoutDescriptor {
        self.inner.descriptor()
    }

    pub fn layout(&self, side: Side) -> &StructLayout {
        self.inner.layout(side)
    }

    #[inline]
    pub fn source_size(&self) -> usize {
        self.inner.size(self.direction.source())
    }

    #[inline]
    pub fn destination_size(&self) -> usize {
        self.inner.size(self.direction.destination())
    }

    pub fn transcribe(&self, src: &[u8], dst: &mut [u8]) -> BridgeResult<()> {
        self.inner.convert(self.direction, src, dst)
    }

    /// # Safety
    /// `src` must be readable for `source_size()` bytes, `dst` writable for
    /// `destination_size()` bytes, and the two must not overlap.
    pub unsafe fn transcribe_raw(&self, src: *const u8, dst: *mut u8) {
        self.inner.convert_raw(self.direction, src, dst)
    }
}

impl Transcribe for CallbackTranscriber {
    fn key(&self) -> StructVersionKey {
        CallbackTranscriber::key(self)
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn source_size(&self) -> usize {
        CallbackTranscriber::source_size(self)
    }

    fn destination_size(&self) -> usize {
        CallbackTranscriber::destination_size(self)
    }

    fn transcribe(&self, src: &[u8], dst: &mut [u8]) -> BridgeResult<()> {
        CallbackTranscriber::transcribe(self, src, dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldSpec, ScalarWidth};
    use abibridge_core::BridgeError;

    static STATS: LayoutDescriptor = LayoutDescriptor {
        key: StructVersionKey::new("stats_t", 12),
        fields: &[
            FieldSpec::u64("game_id"),
            FieldSpec::enumeration("result", ScalarWidth::W4),
        ],
    };

    #[test]
    fn test_callback_native_to_foreign() {
        #[repr(C)]
        #[allow(dead_code)]
        struct Stats {
            game_id: u64,
            result: i32,
        }

        let rules = LayoutRules::default();
        let cb = CallbackTranscriber::new(&STATS, Direction::NativeToForeign, &rules).unwrap();
        assert_eq!(cb.direction(), Direction::NativeToForeign);
        assert_eq!(cb.key(), STATS.key);
        assert_eq!(cb.destination_size(), 16);
        assert_eq!(cb.source_size(), std::mem::size_of::<Stats>());
        assert_eq!(
            cb.layout(Side::Native).slot("result").unwrap().offset,
            std::mem::offset_of!(Stats, result)
        );

        let mut native = vec![0u8; cb.source_size()];
        native[..8].copy_from_slice(&0x0110_0000_0000_0440u64.to_ne_bytes());
        // out-of-range enum value passes through
        native[8..12].copy_from_slice(&(-77i32).to_ne_bytes());

        let mut foreign = vec![0u8; cb.destination_size()];
        cb.transcribe(&native, &mut foreign).unwrap();
        assert_eq!(&foreign[..8], &native[..8]);
        assert_eq!(&foreign[8..12], &(-77i32).to_ne_bytes());
    }

    #[test]
    fn test_callback_checks_lengths() {
        let rules = LayoutRules::default();
        let cb = CallbackTranscriber::new(&STATS, Direction::NativeToForeign, &rules).unwrap();
        let native = vec![0u8; cb.source_size()];
        let mut foreign = vec![0u8; 8];
        assert_eq!(
            cb.transcribe(&native, &mut foreign),
            Err(BridgeError::BufferTooShort {
                expected: 16,
                actual: 8
            })
        );
    }

    #[test]
    fn test_callback_as_trait_object() {
        let rules = LayoutRules::default();
        let cb = CallbackTranscriber::new(&STATS, Direction::NativeToForeign, &rules).unwrap();
        let t: &dyn Transcribe = &cb;
        assert_eq!(t.source_size(), cb.source_size());
        assert_eq!(t.direction(), Direction::NativeToForeign);
    }
}
