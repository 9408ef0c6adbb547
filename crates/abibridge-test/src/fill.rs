//! Random buffers shaped by a layout

use abibridge_layout::StructLayout;
use rand::Rng;

/// Write random bytes into every leaf field of `layout`
///
/// Padding and bytes past `layout.size` are left as they are.
/// Panics if `buf` is shorter than the layout.
pub fn fill_random<R: Rng + ?Sized>(layout: &StructLayout, buf: &mut [u8], rng: &mut R) {
    assert!(
        buf.len() >= layout.size,
        "buffer of {} bytes for {} byte layout",
        buf.len(),
        layout.size
    );
    for (_, _, range) in layout.leaves() {
        rng.fill(&mut buf[range]);
    }
}

/// New buffer of `layout.size` bytes: padding set to `pad`, fields random
pub fn random_buffer<R: Rng + ?Sized>(layout: &StructLayout, pad: u8, rng: &mut R) -> Vec<u8> {
    let mut buf = vec![pad; layout.size];
    fill_random(layout, &mut buf, rng);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::padding_ranges;
    use abibridge_layout::{PackingRule, StructLayout};
    use abibridge_sdk::GAMESERVERITEM_102;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layout() -> StructLayout {
        StructLayout::compute(&GAMESERVERITEM_102, PackingRule::Packed(8)).unwrap()
    }

    #[test]
    fn test_padding_untouched() {
        let layout = layout();
        let mut rng = StdRng::seed_from_u64(7);
        let buf = random_buffer(&layout, 0xa5, &mut rng);
        assert_eq!(buf.len(), 364);
        for range in padding_ranges(&layout) {
            assert!(buf[range].iter().all(|&b| b == 0xa5));
        }
    }

    #[test]
    fn test_seeded_fill_is_deterministic() {
        let layout = layout();
        let a = random_buffer(&layout, 0, &mut StdRng::seed_from_u64(42));
        let b = random_buffer(&layout, 0, &mut StdRng::seed_from_u64(42));
        let c = random_buffer(&layout, 0, &mut StdRng::seed_from_u64(43));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    #[should_panic]
    fn test_short_buffer_panics() {
        let layout = layout();
        let mut buf = vec![0u8; 100];
        fill_random(&layout, &mut buf, &mut StdRng::seed_from_u64(1));
    }
}
