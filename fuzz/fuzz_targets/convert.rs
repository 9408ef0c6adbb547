#![no_main]

use std::sync::OnceLock;

use abibridge_core::Direction;
use abibridge_registry::{Entry, Registry};
use abibridge_test::{check_roundtrip, check_transcription, CheckFailure};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    entry: u8,
    direction: bool,
    padding_byte: u8,
    bytes: Vec<u8>,
}

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| abibridge_sdk::default_registry().expect("sdk registry"))
}

fuzz_target!(|input: Input| {
    let registry = registry();
    let keys = registry.keys();
    let key = keys[input.entry as usize % keys.len()];
    let Some(entry) = registry.get(key) else {
        return;
    };
    let direction = if input.direction {
        Direction::NativeToForeign
    } else {
        Direction::ForeignToNative
    };

    // Any byte pattern converts; only a short source may fail
    let result = match entry {
        Entry::Pair(pair) => check_roundtrip(pair, direction, &input.bytes, input.padding_byte),
        Entry::Callback(cb) => match entry.transcriber(cb.direction()) {
            Ok(t) => check_transcription(
                &t,
                entry.layout(cb.direction().source()),
                entry.layout(cb.direction().destination()),
                &input.bytes,
                input.padding_byte,
            )
            .map(drop),
            Err(_) => return,
        },
    };
    match result {
        Ok(()) | Err(CheckFailure::Conversion(_)) => {}
        Err(failure) => panic!("{}: {}", key, failure),
    }
});
