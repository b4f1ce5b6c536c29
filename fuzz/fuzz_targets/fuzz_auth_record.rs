//! Fuzz target: stored authorization record
//!
//! Plants arbitrary bytes in the `auth/last_tag` slot, then opens the
//! marker store and writes a new record.  Corrupt records must read as
//! absent and the next write must always be readable.
//!
//! cargo fuzz run fuzz_auth_record

#![no_main]

use comfortctl::adapters::auth_store::{AUTH_NAMESPACE, AuthMarkerStore, LAST_TAG_KEY};
use comfortctl::adapters::memory_store::MemoryStore;
use comfortctl::app::ports::{AuthMarkerPort, StoragePort};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut backend = MemoryStore::new();
    if backend.write(AUTH_NAMESPACE, LAST_TAG_KEY, data).is_err() {
        return;
    }

    let mut store = AuthMarkerStore::new(backend);
    let before = store.last_record().map_or(0, |r| r.sequence);
    store.mark_authorized([0x9A, 0xD5, 0xB3, 0x05]);

    let record = store.last_record().expect("fresh record must decode");
    assert_eq!(record.sequence, before.wrapping_add(1));
});
