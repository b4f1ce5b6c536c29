//! Persistent authorization marker.
//!
//! Implements [`AuthMarkerPort`] on top of any [`StoragePort`].  Each
//! accepted tag overwrites one small postcard-encoded [`AuthRecord`] in
//! the `auth` namespace.  The sequence number survives restarts because it
//! is seeded from the stored record.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{AuthMarkerPort, StorageError, StoragePort};
use crate::auth::TagUid;

pub const AUTH_NAMESPACE: &str = "auth";
pub const LAST_TAG_KEY: &str = "last_tag";

/// Upper bound on the encoded record (varint sequence + 4 uid bytes).
const RECORD_BUF: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRecord {
    pub uid: TagUid,
    /// Monotonic count of accepted tags.
    pub sequence: u32,
}

pub struct AuthMarkerStore<S> {
    storage: S,
    sequence: u32,
}

impl<S: StoragePort> AuthMarkerStore<S> {
    pub fn new(storage: S) -> Self {
        let sequence = read_record(&storage).map_or(0, |r| r.sequence);
        Self { storage, sequence }
    }

    /// The stored record, if any.
    pub fn last_record(&self) -> Option<AuthRecord> {
        read_record(&self.storage)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn write_record(&mut self, record: &AuthRecord) -> Result<(), StorageError> {
        let bytes = postcard::to_allocvec(record).map_err(|_| StorageError::Encode)?;
        self.storage.write(AUTH_NAMESPACE, LAST_TAG_KEY, &bytes)
    }
}

fn read_record(storage: &impl StoragePort) -> Option<AuthRecord> {
    let mut buf = [0u8; RECORD_BUF];
    let len = storage.read(AUTH_NAMESPACE, LAST_TAG_KEY, &mut buf).ok()?;
    match postcard::from_bytes(&buf[..len]) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("auth record unreadable: {}", e);
            None
        }
    }
}

impl<S: StoragePort> AuthMarkerPort for AuthMarkerStore<S> {
    fn mark_authorized(&mut self, uid: TagUid) {
        self.sequence = self.sequence.wrapping_add(1);
        let record = AuthRecord {
            uid,
            sequence: self.sequence,
        };
        match self.write_record(&record) {
            Ok(()) => info!("auth marker #{} written", record.sequence),
            Err(e) => warn!("auth marker write failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_store::MemoryStore;

    const UID: TagUid = [0x9A, 0xD5, 0xB3, 0x05];

    #[test]
    fn mark_writes_record() {
        let mut store = AuthMarkerStore::new(MemoryStore::new());
        store.mark_authorized(UID);
        assert_eq!(
            store.last_record(),
            Some(AuthRecord {
                uid: UID,
                sequence: 1
            })
        );
    }

    #[test]
    fn sequence_resumes_from_storage() {
        let mut store = AuthMarkerStore::new(MemoryStore::new());
        store.mark_authorized(UID);
        store.mark_authorized(UID);

        let AuthMarkerStore { storage, .. } = store;
        let mut reopened = AuthMarkerStore::new(storage);
        reopened.mark_authorized(UID);
        assert_eq!(reopened.last_record().map(|r| r.sequence), Some(3));
    }

    #[test]
    fn write_failure_is_swallowed() {
        let mut backend = MemoryStore::new();
        backend.set_read_only(true);
        let mut store = AuthMarkerStore::new(backend);
        store.mark_authorized(UID);
        assert_eq!(store.last_record(), None);
        assert!(!store.storage().exists(AUTH_NAMESPACE, LAST_TAG_KEY));
    }

    #[test]
    fn full_storage_keeps_previous_record() {
        let mut backend = MemoryStore::with_capacity(1);
        backend.write("other", "key", &[0]).unwrap();
        let mut store = AuthMarkerStore::new(backend);
        store.mark_authorized(UID);
        assert_eq!(store.last_record(), None);
    }

    #[test]
    fn corrupt_record_reads_as_none() {
        let mut backend = MemoryStore::new();
        backend.write(AUTH_NAMESPACE, LAST_TAG_KEY, &[0xFF]).unwrap();
        let store = AuthMarkerStore::new(backend);
        assert_eq!(store.last_record(), None);
    }
}
