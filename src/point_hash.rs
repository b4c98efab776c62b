// Deterministic point-to-transcript encoding used by the ZKP engine and by
// key derivation, plus the single process-wide override slot the original
// C API exposed as `ECJPAKE_Set_HashECPoint`.

use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};
use std::sync::RwLock;

use crate::group::Point;

/// Signature of a pluggable point-hash implementation: append `point`'s
/// contribution to the running transcript `hasher`.
pub type HashPointFn = fn(&mut Sha256, &Point);

static OVERRIDE: Lazy<RwLock<Option<HashPointFn>>> = Lazy::new(|| RwLock::new(None));

/// Installs a process-wide alternate point-hash implementation. Affects every
/// `Session` created after this call; sessions already mid-handshake are
/// unaffected only in the sense that they've already hashed what they've
/// hashed so far — any hashing they still have to do uses the new slot, same
/// as the one-slot-last-writer-wins C global this replaces.
pub fn set_hash_point(f: HashPointFn) {
    let mut slot = OVERRIDE.write().expect("hash_point override lock poisoned");
    *slot = Some(f);
}

/// Clears any installed override, reverting to [`default_hash_point`]. Mainly
/// useful for tests that install an override and need to clean up after
/// themselves given the slot is process-wide.
pub fn clear_hash_point_override() {
    let mut slot = OVERRIDE.write().expect("hash_point override lock poisoned");
    *slot = None;
}

/// Appends `point`'s contribution to `hasher`, using the installed override
/// if one is present, else [`default_hash_point`].
pub fn hash_point(hasher: &mut Sha256, point: &Point) {
    let f = *OVERRIDE.read().expect("hash_point override lock poisoned");
    match f {
        Some(f) => f(hasher, point),
        None => default_hash_point(hasher, point),
    }
}

/// The interoperable default encoding: big-endian affine `x` then `y`, each
/// a fixed-width 32 bytes, each prefixed by its own big-endian 4-byte length.
/// The identity point has no affine coordinates and is hashed as two
/// all-zero 32-byte fields — legality checks are expected to keep it out of
/// any real transcript, so this is a defined fallback, not a security-load-
/// bearing path.
pub fn default_hash_point(hasher: &mut Sha256, point: &Point) {
    let (x, y) = point.affine_xy().unwrap_or(([0u8; 32], [0u8; 32]));
    hash_length_prefixed(hasher, &x);
    hash_length_prefixed(hasher, &y);
}

fn hash_length_prefixed(hasher: &mut Sha256, field: &[u8; 32]) {
    hasher.update((field.len() as u32).to_be_bytes());
    hasher.update(field);
}

/// Same length-prefix convention as [`default_hash_point`], for the
/// arbitrary-length identity labels (`local_id`/`peer_id`) mixed into ZKP
/// challenges.
pub fn hash_length_prefixed_bytes(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u32).to_be_bytes());
    hasher.update(bytes);
}
