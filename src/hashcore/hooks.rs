//! Hooks of the HashSet.

use std::collections::hash_map;
use std::hash;

/// HashHooks
///
/// The hashing algorithm is the one hook of the HashSet.
///
/// The hash of an element must be deterministic for as long as the element is
/// part of the set, and equal elements must hash identically. Violating
/// either property leads to unspecified, though memory-safe, set contents.
///
/// Also see DefaultHashHooks for the default.
pub trait HashHooks: hash::BuildHasher {}

/// DefaultHashHooks
///
/// Default hooks for the HashSet:
/// -   deferring hashing to the standard library `RandomState`.
#[derive(Clone, Debug, Default)]
pub struct DefaultHashHooks(hash_map::RandomState);

impl hash::BuildHasher for DefaultHashHooks {
    type Hasher = hash_map::DefaultHasher;

    fn build_hasher(&self) -> Self::Hasher {
        self.0.build_hasher()
    }
}

impl HashHooks for DefaultHashHooks {}
