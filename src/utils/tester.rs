//! Internal testing utilities

use std::cell::Cell;
use std::hash::{self, BuildHasher, Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::hashcore::HashHooks;

thread_local! {
    static ALLOWED: Cell<Option<usize>> = Cell::new(None);
}

//  Allocation Limit
//
//  Limits the number of tables allocated on the current thread, until dropped:
//  -   Allows injecting allocation failures.
//  -   Unlimited when no instance exists.
pub struct AllocationLimit(());

impl AllocationLimit {
    pub fn new(allowed: usize) -> Self {
        ALLOWED.with(|a| a.set(Some(allowed)));
        AllocationLimit(())
    }

    //  Returns whether an allocation may proceed, consuming one if limited.
    pub fn allocate() -> bool {
        ALLOWED.with(|a| match a.get() {
            None => true,
            Some(0) => false,
            Some(n) => {
                a.set(Some(n - 1));
                true
            },
        })
    }
}

impl Drop for AllocationLimit {
    fn drop(&mut self) { ALLOWED.with(|a| a.set(None)) }
}

//  Identity Hooks
//
//  Hooks for which the hash of an integer is the integer itself, so that tests
//  may predict which bucket an element lands in.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityHooks;

impl BuildHasher for IdentityHooks {
    type Hasher = IdentityHasher;

    fn build_hasher(&self) -> IdentityHasher { IdentityHasher(0) }
}

impl HashHooks for IdentityHooks {}

//  The Hasher of IdentityHooks.
pub struct IdentityHasher(u64);

impl Hasher for IdentityHasher {
    fn finish(&self) -> u64 { self.0 }

    fn write(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.0 = (self.0 << 8) | (*b as u64);
        }
    }

    fn write_u8(&mut self, i: u8) { self.0 = i as u64; }

    fn write_u16(&mut self, i: u16) { self.0 = i as u64; }

    fn write_u32(&mut self, i: u32) { self.0 = i as u64; }

    fn write_u64(&mut self, i: u64) { self.0 = i; }

    fn write_usize(&mut self, i: usize) { self.0 = i as u64; }
}

//  SpyCount
//
//  A counter of the number of instances of elements.
pub struct SpyCount(AtomicUsize);

impl SpyCount {
    pub fn zero() -> Self { SpyCount(AtomicUsize::new(0)) }

    pub fn get(&self) -> usize { self.0.load(Ordering::Relaxed) }

    fn decrement(&self) { self.0.fetch_sub(1, Ordering::Relaxed); }

    fn increment(&self) { self.0.fetch_add(1, Ordering::Relaxed); }
}

//  Spy Element
//
//  An element tracking the number of instances, helpful to ensure proper drop.
//
//  Hashing and equality only consider the `id`.
pub struct SpyElement<'a> {
    id: u32,
    count: &'a SpyCount,
}

impl<'a> SpyElement<'a> {
    pub fn new(id: u32, count: &'a SpyCount) -> Self {
        count.increment();
        SpyElement { id, count }
    }
}

impl<'a> Drop for SpyElement<'a> {
    fn drop(&mut self) {
        self.count.decrement();
    }
}

impl<'a> Eq for SpyElement<'a> {}

impl<'a> PartialEq for SpyElement<'a> {
    fn eq(&self, other: &Self) -> bool { self.id == other.id }
}

impl<'a> Hash for SpyElement<'a> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) { self.id.hash(state) }
}

//  A value which may panic when hashed.
#[derive(Debug, Eq, PartialEq)]
pub struct PanickyHash(pub u32, bool);

impl PanickyHash {
    //  Creates a normal instance.
    pub fn new(value: u32) -> Self { Self(value, false) }

    //  Creates a panicky instance.
    pub fn panicky(value: u32) -> Self { Self(value, true) }
}

impl Hash for PanickyHash {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        if self.1 { panic!("Oh No!") }

        self.0.hash(state)
    }
}

//  A value which may panic when compared.
//
//  Comparing two values panics if either is panicky.
#[derive(Debug, Eq)]
pub struct PanickyEq(pub u32, bool);

impl PanickyEq {
    //  Creates a normal instance.
    pub fn new(value: u32) -> Self { Self(value, false) }

    //  Creates a panicky instance.
    pub fn panicky(value: u32) -> Self { Self(value, true) }
}

impl PartialEq for PanickyEq {
    fn eq(&self, other: &Self) -> bool {
        if self.1 || other.1 { panic!("Oh No!") }

        self.0 == other.0
    }
}

impl Hash for PanickyEq {
    fn hash<H: hash::Hasher>(&self, state: &mut H) { self.0.hash(state) }
}
