//! Internal hashed element.

use std::{borrow, fmt};

use self::borrow::Borrow;

//  The element stored internally, alongside its hash.
//
//  Caching the hash allows rehashing without calling back into user code.
pub struct Element<T> {
    hash: u64,
    value: T,
}

impl<T> Element<T> {
    //  Creates a new instance.
    pub fn new(hash: u64, value: T) -> Self { Self { hash, value } }

    //  Returns the hash of the element.
    pub fn hash(&self) -> u64 { self.hash }

    //  Returns a reference to the value.
    pub fn get(&self) -> &T { &self.value }

    //  Returns the value.
    pub fn into_inner(self) -> T { self.value }

    //  Checks whether the element matches `key`, whose hash is `hash`.
    pub fn matches<Q>(&self, hash: u64, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.hash == hash && self.value.borrow() == key
    }
}

impl<T: fmt::Debug> fmt::Debug for Element<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.value)
    }
}
