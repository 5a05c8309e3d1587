//  Lints
#![allow(clippy::module_inception)]

//! #   The Coarse Library
//!
//! A concurrent hash set guarded by a single lock.
//!
//! -   The `HashSet`: a `HashSet` which may be shared across threads, and
//!     inserted into, removed from, and queried from any of them.
//! -   The `ConcurrentSet`: the capability shared by concurrent sets.
//!
//! Every operation on a given `HashSet` is serialized by one mutex, in exchange
//! for a minimal critical section which is easy to audit. Only the number of
//! elements may be read without taking the lock.

pub mod failure;
pub mod hashset;
pub mod set;

mod hashcore;
mod utils;

use self::utils::atomic;
