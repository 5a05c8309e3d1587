//! The Failure and Result types of this library.
//!
//! The `HashSet` supports faillible construction and growth. Any method which
//! attempts to allocate memory may fail; the cause of the error is then
//! represented as a `Failure`.
//!
//! All faillible methods come in two versions:
//!
//! -   A faillible `try_xxx` version, which returns a `Result` with `Failure` as the error type.
//! -   A convenience `xxx` version, which invokes the `try_xxx` version and panics in case of error.

use std::{error, fmt, result};

/// Universal Failure type of this library.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Failure {
    /// A table requires at least one bucket.
    ZeroCapacity,
    /// The number of buckets cannot be doubled without overflowing.
    BucketsOverflow,
    /// The number of bytes to allocate cannot be calculated due to overflowing.
    BytesOverflow,
    /// The allocator could not allocate memory.
    OutOfMemory,
}

impl error::Error for Failure {}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Universal Result type of this library.
pub type Result<T> = result::Result<T, Failure>;
