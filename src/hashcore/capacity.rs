//! The HashSet capacity.
//!
//! A handful of newtypes, to avoid mixing up the number of buckets, the index
//! of a bucket, and the number of elements, along with the load policy.

use super::failure::{Failure, Result};

/// The default `Threshold`: the average number of elements per bucket which
/// may be reached before the table grows.
pub const DEFAULT_THRESHOLD: usize = 4;

/// The index of a Bucket.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BucketIndex(pub usize);

/// The number of Buckets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NumberBuckets(pub usize);

impl NumberBuckets {
    //  Creates an instance.
    //
    //  #   Errors
    //
    //  Returns an error if `number` is 0, as no element could be stored.
    pub fn new(number: usize) -> Result<Self> {
        if number == 0 {
            Err(Failure::ZeroCapacity)
        } else {
            Ok(Self(number))
        }
    }

    //  Returns the index of the bucket `hash` belongs to.
    pub fn bucket_of(self, hash: u64) -> BucketIndex {
        debug_assert!(self.0 > 0);

        //  `usize` is at most 64 bits on all supported platforms, hence the
        //  result of the modulo always fits.
        BucketIndex((hash % self.0 as u64) as usize)
    }

    //  Returns twice the number of buckets.
    pub fn doubled(self) -> Result<Self> {
        self.0.checked_mul(2).map(Self).ok_or(Failure::BucketsOverflow)
    }
}

/// The number of elements in all Buckets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Size(pub usize);

/// The load policy.
///
/// The table grows when the average number of elements per bucket, computed
/// with integer division, strictly exceeds the threshold.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Threshold(pub usize);

impl Threshold {
    //  Returns whether a table of `buckets` holding `size` elements should grow.
    pub fn is_exceeded(self, size: Size, buckets: NumberBuckets) -> bool {
        debug_assert!(buckets.0 > 0);

        //  Truncating: 9 elements in 2 buckets is a load of 4.
        size.0 / buckets.0 > self.0
    }
}

#[cfg(test)]
mod tests {

use super::*;

#[test]
fn number_buckets_new() {
    assert_eq!(Err(Failure::ZeroCapacity), NumberBuckets::new(0));
    assert_eq!(Ok(NumberBuckets(1)), NumberBuckets::new(1));
    assert_eq!(Ok(NumberBuckets(7)), NumberBuckets::new(7));
}

#[test]
fn number_buckets_bucket_of() {
    fn bucket_of(number: usize, hash: u64) -> usize {
        NumberBuckets(number).bucket_of(hash).0
    }

    assert_eq!(0, bucket_of(1, 0));
    assert_eq!(0, bucket_of(1, u64::MAX));

    assert_eq!(0, bucket_of(3, 0));
    assert_eq!(1, bucket_of(3, 1));
    assert_eq!(2, bucket_of(3, 5));
    assert_eq!(0, bucket_of(3, u64::MAX));

    assert_eq!(1, bucket_of(usize::MAX, 1));
}

#[test]
fn number_buckets_doubled() {
    assert_eq!(Ok(NumberBuckets(2)), NumberBuckets(1).doubled());
    assert_eq!(Ok(NumberBuckets(6)), NumberBuckets(3).doubled());
    assert_eq!(Err(Failure::BucketsOverflow), NumberBuckets(usize::MAX / 2 + 1).doubled());
}

#[test]
fn threshold_is_exceeded() {
    fn is_exceeded(threshold: usize, size: usize, buckets: usize) -> bool {
        Threshold(threshold).is_exceeded(Size(size), NumberBuckets(buckets))
    }

    assert!(!is_exceeded(4, 0, 1));
    assert!(!is_exceeded(4, 4, 1));
    assert!(is_exceeded(4, 5, 1));

    //  Truncation.
    assert!(!is_exceeded(4, 8, 2));
    assert!(!is_exceeded(4, 9, 2));
    assert!(is_exceeded(4, 10, 2));

    assert!(!is_exceeded(0, 0, 3));
    assert!(!is_exceeded(0, 2, 3));
    assert!(is_exceeded(0, 3, 3));
}

}
