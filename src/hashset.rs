//! #   The HashSet.
//!
//! The `HashSet` is a concurrent equivalent of the standard `HashSet`: it may
//! be shared across any number of threads, all of which may insert, remove,
//! and look up elements.
//!
//! ##  Under the covers.
//!
//! Under the covers the `HashSet` is a table of buckets, each bucket a
//! dynamically sized array of the elements whose hash maps to it, protected by
//! a single mutex.
//!
//! The main consequences are:
//!
//! -   All operations on a given instance are serialized; no two threads ever
//!     access the table at the same time.
//! -   The number of elements is kept in an atomic counter beside the table,
//!     and may be read without taking the lock.
//! -   The table doubles its number of buckets whenever the average number of
//!     elements per bucket exceeds the threshold, and never shrinks.
//!
//! #   Example: basic
//!
//! General usage of `HashSet` involve inserting elements with `insert`,
//! removing them with `remove`, and checking them with `contains`.
//!
//! The faillible equivalents exist too: `try_insert`, `try_extend`, and
//! `try_clear` will return a `Result` indicating whether the operation
//! succeeded, and the cause of its failure if it did not.
//!
//! ```
//! use coarse::hashset::HashSet;
//!
//! let set: HashSet<_> = HashSet::new(4);
//!
//! assert!(set.insert(1));
//! assert!(set.insert(2));
//! assert!(!set.insert(2));
//!
//! assert_eq!(2, set.len());
//! assert!(set.contains(&1));
//!
//! assert!(set.remove(&1));
//! assert!(!set.remove(&1));
//!
//! assert_eq!(1, set.len());
//! ```
//!
//! #   Example: managing capacity
//!
//! The `HashSet` is created with a given number of buckets, and an optional
//! threshold: the average number of elements per bucket beyond which the
//! number of buckets doubles.
//!
//! ```
//! use coarse::hashset::HashSet;
//!
//! let set: HashSet<_> = HashSet::with_threshold(2, 4);
//!
//! //  The average is computed with integer division: 9 / 2 = 4.
//! set.extend(1..=9);
//! assert_eq!(2, set.number_buckets());
//!
//! //  10 / 2 = 5, exceeding the threshold.
//! set.insert(10);
//! assert_eq!(4, set.number_buckets());
//!
//! //  Removing elements never shrinks the table.
//! set.clear();
//! assert_eq!(4, set.number_buckets());
//! ```
//!
//! #   Example: sharing is caring
//!
//! The core property of `HashSet` is its ability to be written to from any
//! number of threads, all sharing a reference.
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use coarse::hashset::HashSet;
//!
//! let set: Arc<HashSet<u32>> = Arc::new(HashSet::new(16));
//!
//! let handles: Vec<_> = (0..4u32)
//!     .map(|t| {
//!         let set = set.clone();
//!         thread::spawn(move || {
//!             for i in 0..100 {
//!                 set.insert(t * 100 + i);
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(400, set.len());
//! ```

mod hashset;

pub use super::hashcore::{DefaultHashHooks, HashHooks};
pub use super::hashcore::capacity::DEFAULT_THRESHOLD;
pub use self::hashset::{HashSet, DEFAULT_CAPACITY};

use super::atomic;
use super::failure;
use super::hashcore;
use super::set;
