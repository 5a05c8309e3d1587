//! The capability shared by concurrent sets.
//!
//! A concurrent set may be shared by reference across threads, and all of its
//! operations take `&self`. How the set synchronizes its threads is up to each
//! implementation: the `HashSet` of this crate serializes every operation with
//! a single lock, whereas a fine-grained or lock-free set would implement the
//! same trait independently.

/// ConcurrentSet
///
/// The operations common to all concurrent sets.
///
/// Each operation is atomic with respect to all others on the same instance.
///
/// #   Example
///
/// ```
/// use coarse::hashset::HashSet;
/// use coarse::set::ConcurrentSet;
///
/// fn register<S: ConcurrentSet<u32>>(set: &S, id: u32) -> bool {
///     set.add(id)
/// }
///
/// let set: HashSet<u32> = HashSet::new(4);
///
/// assert!(register(&set, 1));
/// assert!(!register(&set, 1));
/// assert_eq!(1, set.size());
/// ```
pub trait ConcurrentSet<T> {
    /// Adds `value` to the set.
    ///
    /// Returns `false`, leaving the set unchanged, if an equal value was
    /// already present.
    fn add(&self, value: T) -> bool;

    /// Removes `value` from the set.
    ///
    /// Returns `false`, leaving the set unchanged, if no equal value was
    /// present.
    fn remove(&self, value: &T) -> bool;

    /// Returns `true` if the set contains `value`.
    fn contains(&self, value: &T) -> bool;

    /// Returns the number of elements in the set.
    ///
    /// The value reflects all operations completed before the call, and
    /// possibly some of those concurrently in progress.
    fn size(&self) -> usize;
}
