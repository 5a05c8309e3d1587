//! The HashSet

use std::{borrow, fmt, hash};
use std::hash::BuildHasher;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::atomic::AcqRelUsize;
use super::failure::{Failure, Result};
use super::hashcore::{DefaultHashHooks, HashHooks};
use super::hashcore::capacity::{NumberBuckets, Size, Threshold, DEFAULT_THRESHOLD};
use super::hashcore::element::Element;
use super::hashcore::table::Table;
use super::set::ConcurrentSet;

/// The number of buckets of a `HashSet` created with `Default`.
pub const DEFAULT_CAPACITY: usize = 16;

//
//  Public Interface
//

/// `HashSet`
///
/// A set which may be shared across threads, all of its operations being
/// serialized by a single lock.
///
/// A `HashSet<T>` can be shared across threads whenever `T` can be sent across
/// threads.
///
/// #   Example of Sync.
///
/// With most types, it is possible to share a `HashSet` across threads.
///
/// ```
/// # use coarse::hashset::HashSet;
/// fn ensure_sync<T: Sync>(_: T) {}
///
/// let set: HashSet<_> = HashSet::new(4);
/// set.insert("Hello, World");
///
/// ensure_sync(set);
/// ```
///
/// #   Example of not Sync.
///
/// A non-Send T prevents the HashSet from being Sync.
///
/// ```compile_fail
/// # use std::rc::Rc;
/// # use coarse::hashset::HashSet;
/// fn ensure_sync<T: Sync>(_: T) {}
///
/// let set: HashSet<_> = HashSet::new(4);
/// set.insert(Rc::new(3));
///
/// ensure_sync(set);
/// ```
pub struct HashSet<T, H: HashHooks = DefaultHashHooks> {
    //  Hooks of the HashSet.
    hooks: H,
    //  Load policy.
    threshold: Threshold,
    //  The number of elements in the set:
    //
    //  -   Only stored into while holding the lock, after the table is updated.
    //  -   May be loaded at any time, without the lock.
    size: AcqRelUsize,
    table: Mutex<Table<T>>,
}

impl<T, H: HashHooks + Default> HashSet<T, H> {
    /// Creates a new instance of the `HashSet` with `capacity` buckets, and
    /// the default threshold.
    ///
    /// #   Panics
    ///
    /// Panics if `capacity` is 0, or the buckets cannot be allocated.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use coarse::hashset::HashSet;
    /// let set: HashSet<i32> = HashSet::new(8);
    ///
    /// assert_eq!(0, set.len());
    /// assert_eq!(8, set.number_buckets());
    /// assert_eq!(4, set.threshold());
    /// ```
    pub fn new(capacity: usize) -> Self { Self::with_hooks(capacity, H::default()) }

    /// Creates a new instance of the `HashSet` with `capacity` buckets, and
    /// the default threshold.
    ///
    /// #   Errors
    ///
    /// Returns an error if `capacity` is 0, or the buckets cannot be allocated.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use coarse::failure::Failure;
    /// #   use coarse::hashset::HashSet;
    /// let set = HashSet::<i32>::try_new(0);
    /// assert_eq!(Some(Failure::ZeroCapacity), set.err());
    ///
    /// let set = HashSet::<i32>::try_new(usize::MAX);
    /// assert_eq!(Some(Failure::BytesOverflow), set.err());
    ///
    /// let set = HashSet::<i32>::try_new(3);
    /// assert_eq!(3, set.unwrap().number_buckets());
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self> {
        Self::try_with_threshold_and_hooks(capacity, DEFAULT_THRESHOLD, H::default())
    }

    /// Creates a new instance of the `HashSet` with `capacity` buckets, which
    /// grows when the average number of elements per bucket exceeds
    /// `threshold`.
    ///
    /// #   Panics
    ///
    /// Panics if `capacity` is 0, or the buckets cannot be allocated.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use coarse::hashset::HashSet;
    /// let set: HashSet<i32> = HashSet::with_threshold(1, 1);
    ///
    /// set.insert(1);
    /// assert_eq!(1, set.number_buckets());
    ///
    /// //  2 / 1 = 2, exceeding the threshold.
    /// set.insert(2);
    /// assert_eq!(2, set.number_buckets());
    /// ```
    pub fn with_threshold(capacity: usize, threshold: usize) -> Self {
        Self::with_threshold_and_hooks(capacity, threshold, H::default())
    }
}

impl<T, H: HashHooks> HashSet<T, H> {
    /// Creates a new instance of the `HashSet` with `capacity` buckets, the
    /// default threshold, and the specified hooks.
    ///
    /// #   Panics
    ///
    /// Panics if `capacity` is 0, or the buckets cannot be allocated.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use coarse::hashset::{HashSet, DefaultHashHooks};
    /// let set: HashSet<i32> = HashSet::with_hooks(2, DefaultHashHooks::default());
    ///
    /// assert_eq!(0, set.len());
    /// assert_eq!(2, set.number_buckets());
    /// ```
    pub fn with_hooks(capacity: usize, hooks: H) -> Self {
        Self::with_threshold_and_hooks(capacity, DEFAULT_THRESHOLD, hooks)
    }

    /// Creates a new instance of the `HashSet` with `capacity` buckets, the
    /// specified threshold, and the specified hooks.
    ///
    /// Calling this method is equivalent to calling
    /// `try_with_threshold_and_hooks` and panicking on error.
    ///
    /// #   Panics
    ///
    /// Panics if `capacity` is 0, or the buckets cannot be allocated.
    pub fn with_threshold_and_hooks(capacity: usize, threshold: usize, hooks: H) -> Self {
        match Self::try_with_threshold_and_hooks(capacity, threshold, hooks) {
            Ok(result) => result,
            Err(error) => panic_from_failure(error),
        }
    }

    /// Creates a new instance of the `HashSet` with `capacity` buckets, the
    /// specified threshold, and the specified hooks.
    ///
    /// #   Errors
    ///
    /// Returns an error if `capacity` is 0, or the buckets cannot be allocated.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use coarse::hashset::{HashSet, DefaultHashHooks};
    /// let hooks = DefaultHashHooks::default();
    /// let set: HashSet<i32> = HashSet::try_with_threshold_and_hooks(2, 8, hooks).unwrap();
    ///
    /// assert_eq!(2, set.number_buckets());
    /// assert_eq!(8, set.threshold());
    /// ```
    pub fn try_with_threshold_and_hooks(capacity: usize, threshold: usize, hooks: H)
        -> Result<Self>
    {
        let number = NumberBuckets::new(capacity)?;
        let table = Table::try_new(number)?;

        log::trace!("HashSet created with {} buckets, threshold {}", number.0, threshold);

        Ok(Self {
            hooks,
            threshold: Threshold(threshold),
            size: AcqRelUsize::new(0),
            table: Mutex::new(table),
        })
    }
}

impl<T, H: HashHooks> HashSet<T, H> {
    /// Returns whether the instance contains any element, or not.
    ///
    /// Does not take the lock.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use coarse::hashset::HashSet;
    /// let set: HashSet<_> = HashSet::new(4);
    /// assert!(set.is_empty());
    ///
    /// set.insert(1);
    /// assert!(!set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Returns the number of elements contained in the instance.
    ///
    /// Does not take the lock: the result reflects all operations completed
    /// before the call, and possibly some concurrently in progress.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use coarse::hashset::HashSet;
    /// let set: HashSet<_> = HashSet::new(4);
    /// assert_eq!(0, set.len());
    ///
    /// set.insert(1);
    /// assert_eq!(1, set.len());
    /// ```
    pub fn len(&self) -> usize { self.size.load() }

    /// Returns the threshold: the average number of elements per bucket
    /// beyond which the number of buckets doubles.
    pub fn threshold(&self) -> usize { self.threshold.0 }

    /// Returns the number of buckets currently used.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use coarse::hashset::HashSet;
    /// let set: HashSet<_> = HashSet::new(1);
    /// assert_eq!(1, set.number_buckets());
    ///
    /// set.extend(0..5);
    /// assert_eq!(2, set.number_buckets());
    /// ```
    pub fn number_buckets(&self) -> usize { self.lock().number_buckets().0 }

    /// Returns `true` if the set contains the value.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use coarse::hashset::HashSet;
    /// let set: HashSet<_> = HashSet::new(4);
    /// set.insert(1);
    ///
    /// assert!(set.contains(&1));
    /// assert!(!set.contains(&0));
    /// ```
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: borrow::Borrow<Q>,
        Q: ?Sized + Eq + hash::Hash,
    {
        let hash = self.hash(value);

        self.lock().get(hash, value).is_some()
    }

    /// Inserts a value into the set.
    ///
    /// Returns `Ok(false)`, dropping `value`, if an equal value is already
    /// present.
    ///
    /// #   Errors
    ///
    /// Returns an error if the value cannot be inserted, because the allocator
    /// fails to allocate memory.
    ///
    /// Returns an error, although the value was inserted, if the number of
    /// buckets should have doubled but could not. The next insertion will try
    /// again.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use coarse::hashset::HashSet;
    /// let set: HashSet<_> = HashSet::new(4);
    ///
    /// assert_eq!(Ok(true), set.try_insert(3));
    /// assert_eq!(Ok(false), set.try_insert(3));
    ///
    /// assert!(set.contains(&3));
    /// ```
    pub fn try_insert(&self, value: T) -> Result<bool>
    where
        T: Eq + hash::Hash,
    {
        let element = Element::new(self.hash(&value), value);
        let mut table = self.lock();

        let rejected = self.insert_locked(&mut table, element)?;

        //  A rejected value is dropped after the lock is released.
        drop(table);

        Ok(rejected.is_none())
    }

    /// Inserts a value into the set.
    ///
    /// Calling this method is equivalent to calling `try_insert` and panicking on
    /// error.
    ///
    /// #   Panics
    ///
    /// Panics if the value cannot be inserted, or the number of buckets cannot
    /// be doubled.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use coarse::hashset::HashSet;
    /// let set: HashSet<_> = HashSet::new(4);
    ///
    /// assert!(set.insert(3));
    /// assert!(!set.insert(3));
    ///
    /// assert_eq!(1, set.len());
    /// ```
    pub fn insert(&self, value: T) -> bool
    where
        T: Eq + hash::Hash,
    {
        match self.try_insert(value) {
            Ok(result) => result,
            Err(error) => panic_from_failure(error),
        }
    }

    /// Inserts multiple values in the set, under a single acquisition of the
    /// lock.
    ///
    /// The values are collected and hashed before the lock is taken, hence
    /// `collection` may itself query the set.
    ///
    /// If a value cannot be inserted because it is already present, it is
    /// dropped, after the lock is released.
    ///
    /// Returns the number of values inserted.
    ///
    /// #   Errors
    ///
    /// Returns an error if any of the values cannot be inserted, or the number
    /// of buckets cannot be doubled. The values inserted prior to the error,
    /// and possibly the value causing it, remain in the set.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use coarse::hashset::HashSet;
    /// let set: HashSet<_> = HashSet::new(4);
    /// assert_eq!(Ok(3), set.try_extend([1, 2, 3, 2]));
    /// assert_eq!(3, set.len());
    /// ```
    pub fn try_extend<C>(&self, collection: C) -> Result<usize>
    where
        C: IntoIterator<Item = T>,
        T: Eq + hash::Hash,
    {
        let collection = collection.into_iter();

        let mut elements = Vec::new();
        reserve(&mut elements, collection.size_hint().0)?;

        for value in collection {
            reserve(&mut elements, 1)?;
            elements.push(Element::new(self.hash(&value), value));
        }

        //  No allocation may occur under the lock.
        let mut rejected = Vec::new();
        reserve(&mut rejected, elements.len())?;

        let mut pending = elements.into_iter();
        let mut inserted = 0;

        let mut table = self.lock();

        for element in pending.by_ref() {
            match self.insert_locked(&mut table, element)? {
                Some(value) => rejected.push(value),
                None => inserted += 1,
            }
        }

        drop(table);

        Ok(inserted)
    }

    /// Inserts multiple values in the set, under a single acquisition of the
    /// lock.
    ///
    /// Calling this method is equivalent to calling `try_extend` and panicking
    /// on error.
    ///
    /// #   Panics
    ///
    /// Panics if any of the values cannot be inserted due to an error.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use coarse::hashset::HashSet;
    /// let set: HashSet<_> = HashSet::new(4);
    /// assert_eq!(3, set.extend([1, 2, 3]));
    /// assert_eq!(3, set.len());
    /// ```
    pub fn extend<C>(&self, collection: C) -> usize
    where
        C: IntoIterator<Item = T>,
        T: Eq + hash::Hash,
    {
        match self.try_extend(collection) {
            Ok(result) => result,
            Err(error) => panic_from_failure(error),
        }
    }

    /// Removes a value from the set.
    ///
    /// Returns whether the value was present.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use coarse::hashset::HashSet;
    /// let set: HashSet<_> = HashSet::new(4);
    /// set.insert(1);
    ///
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// assert!(set.is_empty());
    /// ```
    pub fn remove<Q>(&self, value: &Q) -> bool
    where
        T: borrow::Borrow<Q>,
        Q: ?Sized + Eq + hash::Hash,
    {
        self.take(value).is_some()
    }

    /// Removes a value from the set, and returns it.
    ///
    /// The value is returned after the lock is released.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use coarse::hashset::HashSet;
    /// let set: HashSet<_> = HashSet::new(4);
    /// set.insert(String::from("Hello"));
    ///
    /// assert_eq!(Some(String::from("Hello")), set.take("Hello"));
    /// assert_eq!(None, set.take("Hello"));
    /// ```
    pub fn take<Q>(&self, value: &Q) -> Option<T>
    where
        T: borrow::Borrow<Q>,
        Q: ?Sized + Eq + hash::Hash,
    {
        let hash = self.hash(value);
        let mut table = self.lock();

        let taken = table.remove(hash, value)?;
        self.size.store(self.size.load() - 1);

        Some(taken)
    }

    /// Clears the instance.
    ///
    /// The instance is then empty, although it retains its number of buckets.
    /// The elements are dropped after the lock is released.
    ///
    /// #   Errors
    ///
    /// Returns an error if the replacement buckets cannot be allocated; the
    /// instance is then left untouched.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use coarse::hashset::HashSet;
    /// let set: HashSet<_> = HashSet::new(4);
    /// set.extend([1, 2, 3]);
    ///
    /// assert_eq!(Ok(()), set.try_clear());
    /// assert_eq!(0, set.len());
    /// assert_eq!(4, set.number_buckets());
    /// ```
    pub fn try_clear(&self) -> Result<()> {
        let mut table = self.lock();

        let previous = table.try_clear()?;
        self.size.store(0);

        drop(table);
        drop(previous);

        Ok(())
    }

    /// Clears the instance.
    ///
    /// Calling this method is equivalent to calling `try_clear` and panicking
    /// on error.
    ///
    /// #   Panics
    ///
    /// Panics if the replacement buckets cannot be allocated.
    pub fn clear(&self) {
        if let Err(error) = self.try_clear() {
            panic_from_failure(error);
        }
    }

    //  Inserts `element` in `table`, and grows the table if necessary.
    //
    //  Returns the value of `element` if an equal value is already present, so
    //  that the caller may drop it after releasing the lock.
    //
    //  The counter is stored into as soon as the element is in the table, so
    //  that it stays accurate even if growing fails.
    fn insert_locked(&self, table: &mut Table<T>, element: Element<T>) -> Result<Option<T>>
    where
        T: Eq,
    {
        if table.get(element.hash(), element.get()).is_some() {
            return Ok(Some(element.into_inner()));
        }

        table.try_insert(element)?;

        let size = Size(self.size.load() + 1);
        self.size.store(size.0);

        let number = table.number_buckets();

        if self.threshold.is_exceeded(size, number) {
            match table.try_grow() {
                Ok(grown) => {
                    log::debug!("HashSet grown from {} to {} buckets, holding {} elements",
                        number.0, grown.0, size.0);
                },
                Err(failure) => {
                    log::warn!("HashSet failed to grow from {} buckets, holding {} elements: {}",
                        number.0, size.0, failure);
                    return Err(failure);
                },
            }
        }

        Ok(None)
    }

    //  Locks the table.
    //
    //  The table is consistent at every point user code may panic, hence a
    //  poisoned lock is simply recovered.
    fn lock(&self) -> MutexGuard<'_, Table<T>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    //  Computes the hash of `value`.
    //
    //  Never called while holding the lock.
    fn hash<Q>(&self, value: &Q) -> u64
    where
        Q: ?Sized + hash::Hash,
    {
        self.hooks.hash_one(value)
    }
}

impl<T, H> ConcurrentSet<T> for HashSet<T, H>
where
    T: Eq + hash::Hash,
    H: HashHooks,
{
    fn add(&self, value: T) -> bool { self.insert(value) }

    fn remove(&self, value: &T) -> bool { HashSet::remove(self, value) }

    fn contains(&self, value: &T) -> bool { HashSet::contains(self, value) }

    fn size(&self) -> usize { self.len() }
}

impl<T, H: HashHooks + Default> Default for HashSet<T, H> {
    fn default() -> Self { Self::new(DEFAULT_CAPACITY) }
}

impl<T: fmt::Debug, H: HashHooks> fmt::Debug for HashSet<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.lock().debug("HashSet", f)
    }
}

//  Reserves space for `extra` more elements in `vec`.
fn reserve<E>(vec: &mut Vec<E>, extra: usize) -> Result<()> {
    vec.try_reserve(extra).map_err(|_| Failure::OutOfMemory)
}

#[cold]
#[inline(never)]
fn panic_from_failure(failure: Failure) -> ! {
    panic!("{}", failure);
}

//  mod tests
