//! The buckets underlying the HashSet.
//!
//! The table is an array of buckets, each bucket a dynamically sized array of
//! the elements whose hash maps to its index. The table knows nothing of
//! locking: it is only ever accessed by the holder of the HashSet lock.

use std::{alloc, borrow, fmt, mem};

use self::borrow::Borrow;

use super::capacity::{NumberBuckets, Size};
use super::element::Element;
use super::failure::{Failure, Result};

//  A Bucket.
pub type Bucket<T> = Vec<Element<T>>;

//  The Table.
pub struct Table<T> {
    buckets: Vec<Bucket<T>>,
}

impl<T> Table<T> {
    //  Creates an instance with `number` empty buckets.
    //
    //  #   Errors
    //
    //  Returns an error if the buckets cannot be allocated.
    pub fn try_new(number: NumberBuckets) -> Result<Self> {
        let buckets = allocate_buckets(number)?;
        Ok(Self { buckets })
    }

    //  Returns the number of buckets.
    pub fn number_buckets(&self) -> NumberBuckets {
        NumberBuckets(self.buckets.len())
    }

    //  Returns the number of elements, computed bucket by bucket.
    pub fn size(&self) -> Size {
        Size(self.buckets.iter().map(Vec::len).sum())
    }

    //  Gets the element matching `key`, whose hash is `hash`, if any.
    pub fn get<Q>(&self, hash: u64, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.bucket(hash)
            .iter()
            .find(|e| e.matches(hash, key))
            .map(Element::get)
    }

    //  Inserts `element` in its bucket.
    //
    //  The caller is responsible for checking that no matching element is
    //  present beforehand.
    //
    //  #   Errors
    //
    //  Returns an error if the bucket cannot grow; the element is dropped.
    pub fn try_insert(&mut self, element: Element<T>) -> Result<()> {
        let bucket = self.bucket_mut(element.hash());

        bucket.try_reserve(1).map_err(|_| Failure::OutOfMemory)?;
        bucket.push(element);

        Ok(())
    }

    //  Removes the element matching `key`, whose hash is `hash`, if any.
    pub fn remove<Q>(&mut self, hash: u64, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let bucket = self.bucket_mut(hash);
        let position = bucket.iter().position(|e| e.matches(hash, key))?;

        //  Buckets are unordered.
        Some(bucket.swap_remove(position).into_inner())
    }

    //  Doubles the number of buckets, moving every element to the bucket its
    //  cached hash maps to in the new table.
    //
    //  Returns the new number of buckets.
    //
    //  #   Errors
    //
    //  Returns an error if the number of buckets cannot be doubled, or the new
    //  table cannot be allocated. The table is then left untouched.
    pub fn try_grow(&mut self) -> Result<NumberBuckets> {
        let number = self.number_buckets().doubled()?;
        let mut buckets = allocate_buckets::<T>(number)?;

        //  All allocations are performed prior to moving any element.
        let mut lengths: Vec<usize> = Vec::new();
        lengths.try_reserve_exact(number.0).map_err(|_| Failure::OutOfMemory)?;
        lengths.resize(number.0, 0);

        for element in self.buckets.iter().flatten() {
            lengths[number.bucket_of(element.hash()).0] += 1;
        }

        for (bucket, length) in buckets.iter_mut().zip(lengths) {
            bucket.try_reserve_exact(length).map_err(|_| Failure::OutOfMemory)?;
        }

        for element in self.buckets.drain(..).flatten() {
            let index = number.bucket_of(element.hash());
            buckets[index.0].push(element);
        }

        let previous = mem::replace(&mut self.buckets, buckets);
        debug_assert!(previous.is_empty());

        Ok(number)
    }

    //  Replaces the content of the table with as many empty buckets.
    //
    //  Returns the previous content, to let the caller drop it at leisure.
    //
    //  #   Errors
    //
    //  Returns an error if the empty buckets cannot be allocated. The table is
    //  then left untouched.
    pub fn try_clear(&mut self) -> Result<Table<T>> {
        let empty = Table::try_new(self.number_buckets())?;
        Ok(mem::replace(self, empty))
    }

    fn bucket(&self, hash: u64) -> &Bucket<T> {
        let index = self.number_buckets().bucket_of(hash);
        &self.buckets[index.0]
    }

    fn bucket_mut(&mut self, hash: u64) -> &mut Bucket<T> {
        let index = self.number_buckets().bucket_of(hash);
        &mut self.buckets[index.0]
    }
}

impl<T> Table<T>
where
    T: fmt::Debug
{
    //  Formats the Debug representation of the buckets.
    pub fn debug(&self, name: &str, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {{ buckets: {}, length: {}, table: [",
            name, self.buckets.len(), self.size().0)?;

        for (index, bucket) in self.buckets.iter().enumerate() {
            if index == 0 {
                write!(f, "[")?;
            } else {
                write!(f, ", [")?;
            }

            for (index, e) in bucket.iter().enumerate() {
                if index == 0 {
                    write!(f, " ")?;
                } else {
                    write!(f, ", ")?;
                }

                write!(f, "{:?}", e)?;
            }

            write!(f, " ]")?;
        }

        write!(f, "] }}")
    }
}

//
//  Implementation Details
//

fn allocate_buckets<T>(number: NumberBuckets) -> Result<Vec<Bucket<T>>> {
    alloc::Layout::array::<Bucket<T>>(number.0)
        .map_err(|_| Failure::BytesOverflow)?;

    check_allocation()?;

    let mut buckets = Vec::new();
    buckets.try_reserve_exact(number.0).map_err(|_| Failure::OutOfMemory)?;
    buckets.resize_with(number.0, Vec::new);

    Ok(buckets)
}

#[cfg(not(test))]
fn check_allocation() -> Result<()> { Ok(()) }

//  Fails the allocation if the AllocationLimit of the current thread is reached.
#[cfg(test)]
fn check_allocation() -> Result<()> {
    if crate::utils::tester::AllocationLimit::allocate() {
        Ok(())
    } else {
        Err(Failure::OutOfMemory)
    }
}

#[cfg(test)]
mod tests {

use crate::utils::tester::AllocationLimit;

use super::*;

fn table(number: usize) -> Table<u32> {
    Table::try_new(NumberBuckets(number)).unwrap()
}

fn insert(table: &mut Table<u32>, value: u32) {
    table.try_insert(Element::new(value as u64, value)).unwrap();
}

fn lengths<T>(table: &Table<T>) -> Vec<usize> {
    table.buckets.iter().map(Vec::len).collect()
}

#[test]
fn new_empty() {
    let table = table(3);

    assert_eq!(NumberBuckets(3), table.number_buckets());
    assert_eq!(Size(0), table.size());
    assert_eq!(vec![0, 0, 0], lengths(&table));
}

#[test]
fn new_bytes_overflow() {
    let result = Table::<u8>::try_new(NumberBuckets(usize::MAX));

    assert_eq!(Some(Failure::BytesOverflow), result.err());
}

#[test]
fn new_out_of_memory() {
    let number = isize::MAX as usize / mem::size_of::<Bucket<u8>>() / 2;
    let result = Table::<u8>::try_new(NumberBuckets(number));

    assert_eq!(Some(Failure::OutOfMemory), result.err());
}

#[test]
fn insert_get_remove() {
    let mut table = table(3);

    insert(&mut table, 1);
    insert(&mut table, 4);
    insert(&mut table, 5);

    assert_eq!(Size(3), table.size());
    assert_eq!(vec![0, 2, 1], lengths(&table));

    assert_eq!(Some(&4), table.get(4, &4));
    assert_eq!(None, table.get(7, &7));

    //  Same bucket, different hash.
    assert_eq!(None, table.get(7, &4));

    assert_eq!(Some(4), table.remove(4, &4));
    assert_eq!(None, table.remove(4, &4));

    assert_eq!(Size(2), table.size());
    assert_eq!(vec![0, 1, 1], lengths(&table));
}

#[test]
fn grow_rehashes() {
    let mut table = table(2);

    for value in 0..8 {
        insert(&mut table, value);
    }

    assert_eq!(vec![4, 4], lengths(&table));

    assert_eq!(Ok(NumberBuckets(4)), table.try_grow());

    assert_eq!(Size(8), table.size());
    assert_eq!(vec![2, 2, 2, 2], lengths(&table));

    for value in 0..8 {
        assert_eq!(Some(&value), table.get(value as u64, &value));
    }

    assert_eq!(Ok(NumberBuckets(8)), table.try_grow());
    assert_eq!(vec![1; 8], lengths(&table));
}

#[test]
fn grow_exact_capacity() {
    let mut table = table(1);

    for value in 0..6 {
        insert(&mut table, value * 2);
    }

    assert_eq!(Ok(NumberBuckets(2)), table.try_grow());

    //  All hashes are even.
    assert_eq!(vec![6, 0], lengths(&table));
    assert!(table.buckets[0].capacity() >= 6);
    assert_eq!(0, table.buckets[1].capacity());
}

#[test]
fn grow_out_of_memory() {
    let mut table = table(2);

    for value in 0..8 {
        insert(&mut table, value);
    }

    let limit = AllocationLimit::new(0);

    assert_eq!(Err(Failure::OutOfMemory), table.try_grow());

    //  Untouched.
    assert_eq!(NumberBuckets(2), table.number_buckets());
    assert_eq!(Size(8), table.size());
    assert_eq!(vec![4, 4], lengths(&table));

    for value in 0..8 {
        assert_eq!(Some(&value), table.get(value as u64, &value));
    }

    drop(limit);

    assert_eq!(Ok(NumberBuckets(4)), table.try_grow());
    assert_eq!(vec![2, 2, 2, 2], lengths(&table));
}

#[test]
fn clear_out_of_memory() {
    let mut table = table(2);
    insert(&mut table, 1);

    let _limit = AllocationLimit::new(0);

    assert_eq!(Some(Failure::OutOfMemory), table.try_clear().err());
    assert_eq!(Size(1), table.size());
}

#[test]
fn clear_keeps_number_buckets() {
    let mut table = table(4);

    for value in 0..10 {
        insert(&mut table, value);
    }

    let previous = table.try_clear().unwrap();

    assert_eq!(NumberBuckets(4), table.number_buckets());
    assert_eq!(Size(0), table.size());
    assert_eq!(Size(10), previous.size());
}

#[test]
fn debug() {
    let mut table = table(2);

    insert(&mut table, 1);
    insert(&mut table, 3);

    let sink = format!("{:?}", Wrapper(&table));

    assert_eq!("Table { buckets: 2, length: 2, table: [[ ], [ 1, 3 ]] }", sink);
}

struct Wrapper<'a>(&'a Table<u32>);

impl<'a> fmt::Debug for Wrapper<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.debug("Table", f)
    }
}

}
