use hashbrown::raw::{RawDrain, RawIntoIter, RawIter, RawTable};
use hashbrown::TryReserveError;
use std::borrow::Borrow;
use std::fmt::{self, Debug};
use std::hash::{BuildHasher, Hash, Hasher};
use std::iter::FusedIterator;
use std::marker::PhantomData;

/// Hash table mapping each distinct value to its multiplicity.
///
/// Every bucket holds a `(value, multiplicity)` pair with a multiplicity of at least 1.
/// The table does not track the sum of multiplicities, that is left to the owning `Multiset`.
#[derive(Clone)]
pub(crate) struct CountTable<T, S> {
    hash_builder: S,
    pub(crate) table: RawTable<(T, usize)>,
}

impl<T, S> CountTable<T, S> {
    pub(crate) const fn with_hasher(hash_builder: S) -> Self {
        Self {
            hash_builder,
            table: RawTable::new(),
        }
    }

    pub(crate) fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            hash_builder,
            table: RawTable::with_capacity(capacity),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub(crate) const fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Number of distinct values.
    pub(crate) fn len(&self) -> usize {
        self.table.len()
    }

    pub(crate) fn clear(&mut self) {
        self.table.clear();
    }

    pub(crate) fn iter(&self) -> Iter<'_, T> {
        unsafe {
            Iter {
                iter: self.table.iter(),
                marker: PhantomData,
            }
        }
    }

    pub(crate) fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            iter: self.table.drain(),
        }
    }

    pub(crate) fn into_entries(self) -> IntoIter<T> {
        IntoIter {
            iter: self.table.into_iter(),
        }
    }

    /// Keeps the buckets for which `f` returns `true`.
    ///
    /// `total` is lowered by the multiplicity of every erased bucket as soon as it is erased,
    /// so it stays in sync even if `f` panics.
    pub(crate) fn retain<F>(&mut self, mut f: F, total: &mut usize)
    where
        F: FnMut(&T, usize) -> bool,
    {
        unsafe {
            for bucket in self.table.iter() {
                let &(ref value, count) = bucket.as_ref();

                if !f(value, count) {
                    self.table.erase(bucket);
                    *total -= count;
                }
            }
        }
    }
}

impl<T, S> CountTable<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    pub(crate) fn get<Q>(&self, value: &Q) -> Option<(&T, usize)>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = make_hash(&self.hash_builder, value);

        self.table
            .get(hash, equivalent_key(value))
            .map(|&(ref value, count)| (value, count))
    }

    /// Returns the multiplicity of `value`, or 0 if it is absent.
    pub(crate) fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(value).map_or(0, |(_, count)| count)
    }

    /// Adds `n` to the multiplicity of `value`, returning the previous multiplicity.
    ///
    /// `n` must be non-zero.
    pub(crate) fn add(&mut self, value: T, n: usize) -> usize {
        debug_assert!(n > 0);
        let hash = make_hash(&self.hash_builder, &value);

        match self.table.get_mut(hash, equivalent_key(&value)) {
            Some(entry) => {
                let prior = entry.1;
                entry.1 += n;
                prior
            }
            None => {
                self.table
                    .insert(hash, (value, n), make_hasher(&self.hash_builder));
                0
            }
        }
    }

    /// Sets the multiplicity of `value` to `n`, returning the previous multiplicity.
    ///
    /// `n` must be non-zero.
    pub(crate) fn set(&mut self, value: T, n: usize) -> usize {
        debug_assert!(n > 0);
        let hash = make_hash(&self.hash_builder, &value);

        match self.table.get_mut(hash, equivalent_key(&value)) {
            Some(entry) => std::mem::replace(&mut entry.1, n),
            None => {
                self.table
                    .insert(hash, (value, n), make_hasher(&self.hash_builder));
                0
            }
        }
    }

    /// Lowers the multiplicity of `value` by one, erasing its bucket when it reaches zero.
    ///
    /// Returns the previous multiplicity.
    pub(crate) fn remove_one<Q>(&mut self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = make_hash(&self.hash_builder, value);

        let bucket = match self.table.find(hash, equivalent_key(value)) {
            Some(bucket) => bucket,
            None => return 0,
        };

        unsafe {
            let entry = bucket.as_mut();
            let prior = entry.1;

            if prior == 1 {
                self.table.erase(bucket);
            } else {
                entry.1 -= 1;
            }

            prior
        }
    }

    pub(crate) fn remove_entry<Q>(&mut self, value: &Q) -> Option<(T, usize)>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = make_hash(&self.hash_builder, value);

        self.table.remove_entry(hash, equivalent_key(value))
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.table
            .reserve(additional, make_hasher(&self.hash_builder));
    }

    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.table
            .try_reserve(additional, make_hasher(&self.hash_builder))
    }

    pub(crate) fn shrink_to(&mut self, min_capacity: usize) {
        self.table
            .shrink_to(min_capacity, make_hasher(&self.hash_builder));
    }
}

/// An iterator over the distinct values of a `Multiset` and their multiplicities.
pub struct Iter<'a, T> {
    iter: RawIter<(T, usize)>,
    marker: PhantomData<&'a T>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
            marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a T, usize);

    fn next(&mut self) -> Option<(&'a T, usize)> {
        self.iter.next().map(|bucket| unsafe {
            let &(ref value, count) = bucket.as_ref();
            (value, count)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T: Debug> Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// A draining iterator over the distinct values of a `Multiset` and their multiplicities.
pub struct Drain<'a, T> {
    iter: RawDrain<'a, (T, usize)>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = (T, usize);

    fn next(&mut self) -> Option<(T, usize)> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<T> FusedIterator for Drain<'_, T> {}

/// An owning iterator over the distinct values of a `Multiset` and their multiplicities.
pub struct IntoIter<T> {
    iter: RawIntoIter<(T, usize)>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = (T, usize);

    fn next(&mut self) -> Option<(T, usize)> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

fn equivalent_key<Q, T>(value: &Q) -> impl Fn(&(T, usize)) -> bool + '_
where
    T: Borrow<Q>,
    Q: ?Sized + Eq,
{
    move |x| value == x.0.borrow()
}

fn make_hasher<T, S>(hash_builder: &S) -> impl Fn(&(T, usize)) -> u64 + '_
where
    T: Hash,
    S: BuildHasher,
{
    move |x| make_hash(hash_builder, &x.0)
}

fn make_hash<T, S>(hash_builder: &S, value: &T) -> u64
where
    T: ?Sized + Hash,
    S: BuildHasher,
{
    let mut state = hash_builder.build_hasher();
    value.hash(&mut state);
    state.finish()
}
