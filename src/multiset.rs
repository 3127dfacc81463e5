use crate::table::CountTable;
use hashbrown::TryReserveError;
use log::debug;
use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt::{self, Debug, Display};
use std::hash::{BuildHasher, Hash};

pub use crate::table::{Drain, IntoIter, Iter};

/// Multiset implementation where each distinct value is stored once, together with its multiplicity.
///
/// Besides the number of distinct values, the multiset keeps the total number of
/// elements, duplicates included, so [`len`](Multiset::len) is constant time.
///
/// # Examples
///
/// ```
/// use counted_multiset::Multiset;
///
/// let mut set = Multiset::new();
/// set.insert(1);
/// set.insert(1);
/// set.insert(2);
///
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.cardinality(), 2);
/// assert_eq!(set.contains(&1), 2);
/// ```
#[derive(Clone)]
pub struct Multiset<T, S = RandomState> {
    pub(crate) table: CountTable<T, S>,
    pub(crate) total: usize,
}

impl<T> Multiset<T, RandomState> {
    /// Creates an empty `Multiset` with a capacity of 0,
    /// so it will not allocate until it is first inserted into.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let set: Multiset<i32> = Multiset::new();
    ///
    /// assert_eq!(set.capacity(), 0);
    /// assert!(set.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Creates an empty `Multiset` with room for at least `capacity` distinct values.
    ///
    /// The capacity is only an allocation hint. It does not bound the size of the
    /// multiset and does not count as elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let set: Multiset<i32> = Multiset::with_capacity(10);
    ///
    /// assert!(set.capacity() >= 10);
    /// assert_eq!(set.len(), 0);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<T, S> Multiset<T, S> {
    /// Creates an empty `Multiset` with default capacity which will use the given hash builder to hash values.
    pub const fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: CountTable::with_hasher(hash_builder),
            total: 0,
        }
    }

    /// Creates an empty `Multiset` with room for at least `capacity` distinct values, using the given hash builder to hash values.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: CountTable::with_capacity_and_hasher(capacity, hash_builder),
            total: 0,
        }
    }

    /// Returns the number of distinct values the multiset can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns a reference to the multiset's [`BuildHasher`].
    pub const fn hasher(&self) -> &S {
        self.table.hasher()
    }

    /// Returns the number of elements in the multiset, duplicates included.
    pub fn len(&self) -> usize {
        self.total
    }

    /// Returns `true` if the multiset contains no elements.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Returns the number of distinct values in the multiset.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let mut set = Multiset::new();
    /// set.insert_many("a", 3);
    /// set.insert("b");
    ///
    /// assert_eq!(set.len(), 4);
    /// assert_eq!(set.cardinality(), 2);
    /// ```
    pub fn cardinality(&self) -> usize {
        self.table.len()
    }

    /// An iterator visiting every distinct value with its multiplicity in arbitrary order.
    /// The iterator element type is `(&'a T, usize)`.
    pub fn iter(&self) -> Iter<'_, T> {
        self.table.iter()
    }

    /// Calls `f` with every distinct value and its multiplicity, in arbitrary order,
    /// until `f` returns `true`.
    ///
    /// The multiset is borrowed for the whole traversal, so it cannot be changed from within `f`.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let mut set = Multiset::new();
    /// set.insert(10);
    /// set.insert(20);
    /// set.insert_many(30, 2);
    ///
    /// let mut copy = Multiset::new();
    /// set.each(|&value, count| {
    ///     copy.insert_many(value, count);
    ///     false
    /// });
    ///
    /// assert_eq!(set, copy);
    /// ```
    pub fn each<F>(&self, mut f: F)
    where
        F: FnMut(&T, usize) -> bool,
    {
        for (value, count) in self.iter() {
            if f(value, count) {
                break;
            }
        }
    }

    /// Clears the multiset, returning every distinct value with its multiplicity as an iterator.
    pub fn drain(&mut self) -> Drain<'_, T> {
        self.total = 0;
        self.table.drain()
    }

    /// Retains only the values specified by the predicate, which is given each distinct value and its multiplicity.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&T, usize) -> bool,
    {
        self.table.retain(f, &mut self.total);
    }

    /// Clears the multiset, removing all values.
    pub fn clear(&mut self) {
        self.table.clear();
        self.total = 0;
    }
}

impl<T, S> Multiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    /// Reserves capacity for at least `additional` more distinct values.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Tries to reserve capacity for at least `additional` more distinct values.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.table.try_reserve(additional).map_err(|err| {
            debug!(
                "failed to reserve room for {} more distinct values: {:?}",
                additional, err
            );
            err
        })
    }

    /// Shrinks the capacity of the multiset as much as possible.
    pub fn shrink_to_fit(&mut self) {
        self.table.shrink_to(0);
    }

    /// Shrinks the capacity of the multiset with a lower limit.
    pub fn shrink_to(&mut self, min_capacity: usize) {
        self.table.shrink_to(min_capacity);
    }

    /// Adds a single occurrence of `value`.
    ///
    /// Returns the multiplicity `value` had before the insertion.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let mut set = Multiset::new();
    ///
    /// assert_eq!(set.insert(10), 0);
    /// assert_eq!(set.insert(10), 1);
    /// assert_eq!(set.insert(20), 0);
    /// ```
    pub fn insert(&mut self, value: T) -> usize {
        self.insert_many(value, 1)
    }

    /// Adds `n` occurrences of `value`.
    ///
    /// Returns the multiplicity `value` had before the insertion.
    /// Inserting zero occurrences leaves the multiset untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let mut set = Multiset::new();
    ///
    /// assert_eq!(set.insert_many(10, 2), 0);
    /// assert_eq!(set.insert_many(10, 4), 2);
    /// assert_eq!(set.insert_many(10, 0), 6);
    /// assert_eq!(set.len(), 6);
    /// ```
    pub fn insert_many(&mut self, value: T, n: usize) -> usize {
        if n == 0 {
            return self.contains(&value);
        }

        self.total += n;
        self.table.add(value, n)
    }

    /// Sets the multiplicity of `value` to exactly one, whether or not it was present.
    ///
    /// Returns the multiplicity `value` had before.
    pub fn replace(&mut self, value: T) -> usize {
        let prior = self.table.set(value, 1);
        self.total = self.total - prior + 1;
        prior
    }

    /// Removes a single occurrence of `value`.
    ///
    /// Returns the multiplicity `value` had before the removal, which is 0 if it was absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let mut set = Multiset::new();
    /// set.insert_many(10, 2);
    ///
    /// assert_eq!(set.remove(&10), 2);
    /// assert_eq!(set.remove(&10), 1);
    /// assert_eq!(set.remove(&10), 0);
    /// assert!(set.is_empty());
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let prior = self.table.remove_one(value);
        if prior > 0 {
            self.total -= 1;
        }
        prior
    }

    /// Removes every occurrence of `value`, returning the multiplicity it had.
    pub fn remove_all<Q>(&mut self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.table.remove_entry(value) {
            Some((_, count)) => {
                self.total -= count;
                count
            }
            None => 0,
        }
    }

    /// Returns the stored value equal to `value` together with its multiplicity,
    /// or `None` if the multiset does not contain it.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let mut set = Multiset::new();
    /// set.insert(10);
    /// set.insert(20);
    /// set.insert(20);
    ///
    /// assert_eq!(set.get(&10), Some((&10, 1)));
    /// assert_eq!(set.get(&20), Some((&20, 2)));
    /// assert_eq!(set.get(&30), None);
    /// ```
    pub fn get<Q>(&self, value: &Q) -> Option<(&T, usize)>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get(value)
    }

    /// Returns the multiplicity of `value`, which is 0 if the multiset does not contain it.
    pub fn contains<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.count(value)
    }
}

impl<T, S1, S2> PartialEq<Multiset<T, S2>> for Multiset<T, S1>
where
    T: Eq + Hash,
    S1: BuildHasher,
    S2: BuildHasher,
{
    fn eq(&self, other: &Multiset<T, S2>) -> bool {
        self.len() == other.len()
            && self.cardinality() == other.cardinality()
            && self
                .iter()
                .all(|(value, count)| other.contains(value) == count)
    }
}

impl<T, S> Eq for Multiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
}

impl<T, S> FromIterator<T> for Multiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_hasher(Default::default());
        set.extend(iter);
        set
    }
}

impl<T, S> FromIterator<(T, usize)> for Multiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (T, usize)>>(iter: I) -> Self {
        let mut set = Self::with_hasher(Default::default());
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for Multiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T, S> Extend<&'a T> for Multiset<T, S>
where
    T: 'a + Eq + Hash + Copy,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, S> Extend<(T, usize)> for Multiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (T, usize)>>(&mut self, iter: I) {
        for (value, count) in iter {
            self.insert_many(value, count);
        }
    }
}

impl<'a, T, S> IntoIterator for &'a Multiset<T, S> {
    type Item = (&'a T, usize);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, S> IntoIterator for Multiset<T, S> {
    type Item = (T, usize);
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        self.table.into_entries()
    }
}

impl<T, S> Default for Multiset<T, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, S> Debug for Multiset<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Formats the multiset as `Multiset{value:multiplicity, ...}`.
///
/// Entries are sorted by the formatted value, so the output does not depend on storage order.
///
/// # Examples
///
/// ```
/// use counted_multiset::Multiset;
///
/// let mut set = Multiset::new();
/// set.insert_many(2, 3);
/// set.insert_many(1, 2);
/// set.insert_many(3, 4);
///
/// assert_eq!(set.to_string(), "Multiset{1:2, 2:3, 3:4}");
/// ```
impl<T, S> Display for Multiset<T, S>
where
    T: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<(String, usize)> = self
            .iter()
            .map(|(value, count)| (value.to_string(), count))
            .collect();
        entries.sort_unstable();

        f.write_str("Multiset{")?;
        for (i, (value, count)) in entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}:{}", value, count)?;
        }
        f.write_str("}")
    }
}

impl<T, const N: usize> From<[T; N]> for Multiset<T, RandomState>
where
    T: Eq + Hash,
{
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Multiset;
    use std::collections::hash_map::{DefaultHasher, RandomState};
    use std::hash::BuildHasherDefault;
    use std::panic::{self, AssertUnwindSafe};

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn counts_absent_values_as_zero() {
        let mut set: Multiset<&str> = Multiset::new();
        assert_eq!(set.contains(&"a"), 0);
        assert_eq!(set.remove(&"a"), 0);
        assert_eq!(set.remove_all(&"a"), 0);
        assert_eq!(set.get(&"a"), None);

        assert_eq!(set.insert("a"), 0);
        assert_eq!(set.contains(&"a"), 1);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_updates_total_only_when_present() {
        let mut set = Multiset::new();
        set.insert_many(10, 2);
        set.insert(20);

        assert_eq!(set.remove(&30), 0);
        assert_eq!(set.len(), 3);

        assert_eq!(set.remove(&10), 2);
        assert_eq!(set.len(), 2);
        assert_eq!(set.cardinality(), 2);

        assert_eq!(set.remove(&20), 1);
        assert_eq!(set.len(), 1);
        assert_eq!(set.cardinality(), 1);
        assert_eq!(set.get(&20), None);
    }

    #[test]
    fn remove_then_insert_restores_count() {
        let mut set = Multiset::new();
        set.insert_many('x', 5);

        set.remove(&'x');
        set.insert('x');

        assert_eq!(set.contains(&'x'), 5);
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn insert_many_zero_is_a_query() {
        let mut set = Multiset::new();

        assert_eq!(set.insert_many("a", 0), 0);
        assert!(set.is_empty());
        assert_eq!(set.cardinality(), 0);

        set.insert_many("a", 3);
        assert_eq!(set.insert_many("a", 0), 3);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn replace_resets_multiplicity_to_one() {
        let mut set = Multiset::new();

        assert_eq!(set.replace(7), 0);
        assert_eq!(set.len(), 1);

        set.insert_many(7, 4);
        set.insert(8);
        assert_eq!(set.replace(7), 5);
        assert_eq!(set.contains(&7), 1);
        assert_eq!(set.len(), 2);

        assert_eq!(set.replace(7), 1);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn remove_all_drops_every_occurrence() {
        let mut set = Multiset::new();
        set.insert_many("a", 4);
        set.insert("b");

        assert_eq!(set.remove_all("a"), 4);
        assert_eq!(set.len(), 1);
        assert_eq!(set.contains("a"), 0);
    }

    #[test]
    fn with_capacity_does_not_count_as_elements() {
        let mut set: Multiset<u32> = Multiset::with_capacity(16);

        assert!(set.capacity() >= 16);
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());

        for i in 0..64 {
            set.insert(i);
        }
        assert_eq!(set.len(), 64);
    }

    #[test]
    fn len_and_cardinality_match_traversal() {
        let set: Multiset<_> = [3, 1, 3, 2, 3, 1].into_iter().collect();

        let mut total = 0;
        let mut distinct = 0;
        set.each(|_, count| {
            total += count;
            distinct += 1;
            false
        });

        assert_eq!(total, set.len());
        assert_eq!(distinct, set.cardinality());
        assert_eq!(set.len(), 6);
        assert_eq!(set.cardinality(), 3);
    }

    #[test]
    fn each_stops_when_visitor_returns_true() {
        let set = Multiset::from([1, 2, 3, 4, 5]);

        let mut visited = 0;
        set.each(|_, _| {
            visited += 1;
            visited == 2
        });

        assert_eq!(visited, 2);
    }

    #[test]
    fn clone_is_independent() {
        let mut original = Multiset::from(["a", "a", "b"]);
        let mut copy = original.clone();

        copy.insert("c");
        original.remove(&"a");

        assert_eq!(original.contains(&"a"), 1);
        assert_eq!(original.contains(&"c"), 0);
        assert_eq!(copy.contains(&"a"), 2);
        assert_eq!(copy.contains(&"c"), 1);
    }

    #[test]
    fn equality_ignores_insertion_order_and_hasher() {
        let mut left = Multiset::new();
        left.insert_many(10, 2);
        left.insert(20);

        let mut right: Multiset<i32, BuildHasherDefault<DefaultHasher>> = Multiset::default();
        right.insert(20);
        right.insert(10);
        right.insert(10);

        assert_eq!(left, right);
        assert_eq!(right, left);
        assert_eq!(left, left);

        right.insert(10);
        assert_ne!(left, right);
    }

    #[test]
    fn equality_compares_multiplicities() {
        let left = Multiset::from([1, 1, 2]);
        let right = Multiset::from([1, 2, 2]);

        assert_eq!(left.len(), right.len());
        assert_ne!(left, right);
    }

    #[test]
    fn structs_compare_structurally() {
        let mut set = Multiset::new();
        set.insert(Point { x: 1, y: 2 });
        set.insert(Point { x: 1, y: 2 });
        set.insert(Point { x: 2, y: 1 });

        assert_eq!(set.contains(&Point { x: 1, y: 2 }), 2);
        assert_eq!(set.cardinality(), 2);
    }

    #[test]
    fn display_sorts_by_formatted_value() {
        let empty: Multiset<i32> = Multiset::new();
        assert_eq!(empty.to_string(), "Multiset{}");

        let mut set = Multiset::new();
        set.insert_many(1, 2);
        set.insert_many(2, 3);
        assert_eq!(set.to_string(), "Multiset{1:2, 2:3}");

        let mut set = Multiset::new();
        set.insert_many(2, 3);
        set.insert_many(1, 2);
        set.insert_many(3, 4);
        assert_eq!(set.to_string(), "Multiset{1:2, 2:3, 3:4}");
    }

    #[test]
    fn display_orders_lexicographically() {
        let set = Multiset::from([10, 9, 9]);

        assert_eq!(set.to_string(), "Multiset{10:1, 9:2}");
    }

    #[test]
    fn retain_and_drain_keep_total_in_sync() {
        let mut set = Multiset::from(["a", "a", "b", "c", "c", "c"]);

        set.retain(|value, _| *value != "c");
        assert_eq!(set.len(), 3);
        assert_eq!(set.cardinality(), 2);

        let mut drained: Vec<_> = set.drain().collect();
        drained.sort_unstable();
        assert_eq!(drained, [("a", 2), ("b", 1)]);
        assert!(set.is_empty());
        assert_eq!(set.cardinality(), 0);
    }

    #[test]
    fn retain_keeps_total_in_sync_when_predicate_panics() {
        let mut set = Multiset::from(["a", "b", "b", "c", "d", "d", "d"]);
        let mut visited = 0;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            set.retain(|_, _| {
                visited += 1;
                if visited == 3 {
                    panic!("predicate failed");
                }
                false
            });
        }));

        assert!(outcome.is_err());
        assert_eq!(set.cardinality(), 2);
        assert_eq!(set.len(), set.iter().map(|(_, count)| count).sum::<usize>());
    }

    #[test]
    fn collects_value_count_pairs() {
        let set: Multiset<&str, RandomState> = vec![("a", 2), ("b", 0), ("a", 1)]
            .into_iter()
            .collect();

        assert_eq!(set.contains("a"), 3);
        assert_eq!(set.contains("b"), 0);
        assert_eq!(set.cardinality(), 1);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn into_iter_yields_counts() {
        let set = Multiset::from(['a', 'b', 'a']);

        let mut entries: Vec<_> = set.into_iter().collect();
        entries.sort_unstable();

        assert_eq!(entries, [('a', 2), ('b', 1)]);
    }

    #[test]
    fn try_reserve_grows_capacity() {
        let mut set: Multiset<u64> = Multiset::new();

        assert!(set.try_reserve(32).is_ok());
        assert!(set.capacity() >= 32);
        assert!(set.try_reserve(usize::MAX).is_err());
        assert!(set.is_empty());
    }
}
