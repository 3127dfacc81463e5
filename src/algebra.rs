use crate::Multiset;
use log::trace;
use std::hash::{BuildHasher, Hash};
use std::ops::{Add, BitAnd, BitOr, Sub};

impl<T, S> Multiset<T, S>
where
    T: Eq + Hash + Clone,
    S: BuildHasher + Clone,
{
    /// Returns the union of `self` and `other` as a new multiset.
    ///
    /// Every value takes the larger of its two multiplicities.
    /// Passing `None` as `other` is the same as passing an empty multiset.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let a = Multiset::from(["a", "a", "b"]);
    /// let b = Multiset::from(["a", "b", "b", "c"]);
    ///
    /// let union = a.union(&b);
    /// assert_eq!(union.contains("a"), 2);
    /// assert_eq!(union.contains("b"), 2);
    /// assert_eq!(union.contains("c"), 1);
    /// assert_eq!(a.union(None), a);
    /// ```
    #[must_use]
    pub fn union<'a>(&self, other: impl Into<Option<&'a Self>>) -> Self
    where
        T: 'a,
        S: 'a,
    {
        let other = other.into();
        let mut result = self.clone();

        if let Some(other) = other {
            for (value, count) in other {
                let own = result.contains(value);
                if count > own {
                    result.insert_many(value.clone(), count - own);
                }
            }
        }

        trace!(
            "union of {} and {} distinct values has {}",
            self.cardinality(),
            other.map_or(0, Multiset::cardinality),
            result.cardinality()
        );

        result
    }

    /// Returns the intersection of `self` and `other` as a new multiset.
    ///
    /// Only values present in both operands are kept, with the smaller of their two multiplicities.
    /// Passing `None` as `other` yields an empty multiset.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let a = Multiset::from(["a", "a", "a", "b"]);
    /// let b = Multiset::from(["a", "a", "c"]);
    ///
    /// let intersection = a.intersection(&b);
    /// assert_eq!(intersection.contains("a"), 2);
    /// assert_eq!(intersection.contains("b"), 0);
    /// assert_eq!(intersection.contains("c"), 0);
    /// assert!(a.intersection(None).is_empty());
    /// ```
    #[must_use]
    pub fn intersection<'a>(&self, other: impl Into<Option<&'a Self>>) -> Self
    where
        T: 'a,
        S: 'a,
    {
        let other = other.into();
        let mut result = Self::with_hasher(self.hasher().clone());

        if let Some(other) = other {
            let (smaller, larger) = if self.cardinality() <= other.cardinality() {
                (self, other)
            } else {
                (other, self)
            };

            for (value, count) in smaller {
                let common = count.min(larger.contains(value));
                if common > 0 {
                    result.insert_many(value.clone(), common);
                }
            }
        }

        trace!(
            "intersection of {} and {} distinct values has {}",
            self.cardinality(),
            other.map_or(0, Multiset::cardinality),
            result.cardinality()
        );

        result
    }

    /// Returns the sum of `self` and `other` as a new multiset.
    ///
    /// Every value takes the sum of its two multiplicities.
    /// Passing `None` as `other` is the same as passing an empty multiset.
    #[must_use]
    pub fn sum<'a>(&self, other: impl Into<Option<&'a Self>>) -> Self
    where
        T: 'a,
        S: 'a,
    {
        let other = other.into();
        let mut result = self.clone();

        if let Some(other) = other {
            result.reserve(other.cardinality());
            for (value, count) in other {
                result.insert_many(value.clone(), count);
            }
        }

        trace!(
            "sum of {} and {} elements has {}",
            self.len(),
            other.map_or(0, Multiset::len),
            result.len()
        );

        result
    }

    /// Returns the difference of `self` and `other` as a new multiset.
    ///
    /// Every value of `self` loses as many occurrences as `other` has of it.
    /// Values left with no occurrences are not part of the result.
    /// Passing `None` as `other` is the same as passing an empty multiset.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let a = Multiset::from(["a", "a", "b"]);
    /// let b = Multiset::from(["a", "b", "b", "c"]);
    ///
    /// let difference = a.difference(&b);
    /// assert_eq!(difference.contains("a"), 1);
    /// assert_eq!(difference.cardinality(), 1);
    /// ```
    #[must_use]
    pub fn difference<'a>(&self, other: impl Into<Option<&'a Self>>) -> Self
    where
        T: 'a,
        S: 'a,
    {
        let other = other.into();
        let mut result = Self::with_hasher(self.hasher().clone());

        for (value, count) in self {
            let removed = other.map_or(0, |other| other.contains(value));
            let left = count.saturating_sub(removed);
            if left > 0 {
                result.insert_many(value.clone(), left);
            }
        }

        trace!(
            "difference of {} and {} elements has {}",
            self.len(),
            other.map_or(0, Multiset::len),
            result.len()
        );

        result
    }
}

impl<T, S> Multiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    /// Returns `true` if no value occurs more often in `self` than in `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use counted_multiset::Multiset;
    ///
    /// let a = Multiset::from([1, 1, 2]);
    /// let b = Multiset::from([1, 1, 1, 2, 3]);
    ///
    /// assert!(a.is_subset(&b));
    /// assert!(!b.is_subset(&a));
    /// ```
    pub fn is_subset<S2>(&self, other: &Multiset<T, S2>) -> bool
    where
        S2: BuildHasher,
    {
        self.len() <= other.len()
            && self
                .iter()
                .all(|(value, count)| count <= other.contains(value))
    }
}

impl<T, S> BitOr<&Multiset<T, S>> for &Multiset<T, S>
where
    T: Eq + Hash + Clone,
    S: BuildHasher + Clone,
{
    type Output = Multiset<T, S>;

    /// Returns the union of `self` and `rhs` as a new `Multiset<T, S>`.
    fn bitor(self, rhs: &Multiset<T, S>) -> Multiset<T, S> {
        self.union(rhs)
    }
}

impl<T, S> BitAnd<&Multiset<T, S>> for &Multiset<T, S>
where
    T: Eq + Hash + Clone,
    S: BuildHasher + Clone,
{
    type Output = Multiset<T, S>;

    /// Returns the intersection of `self` and `rhs` as a new `Multiset<T, S>`.
    fn bitand(self, rhs: &Multiset<T, S>) -> Multiset<T, S> {
        self.intersection(rhs)
    }
}

impl<T, S> Add<&Multiset<T, S>> for &Multiset<T, S>
where
    T: Eq + Hash + Clone,
    S: BuildHasher + Clone,
{
    type Output = Multiset<T, S>;

    /// Returns the sum of `self` and `rhs` as a new `Multiset<T, S>`.
    fn add(self, rhs: &Multiset<T, S>) -> Multiset<T, S> {
        self.sum(rhs)
    }
}

impl<T, S> Sub<&Multiset<T, S>> for &Multiset<T, S>
where
    T: Eq + Hash + Clone,
    S: BuildHasher + Clone,
{
    type Output = Multiset<T, S>;

    /// Returns the difference of `self` and `rhs` as a new `Multiset<T, S>`.
    fn sub(self, rhs: &Multiset<T, S>) -> Multiset<T, S> {
        self.difference(rhs)
    }
}
