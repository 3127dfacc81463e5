use super::collect;
use crate::Multiset;
use hashbrown::raw::rayon::{RawIntoParIter, RawParIter};
use log::trace;
use rayon::iter::plumbing::UnindexedConsumer;
use rayon::iter::{FromParallelIterator, IntoParallelIterator, ParallelExtend, ParallelIterator};
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;

/// Parallel iterator over the distinct values of a multiset and their multiplicities.
pub struct ParIter<'a, T> {
    inner: RawParIter<(T, usize)>,
    marker: PhantomData<&'a T>,
}

impl<'a, T: Sync> ParallelIterator for ParIter<'a, T> {
    type Item = (&'a T, usize);

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        self.inner
            .map(|bucket| unsafe {
                let &(ref value, count) = bucket.as_ref();
                (value, count)
            })
            .drive_unindexed(consumer)
    }
}

/// Parallel iterator over the distinct values and multiplicities of a consumed multiset.
pub struct IntoParIter<T> {
    inner: RawIntoParIter<(T, usize)>,
}

impl<T: Send> ParallelIterator for IntoParIter<T> {
    type Item = (T, usize);

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        self.inner.drive_unindexed(consumer)
    }
}

impl<T: Send, S> IntoParallelIterator for Multiset<T, S> {
    type Item = (T, usize);
    type Iter = IntoParIter<T>;

    fn into_par_iter(self) -> Self::Iter {
        IntoParIter {
            inner: self.table.table.into_par_iter(),
        }
    }
}

impl<'a, T: Sync, S> IntoParallelIterator for &'a Multiset<T, S> {
    type Item = (&'a T, usize);
    type Iter = ParIter<'a, T>;

    fn into_par_iter(self) -> Self::Iter {
        ParIter {
            inner: unsafe { self.table.table.par_iter() },
            marker: PhantomData,
        }
    }
}

impl<T, S> FromParallelIterator<T> for Multiset<T, S>
where
    T: Eq + Hash + Send,
    S: BuildHasher + Default,
{
    fn from_par_iter<P>(par_iter: P) -> Self
    where
        P: IntoParallelIterator<Item = T>,
    {
        let mut set = Multiset::default();
        set.par_extend(par_iter);
        set
    }
}

impl<T, S> ParallelExtend<T> for Multiset<T, S>
where
    T: Eq + Hash + Send,
    S: BuildHasher,
{
    fn par_extend<I>(&mut self, par_iter: I)
    where
        I: IntoParallelIterator<Item = T>,
    {
        extend(self, par_iter);
    }
}

impl<'a, T, S> ParallelExtend<&'a T> for Multiset<T, S>
where
    T: 'a + Copy + Eq + Hash + Sync,
    S: BuildHasher,
{
    fn par_extend<I>(&mut self, par_iter: I)
    where
        I: IntoParallelIterator<Item = &'a T>,
    {
        extend(self, par_iter);
    }
}

impl<T, S> ParallelExtend<(T, usize)> for Multiset<T, S>
where
    T: Eq + Hash + Send,
    S: BuildHasher,
{
    fn par_extend<I>(&mut self, par_iter: I)
    where
        I: IntoParallelIterator<Item = (T, usize)>,
    {
        extend(self, par_iter);
    }
}

fn extend<T, S, I>(set: &mut Multiset<T, S>, par_iter: I)
where
    T: Eq + Hash,
    S: BuildHasher,
    I: IntoParallelIterator,
    Multiset<T, S>: Extend<I::Item>,
{
    let (list, len) = collect(par_iter);
    trace!("counting {} items collected in parallel", len);

    for vec in list {
        set.extend(vec);
    }
}
