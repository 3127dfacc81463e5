use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::collections::LinkedList;

mod multiset;

pub use self::multiset::{IntoParIter, ParIter};

/// Collects a parallel iterator into per-thread vectors, returning them with the total number of items.
fn collect<I: IntoParallelIterator>(iter: I) -> (LinkedList<Vec<I::Item>>, usize) {
    let list = iter
        .into_par_iter()
        .fold(Vec::new, |mut vec, item| {
            vec.push(item);
            vec
        })
        .map(|vec| {
            let mut list = LinkedList::new();
            list.push_back(vec);
            list
        })
        .reduce(LinkedList::new, |mut list1, mut list2| {
            list1.append(&mut list2);
            list1
        });

    let len = list.iter().map(Vec::len).sum();
    (list, len)
}
