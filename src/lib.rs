//! A [multiset](https://en.wikipedia.org/wiki/Multiset) implementation
//! where every distinct value is stored once in a hash table, next to the number of times it occurs:
//!  - `a -> 2`
//!  - `b -> 1`
//!
//! ---
//!
//! [`Multiset`] keeps the total number of elements alongside the table, so both the
//! element count ([`Multiset::len`]) and the number of distinct values
//! ([`Multiset::cardinality`]) are available in constant time.
//!
//! The multiset algebra produces new multisets and never touches its operands:
//!  - [`union`](Multiset::union) (`|`) keeps the larger multiplicity of every value,
//!  - [`intersection`](Multiset::intersection) (`&`) keeps the smaller one,
//!  - [`sum`](Multiset::sum) (`+`) adds multiplicities,
//!  - [`difference`](Multiset::difference) (`-`) subtracts them, dropping values that run out.
//!
//! ```
//! use counted_multiset::Multiset;
//!
//! let a = Multiset::from(["a", "a", "b"]);
//! let b = Multiset::from(["a", "b", "b", "c"]);
//!
//! assert_eq!((&a | &b).to_string(), "Multiset{a:2, b:2, c:1}");
//! assert_eq!((&a & &b).to_string(), "Multiset{a:1, b:1}");
//! assert_eq!((&a + &b).to_string(), "Multiset{a:3, b:3, c:1}");
//! assert_eq!((&a - &b).to_string(), "Multiset{a:1}");
//! ```
//!
//! ---
//!
//! The `serde` feature serializes a multiset as a map from value to multiplicity,
//! and the `rayon` feature adds parallel iteration and collection.

mod algebra;
mod multiset;
mod table;

/// Parallel iterators for [`Multiset`].
#[cfg(feature = "rayon")]
pub mod rayon;

#[cfg(feature = "serde")]
mod serde;

pub use crate::multiset::{Drain, IntoIter, Iter, Multiset};
pub use hashbrown::TryReserveError;
