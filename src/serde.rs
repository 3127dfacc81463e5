use crate::Multiset;
use serde::de::{Error, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;

/// Serializes as a map from each distinct value to its multiplicity.
impl<T, H> Serialize for Multiset<T, H>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self)
    }
}

impl<'de, T, S> Deserialize<'de> for Multiset<T, S>
where
    T: Deserialize<'de> + Eq + Hash,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CountsVisitor<T, S> {
            marker: PhantomData<Multiset<T, S>>,
        }

        impl<'de, T, S> Visitor<'de> for CountsVisitor<T, S>
        where
            T: Deserialize<'de> + Eq + Hash,
            S: BuildHasher + Default,
        {
            type Value = Multiset<T, S>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of values to multiplicities")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut values =
                    Multiset::with_capacity_and_hasher(map.size_hint().unwrap_or(0), S::default());

                // Repeated keys add up, zero multiplicities are skipped by `insert_many`.
                while let Some((value, count)) = map.next_entry()? {
                    insert_counted::<_, _, A::Error>(&mut values, value, count)?;
                }

                Ok(values)
            }
        }

        let visitor = CountsVisitor {
            marker: PhantomData,
        };

        deserializer.deserialize_map(visitor)
    }

    fn deserialize_in_place<D>(deserializer: D, place: &mut Self) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CountsInPlaceVisitor<'a, T, S>(&'a mut Multiset<T, S>);

        impl<'a, 'de, T, S> Visitor<'de> for CountsInPlaceVisitor<'a, T, S>
        where
            T: Deserialize<'de> + Eq + Hash,
            S: BuildHasher + Default,
        {
            type Value = ();

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of values to multiplicities")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                self.0.clear();
                self.0.reserve(map.size_hint().unwrap_or(0));

                while let Some((value, count)) = map.next_entry()? {
                    insert_counted::<_, _, A::Error>(self.0, value, count)?;
                }

                Ok(())
            }
        }

        deserializer.deserialize_map(CountsInPlaceVisitor(place))
    }
}

/// Inserts a decoded entry, rejecting counts that would overflow the element total.
fn insert_counted<T, S, E>(set: &mut Multiset<T, S>, value: T, count: usize) -> Result<(), E>
where
    T: Eq + Hash,
    S: BuildHasher,
    E: Error,
{
    if set.len().checked_add(count).is_none() {
        return Err(E::custom(format_args!(
            "multiplicity {} overflows a multiset of {} elements",
            count,
            set.len()
        )));
    }

    set.insert_many(value, count);
    Ok(())
}
