use core::cmp::Ordering;
use core::ops::{Index, IndexMut};

use indexmap::map::Entry;
use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::collection::Collection;
use crate::compare::{self, SortFlags};
use crate::error::CollectionError;
use crate::iter::Pairs;
use crate::iterable;
use crate::value::{Key, Value, NULL};

/// Picks the `value_key` field of every value, keyed by its `index_key` field.
///
/// Values without `value_key` are skipped. A missing or unusable index field
/// puts the value under the next integer key, one above the largest integer
/// key so far. Later duplicates overwrite earlier ones in place.
pub(crate) fn extract_column<'a, I>(
    values: I,
    value_key: &Key,
    index_key: Option<&Key>,
) -> IndexMap<Key, Value>
where
    I: Iterator<Item = &'a Value>,
{
    let mut pairs = IndexMap::new();
    let mut next_index: i64 = 0;

    for value in values {
        let Some(picked) = value.field(value_key) else {
            continue;
        };

        let key = match index_key
            .and_then(|index_key| value.field(index_key))
            .and_then(Key::from_value)
        {
            Some(key) => key,
            None => Key::Int(next_index),
        };
        if let Key::Int(i) = key {
            next_index = next_index.max(i.saturating_add(1));
        }
        pairs.insert(key, picked.clone());
    }

    pairs
}

/// Inserts every pair whose key is still vacant.
fn accumulate<I, K, V>(pairs: &mut IndexMap<Key, Value>, produced: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<Key>,
    V: Into<Value>,
{
    for (key, value) in produced {
        if let Entry::Vacant(slot) = pairs.entry(key.into()) {
            slot.insert(value.into());
        }
    }
}

/// Key/value pairs with unique keys, iterated in insertion order.
///
/// Equality takes the order of the pairs into account.
#[derive(Debug, Clone, Default)]
pub struct Map {
    pairs: IndexMap<Key, Value>,
}

impl Map {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_index_map(pairs: IndexMap<Key, Value>) -> Self {
        Self { pairs }
    }

    #[must_use]
    pub fn into_index_map(self) -> IndexMap<Key, Value> {
        self.pairs
    }

    /// Creates a map from key/value pairs. Later duplicates overwrite earlier
    /// ones but keep the position of the first.
    pub fn create<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        Self {
            pairs: iterable::to_array(pairs),
        }
    }

    /// Builds a map from the pairs `mapper` produces for every input pair.
    ///
    /// The first pair produced for a key wins; later pairs with the same key,
    /// from the same or a later call, are dropped.
    ///
    /// ```
    /// use listmap::{Key, Map, Value};
    ///
    /// let map = Map::build([(1, "a"), (2, "b")], |key, value| {
    ///     vec![
    ///         (Key::from("same"), value.clone()),
    ///         (Key::from(value.to_text().into_owned()), key.to_value()),
    ///     ]
    /// });
    /// assert_eq!(map.get("same").and_then(|v| v.as_str()), Some("a"));
    /// assert_eq!(
    ///     map.keys().to_array(),
    ///     vec![Value::from("same"), Value::from("a"), Value::from("b")]
    /// );
    /// ```
    pub fn build<I, K, V, F, P, PK, PV>(pairs: I, mut mapper: F) -> Map
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
        F: FnMut(&Key, &Value) -> P,
        P: IntoIterator<Item = (PK, PV)>,
        PK: Into<Key>,
        PV: Into<Value>,
    {
        let mut built = IndexMap::new();
        for (key, value) in pairs {
            let (key, value): (Key, Value) = (key.into(), value.into());
            accumulate(&mut built, mapper(&key, &value));
        }
        Self { pairs: built }
    }

    /// Zips keys with values.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::LengthMismatch` if the counts differ.
    pub fn combine<IK, K, IV, V>(keys: IK, values: IV) -> Result<Map, CollectionError>
    where
        IK: IntoIterator<Item = K>,
        K: Into<Key>,
        IV: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let keys: Vec<Key> = keys.into_iter().map(Into::into).collect();
        let values = iterable::to_list(values);
        if keys.len() != values.len() {
            return Err(CollectionError::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }

        Ok(Self::create(keys.into_iter().zip(values)))
    }

    /// Replaces all pairs.
    pub fn set_pairs<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        self.pairs = iterable::to_array(pairs);
    }

    /// Returns a copy of the pairs.
    #[must_use]
    pub fn to_array(&self) -> IndexMap<Key, Value> {
        self.pairs.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn iter(&self) -> Pairs<'_> {
        Pairs::new(self.pairs.iter())
    }

    pub fn has(&self, key: impl Into<Key>) -> bool {
        self.pairs.contains_key(&key.into())
    }

    /// Checks whether some key maps to `value`.
    ///
    /// `strict` selects strict equality (`PartialEq`) over [`Value::loose_eq`].
    pub fn contains(&self, value: impl Into<Value>, strict: bool) -> bool {
        self.find(value, strict).is_some()
    }

    /// Returns the first key that maps to `value`.
    pub fn find(&self, value: impl Into<Value>, strict: bool) -> Option<&Key> {
        let needle = value.into();
        self.pairs
            .iter()
            .find(|(_, value)| {
                if strict {
                    **value == needle
                } else {
                    value.loose_eq(&needle)
                }
            })
            .map(|(key, _)| key)
    }

    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        self.pairs.get(&key.into())
    }

    #[must_use]
    pub fn values(&self) -> Collection {
        Collection::create(self.pairs.values())
    }

    #[must_use]
    pub fn keys(&self) -> Collection {
        Collection::create(self.pairs.keys())
    }

    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Value>) {
        self.pairs.insert(key.into(), value.into());
    }

    /// Writes the pairs of every iterable into the map; later sources win.
    pub fn add<I, J, K, V>(&mut self, iterables: I)
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        for pairs in iterables {
            self.extend(pairs);
        }
    }

    /// Sets `value` for every key of `keys`.
    pub fn fill<I, K>(&mut self, keys: I, value: impl Into<Value>)
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        let value = value.into();
        for key in keys {
            self.pairs.insert(key.into(), value.clone());
        }
    }

    /// Removes the given keys, keeping the order of the remaining pairs.
    pub fn remove<I, K>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        for key in keys {
            self.pairs.shift_remove(&key.into());
        }
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    pub fn reduce<A, F>(&self, mut reducer: F, initial: A) -> A
    where
        F: FnMut(A, &Key, &Value) -> A,
    {
        self.pairs
            .iter()
            .fold(initial, |acc, (key, value)| reducer(acc, key, value))
    }

    /// Swaps keys and values. Values are keyed by their text form; on
    /// collision the later pair wins.
    #[must_use]
    pub fn flip(&self) -> Map {
        let mut flipped = IndexMap::with_capacity(self.pairs.len());
        for (key, value) in &self.pairs {
            flipped.insert(Key::from(&*value.to_text()), key.to_value());
        }
        Self { pairs: flipped }
    }

    /// Permutes the values among the existing keys.
    #[must_use]
    pub fn shuffle(&self) -> Map {
        self.shuffle_with(&mut rand::thread_rng())
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Map {
        let mut values: Vec<Value> = self.pairs.values().cloned().collect();
        values.shuffle(rng);
        Self {
            pairs: self.pairs.keys().cloned().zip(values).collect(),
        }
    }

    /// Extracts the `key` field of every value that has one.
    ///
    /// Without `index_key` the original keys are kept. Otherwise the result
    /// is keyed by the `index_key` field of each value, the way
    /// [`Collection::map_column`] does it.
    pub fn column(&self, key: impl Into<Key>, index_key: Option<Key>) -> Map {
        let key = key.into();
        if let Some(index_key) = index_key {
            return Self {
                pairs: extract_column(self.pairs.values(), &key, Some(&index_key)),
            };
        }

        Self {
            pairs: self
                .pairs
                .iter()
                .filter_map(|(k, value)| Some((k.clone(), value.field(&key)?.clone())))
                .collect(),
        }
    }

    /// Keeps the pairs for which `predicate` returns `true`.
    pub fn filter<F>(&self, mut predicate: F) -> Map
    where
        F: FnMut(&Key, &Value) -> bool,
    {
        Self {
            pairs: self
                .pairs
                .iter()
                .filter(|(key, value)| predicate(*key, *value))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }

    /// Transforms every value, keeping keys.
    pub fn apply<F, V>(&self, mut callback: F) -> Map
    where
        F: FnMut(&Key, &Value) -> V,
        V: Into<Value>,
    {
        Self {
            pairs: self
                .pairs
                .iter()
                .map(|(key, value)| (key.clone(), callback(key, value).into()))
                .collect(),
        }
    }

    /// Builds a new map from the pairs `mapper` produces, first pair per key winning.
    pub fn map<F, P, PK, PV>(&self, mut mapper: F) -> Map
    where
        F: FnMut(&Key, &Value) -> P,
        P: IntoIterator<Item = (PK, PV)>,
        PK: Into<Key>,
        PV: Into<Value>,
    {
        let mut mapped = IndexMap::new();
        for (key, value) in &self.pairs {
            accumulate(&mut mapped, mapper(key, value));
        }
        Self { pairs: mapped }
    }

    /// Overlays the pairs of every iterable; later sources win.
    pub fn merge<I, J, K, V>(&self, iterables: I) -> Map
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let mut merged = self.clone();
        merged.add(iterables);
        merged
    }

    /// Materializes the other operands of a set operation, `None` when the
    /// operation must short-circuit to an empty result.
    fn set_operands<I, J, K, V>(&self, iterables: I) -> Option<Vec<IndexMap<Key, Value>>>
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        if self.pairs.is_empty() {
            return None;
        }
        let others = iterable::to_arrays(iterables);
        (!others.is_empty()).then_some(others)
    }

    /// Keeps the pairs whose key maps to a value with the same text form in
    /// every iterable.
    pub fn intersect<I, J, K, V>(&self, iterables: I) -> Map
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let Some(others) = self.set_operands(iterables) else {
            return Self::new();
        };

        self.filter(|key, value| {
            let text = value.to_text();
            others
                .iter()
                .all(|other| other.get(key).is_some_and(|theirs| theirs.to_text() == text))
        })
    }

    /// Keeps the pairs whose key maps to an equal value in every iterable,
    /// values compared with `comparator`.
    pub fn uintersect<F, I, J, K, V>(&self, mut comparator: F, iterables: I) -> Map
    where
        F: FnMut(&Value, &Value) -> Ordering,
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let Some(others) = self.set_operands(iterables) else {
            return Self::new();
        };

        self.filter(|key, value| {
            others.iter().all(|other| {
                other
                    .get(key)
                    .is_some_and(|theirs| comparator(value, theirs) == Ordering::Equal)
            })
        })
    }

    /// Keeps the pairs whose key is present in every iterable.
    pub fn intersect_keys<I, J, K, V>(&self, iterables: I) -> Map
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let Some(others) = self.set_operands(iterables) else {
            return Self::new();
        };

        self.filter(|key, _| others.iter().all(|other| other.contains_key(key)))
    }

    /// Keeps the pairs whose key matches a key of every iterable according
    /// to `comparator`.
    pub fn uintersect_keys<F, I, J, K, V>(&self, mut comparator: F, iterables: I) -> Map
    where
        F: FnMut(&Key, &Key) -> Ordering,
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let Some(others) = self.set_operands(iterables) else {
            return Self::new();
        };

        self.filter(|key, _| {
            others.iter().all(|other| {
                other
                    .keys()
                    .any(|theirs| comparator(key, theirs) == Ordering::Equal)
            })
        })
    }

    /// Drops the pairs whose key maps to a value with the same text form in
    /// any iterable.
    pub fn diff<I, J, K, V>(&self, iterables: I) -> Map
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let Some(others) = self.set_operands(iterables) else {
            return Self::new();
        };

        self.filter(|key, value| {
            let text = value.to_text();
            !others
                .iter()
                .any(|other| other.get(key).is_some_and(|theirs| theirs.to_text() == text))
        })
    }

    /// Drops the pairs whose key maps to an equal value in any iterable,
    /// values compared with `comparator`.
    pub fn udiff<F, I, J, K, V>(&self, mut comparator: F, iterables: I) -> Map
    where
        F: FnMut(&Value, &Value) -> Ordering,
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let Some(others) = self.set_operands(iterables) else {
            return Self::new();
        };

        self.filter(|key, value| {
            !others.iter().any(|other| {
                other
                    .get(key)
                    .is_some_and(|theirs| comparator(value, theirs) == Ordering::Equal)
            })
        })
    }

    /// Drops the pairs whose key is present in any iterable.
    pub fn diff_keys<I, J, K, V>(&self, iterables: I) -> Map
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let Some(others) = self.set_operands(iterables) else {
            return Self::new();
        };

        self.filter(|key, _| !others.iter().any(|other| other.contains_key(key)))
    }

    /// Drops the pairs whose key matches a key of any iterable according to
    /// `comparator`.
    pub fn udiff_keys<F, I, J, K, V>(&self, mut comparator: F, iterables: I) -> Map
    where
        F: FnMut(&Key, &Key) -> Ordering,
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let Some(others) = self.set_operands(iterables) else {
            return Self::new();
        };

        self.filter(|key, _| {
            !others.iter().any(|other| {
                other
                    .keys()
                    .any(|theirs| comparator(key, theirs) == Ordering::Equal)
            })
        })
    }

    fn sorted_by<F>(&self, mut comparator: F, reverse: bool) -> Map
    where
        F: FnMut(&Key, &Value, &Key, &Value) -> Ordering,
    {
        let pairs: Vec<(Key, Value)> = self.pairs.clone().into_iter().collect();
        let sorted = compare::sort_stable(pairs, |(ka, va), (kb, vb)| {
            comparator(ka, va, kb, vb)
        });
        let pairs = if reverse {
            sorted.into_iter().rev().collect()
        } else {
            sorted.into_iter().collect()
        };
        Self { pairs }
    }

    /// Sorts the pairs by value, descending if `reverse`.
    #[must_use]
    pub fn sort(&self, flags: SortFlags, reverse: bool) -> Map {
        if self.pairs.is_empty() {
            return Self::new();
        }
        self.sorted_by(|_, a, _, b| flags.compare(a, b), reverse)
    }

    /// Sorts the pairs by value with `comparator`.
    pub fn usort<F>(&self, mut comparator: F) -> Map
    where
        F: FnMut(&Value, &Value) -> Ordering,
    {
        if self.pairs.is_empty() {
            return Self::new();
        }
        self.sorted_by(|_, a, _, b| comparator(a, b), false)
    }

    /// Sorts the pairs by key, descending if `reverse`.
    #[must_use]
    pub fn ksort(&self, flags: SortFlags, reverse: bool) -> Map {
        if self.pairs.is_empty() {
            return Self::new();
        }
        self.sorted_by(
            |a, _, b, _| flags.compare(&a.to_value(), &b.to_value()),
            reverse,
        )
    }

    /// Sorts the pairs by key with `comparator`.
    pub fn uksort<F>(&self, mut comparator: F) -> Map
    where
        F: FnMut(&Key, &Key) -> Ordering,
    {
        if self.pairs.is_empty() {
            return Self::new();
        }
        self.sorted_by(|a, _, b, _| comparator(a, b), false)
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.pairs.len() == other.pairs.len() && self.pairs.iter().eq(other.pairs.iter())
    }
}

impl<K: Into<Key>> Index<K> for Map {
    type Output = Value;

    /// Returns `Value::Null` for a key that does not exist.
    fn index(&self, key: K) -> &Value {
        self.pairs.get(&key.into()).unwrap_or(&NULL)
    }
}

impl<K: Into<Key>> IndexMut<K> for Map {
    /// Inserts `Value::Null` under a key that does not exist yet.
    fn index_mut(&mut self, key: K) -> &mut Value {
        self.pairs.entry(key.into()).or_insert(Value::Null)
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::create(iter)
    }
}

impl<K: Into<Key>, V: Into<Value>> Extend<(K, V)> for Map {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.pairs.insert(key.into(), value.into());
        }
    }
}

/// Keys the values by their position.
impl From<Collection> for Map {
    fn from(collection: Collection) -> Self {
        collection.into_iter().enumerate().collect()
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Record(map.pairs)
    }
}
