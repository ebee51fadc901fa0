use core::cmp::Ordering;
use core::ops::{Index, IndexMut, Range};
use std::borrow::Cow;
use std::collections::HashSet;

use indexmap::IndexMap;
use rand::seq::{index, SliceRandom};
use rand::Rng;

use crate::compare::{self, SortFlags};
use crate::error::{CollectionError, ValidIndexes};
use crate::iter::Values;
use crate::iterable;
use crate::map::{extract_column, Map};
use crate::value::{Key, Number, Value, NULL};

fn signed_len(len: usize) -> isize {
    isize::try_from(len).unwrap_or(isize::MAX)
}

/// Resolves a possibly negative offset against `len`, clamped to `0..=len`.
#[allow(clippy::cast_sign_loss)]
fn resolve_offset(len: usize, index: isize) -> usize {
    let len = signed_len(len);
    let offset = if index < 0 {
        len.saturating_add(index).max(0)
    } else {
        index.min(len)
    };
    offset as usize
}

/// Resolves slice/splice arguments to a range of positions.
///
/// A negative `index` counts from the end. A negative `length` stops that many
/// values before the end, `None` runs to the end.
fn resolve_range(len: usize, index: isize, length: Option<isize>) -> Range<usize> {
    let start = resolve_offset(len, index);
    let end = match length {
        None => len,
        Some(length) if length < 0 => resolve_offset(len, length).max(start),
        Some(length) => start.saturating_add(length.unsigned_abs()).min(len),
    };
    start..end
}

/// An ordered sequence of values indexed by `0..len`.
///
/// Removing values always closes the gap, so the indexes of a collection are
/// dense at all times. Transformations return new collections and leave the
/// receiver untouched; only the methods documented as mutating change it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    values: Vec<Value>,
}

impl Collection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection from any iterable, in iteration order.
    pub fn create<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            values: iterable::to_list(values),
        }
    }

    /// Creates a collection holding each of the given values.
    ///
    /// ```
    /// use listmap::{Collection, Value};
    ///
    /// let c = Collection::collect([vec!["foo"], vec!["bar", "baz"]]);
    /// assert_eq!(c.len(), 2);
    /// assert_eq!(c.get(1), Some(&Value::list(["bar", "baz"])));
    /// ```
    pub fn collect<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::create(values)
    }

    /// Creates a collection repeating `value` `count` times. A non-positive
    /// count yields an empty collection.
    pub fn fill(value: impl Into<Value>, count: isize) -> Self {
        match usize::try_from(count) {
            Ok(count) => Self {
                values: vec![value.into(); count],
            },
            Err(_) => Self::new(),
        }
    }

    /// Splits `string` on `delimiter`.
    ///
    /// A positive `limit` caps the number of parts, the last part holding the
    /// remainder; `0` is treated as `1`; a negative limit drops that many parts
    /// from the end. Pass `isize::MAX` for no limit.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::EmptyDelimiter` if `delimiter` is empty.
    pub fn explode(string: &str, delimiter: &str, limit: isize) -> Result<Self, CollectionError> {
        if delimiter.is_empty() {
            return Err(CollectionError::EmptyDelimiter);
        }

        let parts: Vec<&str> = if limit >= 0 {
            string.splitn(limit.unsigned_abs().max(1), delimiter).collect()
        } else {
            let mut parts: Vec<&str> = string.split(delimiter).collect();
            parts.truncate(parts.len().saturating_sub(limit.unsigned_abs()));
            parts
        };

        Ok(Self::create(parts))
    }

    /// Replaces all values.
    pub fn set_values<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.values = iterable::to_list(values);
    }

    /// Returns a copy of the values.
    #[must_use]
    pub fn to_array(&self) -> Vec<Value> {
        self.values.clone()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Value> {
        self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the indexes of the collection, always `0..len`.
    #[must_use]
    pub fn indexes(&self) -> Vec<usize> {
        (0..self.values.len()).collect()
    }

    #[must_use]
    pub fn iter(&self) -> Values<'_> {
        Values::new(&self.values)
    }

    #[must_use]
    pub fn has(&self, index: usize) -> bool {
        index < self.values.len()
    }

    /// Checks whether the collection contains `value`.
    ///
    /// `strict` selects strict equality (`PartialEq`) over [`Value::loose_eq`].
    pub fn contains(&self, value: impl Into<Value>, strict: bool) -> bool {
        self.find(value, strict).is_some()
    }

    /// Returns the index of the first occurrence of `value`.
    pub fn find(&self, value: impl Into<Value>, strict: bool) -> Option<usize> {
        let needle = value.into();
        self.values.iter().position(|value| {
            if strict {
                *value == needle
            } else {
                value.loose_eq(&needle)
            }
        })
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    #[must_use]
    pub fn first(&self) -> Option<&Value> {
        self.values.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Value> {
        self.values.last()
    }

    /// Returns the values in `index..index + length` as a new collection.
    ///
    /// Negative arguments are resolved against the end: `slice(-2, None)` takes
    /// the last two values, `slice(0, Some(-1))` all but the last one.
    #[must_use]
    pub fn slice(&self, index: isize, length: Option<isize>) -> Self {
        let range = resolve_range(self.values.len(), index, length);
        Self {
            values: self.values[range].to_vec(),
        }
    }

    /// Replaces the value at an existing index.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::IndexOutOfBounds` if `index` does not exist.
    pub fn replace(&mut self, index: usize, value: impl Into<Value>) -> Result<(), CollectionError> {
        let len = self.values.len();
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(CollectionError::IndexOutOfBounds {
                index,
                valid: ValidIndexes::for_len(len),
            }),
        }
    }

    /// Appends values to the end.
    pub fn push<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.values.extend(values.into_iter().map(Into::into));
    }

    /// Removes and returns the last value, `None` if the collection is empty.
    pub fn pop(&mut self) -> Option<Value> {
        self.values.pop()
    }

    /// Prepends values, keeping their order.
    pub fn unshift<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.insert(0, values);
    }

    /// Removes and returns the first value, `None` if the collection is empty.
    pub fn shift(&mut self) -> Option<Value> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.values.remove(0))
        }
    }

    /// Inserts values as one block before `index`.
    ///
    /// A negative index counts from the end; an index past the end appends.
    pub fn insert<I, V>(&mut self, index: isize, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = iterable::to_list(values);
        if values.is_empty() {
            return;
        }

        let offset = resolve_offset(self.values.len(), index);
        let tail = self.values.split_off(offset);
        self.values.extend(values);
        self.values.extend(tail);
    }

    /// Pads the collection to `|length|` values with `value`.
    ///
    /// A positive length pads at the end, a negative one at the start. Nothing
    /// happens if the collection is already long enough.
    pub fn pad(&mut self, length: isize, value: impl Into<Value>) {
        let target = length.unsigned_abs();
        if target <= self.values.len() {
            return;
        }

        let padding = vec![value.into(); target - self.values.len()];
        if length > 0 {
            self.values.extend(padding);
        } else {
            let tail = core::mem::replace(&mut self.values, padding);
            self.values.extend(tail);
        }
    }

    /// Removes the values at the given indexes and closes the gaps.
    ///
    /// Indexes refer to positions before the removal; duplicates and
    /// indexes that do not exist are ignored.
    pub fn remove<I>(&mut self, indexes: I)
    where
        I: IntoIterator<Item = usize>,
    {
        if self.values.is_empty() {
            return;
        }

        let len = self.values.len();
        let mut doomed: Vec<usize> = indexes.into_iter().filter(|&index| index < len).collect();
        if doomed.is_empty() {
            return;
        }
        doomed.sort_unstable();
        doomed.dedup();

        let mut position = 0;
        self.values.retain(|_| {
            let keep = doomed.binary_search(&position).is_err();
            position += 1;
            keep
        });
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Removes `index..index + length` and inserts `replacement` in its place.
    ///
    /// `index` and `length` follow the conventions of [`Collection::slice`].
    /// Returns the removed values.
    pub fn splice<I, V>(&mut self, index: isize, length: Option<isize>, replacement: I) -> Vec<Value>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let range = resolve_range(self.values.len(), index, length);
        self.values
            .splice(range, iterable::to_list(replacement))
            .collect()
    }

    /// Adds up all numeric values.
    ///
    /// Numeric strings count with their numeric value, booleans as `0`/`1`
    /// and `null` as `0`; other values are skipped. The result is an `Int`
    /// unless a float took part or the sum overflowed.
    #[must_use]
    pub fn sum(&self) -> Value {
        self.values
            .iter()
            .filter_map(Value::to_number)
            .fold(Number::Int(0), |sum, n| sum + n)
            .into()
    }

    /// Multiplies all numeric values, with the coercion rules of [`Collection::sum`].
    #[must_use]
    pub fn product(&self) -> Value {
        self.values
            .iter()
            .filter_map(Value::to_number)
            .fold(Number::Int(1), |product, n| product * n)
            .into()
    }

    /// Joins the text form of all values with `delimiter`.
    #[must_use]
    pub fn implode(&self, delimiter: &str) -> String {
        self.values
            .iter()
            .map(Value::to_text)
            .collect::<Vec<_>>()
            .join(delimiter)
    }

    pub fn reduce<A, F>(&self, reducer: F, initial: A) -> A
    where
        F: FnMut(A, &Value) -> A,
    {
        self.values.iter().fold(initial, reducer)
    }

    #[must_use]
    pub fn reverse(&self) -> Self {
        Self {
            values: self.values.iter().rev().cloned().collect(),
        }
    }

    /// Removes loosely equal duplicates, keeping first occurrences.
    ///
    /// Loose equality is not transitive, so every value is checked against
    /// each kept value: quadratic in the general case. Collections of plain
    /// integers take a hashed linear path.
    #[must_use]
    pub fn unique(&self) -> Self {
        if self.values.iter().all(|value| matches!(value, Value::Int(_))) {
            let mut seen = HashSet::with_capacity(self.values.len());
            return self
                .filter(|value| value.as_int().map_or(true, |i| seen.insert(i)));
        }

        let mut values: Vec<Value> = Vec::new();
        for value in &self.values {
            if !values.iter().any(|kept| kept.loose_eq(value)) {
                values.push(value.clone());
            }
        }
        Self { values }
    }

    #[must_use]
    pub fn shuffle(&self) -> Self {
        self.shuffle_with(&mut rand::thread_rng())
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut values = self.values.clone();
        values.shuffle(rng);
        Self { values }
    }

    /// Picks `count` values at random positions.
    ///
    /// A non-positive count yields an empty collection, a count of at least
    /// `len` a shuffled copy. Otherwise the picked values keep their
    /// relative order.
    #[must_use]
    pub fn random(&self, count: isize) -> Self {
        self.random_with(&mut rand::thread_rng(), count)
    }

    pub fn random_with<R: Rng + ?Sized>(&self, rng: &mut R, count: isize) -> Self {
        let count = match usize::try_from(count) {
            Ok(0) | Err(_) => return Self::new(),
            Ok(count) if count >= self.values.len() => return self.shuffle_with(rng),
            Ok(count) => count,
        };

        let mut picked = index::sample(rng, self.values.len(), count).into_vec();
        picked.sort_unstable();
        Self {
            values: picked.into_iter().map(|i| self.values[i].clone()).collect(),
        }
    }

    /// Extracts the `key` field of every value that has one.
    pub fn column(&self, key: impl Into<Key>) -> Self {
        let key = key.into();
        Self {
            values: self
                .values
                .iter()
                .filter_map(|value| value.field(&key))
                .cloned()
                .collect(),
        }
    }

    /// Builds a map from the `value_key` field of every value, keyed by its
    /// `index_key` field.
    ///
    /// Values without `value_key` are skipped; values without a usable
    /// `index_key` get the next free integer key. Later duplicates win.
    pub fn map_column(&self, index_key: impl Into<Key>, value_key: impl Into<Key>) -> Map {
        Map::from_index_map(extract_column(
            self.values.iter(),
            &value_key.into(),
            Some(&index_key.into()),
        ))
    }

    /// Keeps the values for which `predicate` returns `true`.
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&Value) -> bool,
    {
        Self {
            values: self
                .values
                .iter()
                .filter(|value| predicate(*value))
                .cloned()
                .collect(),
        }
    }

    /// Transforms every value.
    pub fn apply<F, V>(&self, callback: F) -> Self
    where
        F: FnMut(&Value) -> V,
        V: Into<Value>,
    {
        self.values.iter().map(callback).collect()
    }

    /// Builds a map keyed by `mapper(value)`. Later values win on duplicate keys.
    ///
    /// ```
    /// use listmap::Collection;
    ///
    /// let c = Collection::create(["foo", "bar"]);
    /// let map = c.map(|value| format!("key.{value}"));
    /// assert_eq!(map.get("key.bar").and_then(|v| v.as_str()), Some("bar"));
    /// ```
    pub fn map<F, K>(&self, mut mapper: F) -> Map
    where
        F: FnMut(&Value) -> K,
        K: Into<Key>,
    {
        let mut pairs = IndexMap::with_capacity(self.values.len());
        for value in &self.values {
            pairs.insert(mapper(value).into(), value.clone());
        }
        Map::from_index_map(pairs)
    }

    /// Appends the values of every iterable, in argument order.
    pub fn merge<I, J, V>(&self, iterables: I) -> Self
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut values = self.values.clone();
        for list in iterable::to_lists(iterables) {
            values.extend(list);
        }
        Self { values }
    }

    /// Materializes the other operands of a set operation, `None` when the
    /// operation must short-circuit to an empty result.
    fn set_operands<I, J, V>(&self, iterables: I) -> Option<Vec<Vec<Value>>>
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if self.values.is_empty() {
            return None;
        }
        let others = iterable::to_lists(iterables);
        (!others.is_empty()).then_some(others)
    }

    fn texts(lists: &[Vec<Value>]) -> Vec<HashSet<Cow<'_, str>>> {
        lists
            .iter()
            .map(|list| list.iter().map(Value::to_text).collect())
            .collect()
    }

    /// Keeps the values present in every iterable, comparing text forms.
    ///
    /// Returns an empty collection if no iterables are given.
    pub fn intersect<I, J, V>(&self, iterables: I) -> Self
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let Some(others) = self.set_operands(iterables) else {
            return Self::new();
        };
        let texts = Self::texts(&others);

        self.filter(|value| {
            let text = value.to_text();
            texts.iter().all(|set| set.contains(text.as_ref()))
        })
    }

    /// Keeps the values present in every iterable, according to `comparator`.
    pub fn uintersect<F, I, J, V>(&self, mut comparator: F, iterables: I) -> Self
    where
        F: FnMut(&Value, &Value) -> Ordering,
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let Some(others) = self.set_operands(iterables) else {
            return Self::new();
        };

        self.filter(|value| {
            others.iter().all(|list| {
                list.iter()
                    .any(|other| comparator(value, other) == Ordering::Equal)
            })
        })
    }

    /// Keeps the values absent from all iterables, comparing text forms.
    ///
    /// Returns an empty collection if no iterables are given.
    pub fn diff<I, J, V>(&self, iterables: I) -> Self
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let Some(others) = self.set_operands(iterables) else {
            return Self::new();
        };
        let texts = Self::texts(&others);

        self.filter(|value| {
            let text = value.to_text();
            !texts.iter().any(|set| set.contains(text.as_ref()))
        })
    }

    /// Keeps the values absent from all iterables, according to `comparator`.
    pub fn udiff<F, I, J, V>(&self, mut comparator: F, iterables: I) -> Self
    where
        F: FnMut(&Value, &Value) -> Ordering,
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let Some(others) = self.set_operands(iterables) else {
            return Self::new();
        };

        self.filter(|value| {
            !others.iter().any(|list| {
                list.iter()
                    .any(|other| comparator(value, other) == Ordering::Equal)
            })
        })
    }

    /// Returns the values sorted according to `flags`, descending if `reverse`.
    #[must_use]
    pub fn sort(&self, flags: SortFlags, reverse: bool) -> Self {
        if self.values.is_empty() {
            return Self::new();
        }

        let mut values = compare::sort_stable(self.values.clone(), |a, b| flags.compare(a, b));
        if reverse {
            values.reverse();
        }
        Self { values }
    }

    /// Returns the values sorted by `comparator`.
    pub fn usort<F>(&self, comparator: F) -> Self
    where
        F: FnMut(&Value, &Value) -> Ordering,
    {
        if self.values.is_empty() {
            return Self::new();
        }

        Self {
            values: compare::sort_stable(self.values.clone(), comparator),
        }
    }

    /// Splits the collection into chunks of `size` values; the last chunk may
    /// be shorter. A zero size yields no chunks.
    #[must_use]
    pub fn chunk(&self, size: usize) -> Vec<Collection> {
        if size == 0 {
            return Vec::new();
        }

        self.values
            .chunks(size)
            .map(|chunk| Self {
                values: chunk.to_vec(),
            })
            .collect()
    }

    /// Splits the collection into at most `number` parts of equal size.
    #[must_use]
    pub fn split(&self, number: usize) -> Vec<Collection> {
        if self.values.is_empty() || number == 0 {
            return Vec::new();
        }

        self.chunk(self.values.len().div_ceil(number))
    }
}

impl Index<usize> for Collection {
    type Output = Value;

    /// Returns `Value::Null` for an index that does not exist.
    fn index(&self, index: usize) -> &Value {
        self.values.get(index).unwrap_or(&NULL)
    }
}

impl IndexMut<usize> for Collection {
    /// # Panics
    ///
    /// Panics if `index` does not exist, with the message of
    /// `CollectionError::IndexOutOfBounds`.
    fn index_mut(&mut self, index: usize) -> &mut Value {
        let len = self.values.len();
        match self.values.get_mut(index) {
            Some(value) => value,
            None => panic!(
                "{}",
                CollectionError::IndexOutOfBounds {
                    index,
                    valid: ValidIndexes::for_len(len),
                }
            ),
        }
    }
}

impl<V: Into<Value>> FromIterator<V> for Collection {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self::create(iter)
    }
}

impl<V: Into<Value>> Extend<V> for Collection {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        self.push(iter);
    }
}

/// Drops the keys of the map.
impl From<Map> for Collection {
    fn from(map: Map) -> Self {
        map.into_iter().map(|(_, value)| value).collect()
    }
}

impl From<Collection> for Value {
    fn from(collection: Collection) -> Self {
        Value::List(collection.values)
    }
}
