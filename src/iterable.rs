//! Materialization of arbitrary iterable inputs.
//!
//! Every function consumes its input exactly once, in production order. A
//! panicking iterator propagates unchanged.

use indexmap::IndexMap;

use crate::value::{Key, Value};

/// Collects an iterable into a list of values, in production order.
///
/// ```
/// use listmap::{iterable, Value};
///
/// let list = iterable::to_list((1..=3).map(|i| i * 10));
/// assert_eq!(list, vec![Value::Int(10), Value::Int(20), Value::Int(30)]);
/// ```
pub fn to_list<I, V>(iterable: I) -> Vec<Value>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    iterable.into_iter().map(Into::into).collect()
}

/// Applies [`to_list`] to every iterable of a list.
pub fn to_lists<I, J, V>(iterables: I) -> Vec<Vec<Value>>
where
    I: IntoIterator<Item = J>,
    J: IntoIterator<Item = V>,
    V: Into<Value>,
{
    iterables.into_iter().map(to_list).collect()
}

/// Collects key/value pairs, keeping keys.
///
/// When a key repeats, the later value wins but the entry keeps the position
/// of its first occurrence.
pub fn to_array<I, K, V>(pairs: I) -> IndexMap<Key, Value>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<Key>,
    V: Into<Value>,
{
    let mut array = IndexMap::new();
    for (key, value) in pairs {
        array.insert(key.into(), value.into());
    }
    array
}

/// Applies [`to_array`] to every iterable of a list.
pub fn to_arrays<I, J, K, V>(iterables: I) -> Vec<IndexMap<Key, Value>>
where
    I: IntoIterator<Item = J>,
    J: IntoIterator<Item = (K, V)>,
    K: Into<Key>,
    V: Into<Value>,
{
    iterables.into_iter().map(to_array).collect()
}
