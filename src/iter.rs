use crate::collection::Collection;
use crate::map::Map;
use crate::value::{Key, Value};

/// Iterator over the values of a `Collection`
///
/// This iterator implements `Clone`.
#[derive(Clone, Debug)]
pub struct Values<'a> {
    inner: core::slice::Iter<'a, Value>,
}

impl<'a> Values<'a> {
    pub(crate) fn new(values: &'a [Value]) -> Self {
        Self {
            inner: values.iter(),
        }
    }
}

impl<'a> Iterator for Values<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Values<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Values<'_> {}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Value;
    type IntoIter = Values<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator over the values of a `Collection`
#[derive(Debug)]
pub struct IntoValues {
    inner: std::vec::IntoIter<Value>,
}

impl Iterator for IntoValues {
    type Item = Value;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for IntoValues {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for IntoValues {}

impl IntoIterator for Collection {
    type Item = Value;
    type IntoIter = IntoValues;

    fn into_iter(self) -> Self::IntoIter {
        IntoValues {
            inner: self.into_vec().into_iter(),
        }
    }
}

/// Iterator over the key/value pairs of a `Map`, in map order
///
/// This iterator implements `Clone`.
#[derive(Clone, Debug)]
pub struct Pairs<'a> {
    inner: indexmap::map::Iter<'a, Key, Value>,
}

impl<'a> Pairs<'a> {
    pub(crate) fn new(inner: indexmap::map::Iter<'a, Key, Value>) -> Self {
        Self { inner }
    }
}

impl<'a> Iterator for Pairs<'a> {
    type Item = (&'a Key, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Pairs<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Pairs<'_> {}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a Key, &'a Value);
    type IntoIter = Pairs<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator over the key/value pairs of a `Map`
#[derive(Debug)]
pub struct IntoPairs {
    inner: indexmap::map::IntoIter<Key, Value>,
}

impl Iterator for IntoPairs {
    type Item = (Key, Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for IntoPairs {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for IntoPairs {}

impl IntoIterator for Map {
    type Item = (Key, Value);
    type IntoIter = IntoPairs;

    fn into_iter(self) -> Self::IntoIter {
        IntoPairs {
            inner: self.into_index_map().into_iter(),
        }
    }
}
