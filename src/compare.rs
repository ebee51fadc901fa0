//! Comparison modes used by `sort` and `ksort`.

use core::cmp::Ordering;

use crate::value::{parse_numeric, Value};

/// How values are ordered by `sort` and `ksort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Standard comparison: numbers and numeric strings numerically, other
    /// strings byte-wise, booleans and `null` by truthiness, lists and records
    /// by size and then entry by entry. Containers sort above scalars.
    #[default]
    Regular,
    /// Numeric comparison of every value (non-numeric strings use their
    /// leading numeric part, or 0).
    Numeric,
    /// Byte-wise comparison of the text form of every value.
    String,
    /// Comparison under the process locale. Only the "C" locale is
    /// supported, where this equals [`SortMode::String`].
    LocaleString,
    /// Natural order: runs of digits compare by numeric value, so `"img2"`
    /// sorts before `"img10"`.
    Natural,
}

/// A sort mode plus the case-insensitivity modifier.
///
/// ```
/// use listmap::{SortFlags, SortMode};
///
/// let flags = SortFlags::NATURAL.case_insensitive();
/// assert_eq!(flags.mode(), SortMode::Natural);
/// assert!(flags.is_case_insensitive());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortFlags {
    mode: SortMode,
    case_insensitive: bool,
}

impl SortFlags {
    pub const REGULAR: SortFlags = SortFlags::new(SortMode::Regular);
    pub const NUMERIC: SortFlags = SortFlags::new(SortMode::Numeric);
    pub const STRING: SortFlags = SortFlags::new(SortMode::String);
    pub const LOCALE_STRING: SortFlags = SortFlags::new(SortMode::LocaleString);
    pub const NATURAL: SortFlags = SortFlags::new(SortMode::Natural);

    #[must_use]
    pub const fn new(mode: SortMode) -> Self {
        Self {
            mode,
            case_insensitive: false,
        }
    }

    /// Folds ASCII case before comparing. Only affects the `String`,
    /// `LocaleString` and `Natural` modes.
    #[must_use]
    pub const fn case_insensitive(self) -> Self {
        Self {
            mode: self.mode,
            case_insensitive: true,
        }
    }

    #[must_use]
    pub fn mode(&self) -> SortMode {
        self.mode
    }

    #[must_use]
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Compares two values according to these flags.
    ///
    /// Values that cannot be ordered (NaN, records with different keys)
    /// compare as equal.
    #[must_use]
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        match self.mode {
            SortMode::Regular => regular(a, b).unwrap_or(Ordering::Equal),
            SortMode::Numeric => a
                .to_number_lossy()
                .compare(b.to_number_lossy())
                .unwrap_or(Ordering::Equal),
            SortMode::String | SortMode::LocaleString => {
                text(&a.to_text(), &b.to_text(), self.case_insensitive)
            }
            SortMode::Natural => natural(&a.to_text(), &b.to_text(), self.case_insensitive),
        }
    }
}

/// Stable merge sort that accepts comparators which are not a total order.
///
/// An inconsistent comparator yields some permutation of the input instead
/// of a panic.
pub(crate) fn sort_stable<T, F>(items: Vec<T>, mut compare: F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    merge_sort(items, &mut compare)
}

fn merge_sort<T, F>(mut items: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, compare);
    let right = merge_sort(right, compare);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        // Ties take from the left run.
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(l, r) == Ordering::Greater,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        merged.extend(if take_right { right.next() } else { left.next() });
    }
    merged
}

fn text(a: &str, b: &str, fold_case: bool) -> Ordering {
    if fold_case {
        a.bytes()
            .map(|c| c.to_ascii_lowercase())
            .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
    } else {
        a.cmp(b)
    }
}

fn digit_run_end(s: &[u8], start: usize) -> usize {
    s[start..]
        .iter()
        .position(|c| !c.is_ascii_digit())
        .map_or(s.len(), |offset| start + offset)
}

fn compare_digit_runs(a: &[u8], b: &[u8]) -> Ordering {
    let strip = |run: &[u8]| -> usize { run.iter().position(|&d| d != b'0').unwrap_or(run.len()) };
    let (a, b) = (&a[strip(a)..], &b[strip(b)..]);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Natural-order comparison; whitespace is skipped and digit runs compare by value.
#[allow(clippy::indexing_slicing)]
pub(crate) fn natural(a: &str, b: &str, fold_case: bool) -> Ordering {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);

    loop {
        while a.get(i).is_some_and(u8::is_ascii_whitespace) {
            i += 1;
        }
        while b.get(j).is_some_and(u8::is_ascii_whitespace) {
            j += 1;
        }

        match (a.get(i), b.get(j)) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let (end_a, end_b) = (digit_run_end(a, i), digit_run_end(b, j));
                match compare_digit_runs(&a[i..end_a], &b[j..end_b]) {
                    Ordering::Equal => (i, j) = (end_a, end_b),
                    ordering => return ordering,
                }
            }
            (Some(&ca), Some(&cb)) => {
                let (ca, cb) = if fold_case {
                    (ca.to_ascii_lowercase(), cb.to_ascii_lowercase())
                } else {
                    (ca, cb)
                };
                match ca.cmp(&cb) {
                    Ordering::Equal => (i, j) = (i + 1, j + 1),
                    ordering => return ordering,
                }
            }
        }
    }
}

/// The standard comparison behind `SortMode::Regular` and loose equality.
///
/// Returns `None` when the operands cannot be ordered.
pub(crate) fn regular(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Bool(_), _) | (_, Value::Bool(_)) => Some(a.is_truthy().cmp(&b.is_truthy())),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, Value::Str(s)) => Some("".cmp(s.as_str())),
        (Value::Str(s), Value::Null) => Some(s.as_str().cmp("")),
        (Value::Null, _) | (_, Value::Null) => Some(a.is_truthy().cmp(&b.is_truthy())),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            a.to_number()?.compare(b.to_number()?)
        }
        (Value::Str(x), Value::Str(y)) => match (parse_numeric(x), parse_numeric(y)) {
            (Some(m), Some(n)) => m.compare(n),
            _ => Some(x.cmp(y)),
        },
        (Value::Int(_) | Value::Float(_), Value::Str(s)) => match parse_numeric(s) {
            Some(n) => a.to_number()?.compare(n),
            None => Some(a.to_text().as_ref().cmp(s.as_str())),
        },
        (Value::Str(s), Value::Int(_) | Value::Float(_)) => match parse_numeric(s) {
            Some(n) => n.compare(b.to_number()?),
            None => Some(s.as_str().cmp(b.to_text().as_ref())),
        },
        (Value::List(_) | Value::Record(_), Value::List(_) | Value::Record(_)) => containers(a, b),
        (Value::List(_) | Value::Record(_), _) => Some(Ordering::Greater),
        (_, Value::List(_) | Value::Record(_)) => Some(Ordering::Less),
    }
}

fn containers(a: &Value, b: &Value) -> Option<Ordering> {
    match a.entry_count().cmp(&b.entry_count()) {
        Ordering::Equal => {}
        ordering => return Some(ordering),
    }
    for (key, value) in a.entries() {
        match regular(value, b.field(&key)?)? {
            Ordering::Equal => {}
            ordering => return Some(ordering),
        }
    }
    Some(Ordering::Equal)
}
