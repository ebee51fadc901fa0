use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, Mul};
use std::borrow::Cow;

use indexmap::IndexMap;

use crate::compare;

/// A map key: either an integer or a string.
///
/// String keys that spell a canonical decimal integer (`"8"`, `"-15"`, but not
/// `"08"`, `"-0"` or `"1.5"`) are stored as integers, so `Key::from("8")` and
/// `Key::from(8)` address the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    /// Converts a scalar value into a key.
    ///
    /// Booleans become `0`/`1`, floats are truncated, `Null` becomes the empty
    /// string and strings are normalized. Lists and records cannot be keys.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_value(value: &Value) -> Option<Key> {
        match value {
            Value::Null => Some(Key::Str(String::new())),
            Value::Bool(b) => Some(Key::Int(i64::from(*b))),
            Value::Int(i) => Some(Key::Int(*i)),
            Value::Float(f) if f.is_finite() => Some(Key::Int(f.trunc() as i64)),
            Value::Float(_) => Some(Key::Int(0)),
            Value::Str(s) => Some(Key::from(s.as_str())),
            Value::List(_) | Value::Record(_) => None,
        }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Key::Int(i) => Value::Int(*i),
            Key::Str(s) => Value::Str(s.clone()),
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(i) => Some(*i),
            Key::Str(_) => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Int(_) => None,
            Key::Str(s) => Some(s.as_str()),
        }
    }
}

/// Parses strings of the form `0`, `[1-9][0-9]*` or `-[1-9][0-9]*` that fit an `i64`.
fn canonical_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.starts_with('0') && (digits.len() > 1 || digits.len() != s.len()) {
        return None;
    }
    s.parse().ok()
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        canonical_int(s).map_or_else(|| Key::Str(s.to_owned()), Key::Int)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        canonical_int(&s).map_or(Key::Str(s), Key::Int)
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Key::from(s.as_str())
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Key::Int(i64::from(b))
    }
}

macro_rules! key_from_lossless_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Key {
            fn from(i: $t) -> Self {
                Key::Int(i64::from(i))
            }
        })*
    };
}

key_from_lossless_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Int(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{i}"),
            Key::Str(s) => f.write_str(s),
        }
    }
}

/// A number produced by numeric coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub(crate) fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl Add for Number {
    type Output = Number;

    fn add(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_add(b)
                .map_or_else(|| Number::Float(self.as_f64() + rhs.as_f64()), Number::Int),
            _ => Number::Float(self.as_f64() + rhs.as_f64()),
        }
    }
}

impl Mul for Number {
    type Output = Number;

    fn mul(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_mul(b)
                .map_or_else(|| Number::Float(self.as_f64() * rhs.as_f64()), Number::Int),
            _ => Number::Float(self.as_f64() * rhs.as_f64()),
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => Value::Int(i),
            Number::Float(f) => Value::Float(f),
        }
    }
}

/// Length of the longest prefix of `s` that reads as a decimal number
/// (`[+-]?(digits[.digits?]|.digits)([eE][+-]?digits)?`), or 0.
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(i);
    let mut end = int_end;
    if bytes.get(int_end) == Some(&b'.') {
        let frac_end = digits_from(int_end + 1);
        if frac_end > int_end + 1 || int_end > i {
            end = frac_end;
        }
    }
    if end == i {
        return 0;
    }

    i = end;
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(i + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(i + 1 + sign);
        if exp_end > i + 1 + sign {
            end = exp_end;
        }
    }
    end
}

fn number_from_literal(literal: &str) -> Option<Number> {
    let integral = literal
        .bytes()
        .all(|b| b.is_ascii_digit() || b == b'+' || b == b'-');
    if integral {
        if let Ok(i) = literal.parse::<i64>() {
            return Some(Number::Int(i));
        }
    }
    literal.parse::<f64>().ok().map(Number::Float)
}

fn is_numeric_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

/// Parses a numeric string, allowing surrounding whitespace.
pub(crate) fn parse_numeric(s: &str) -> Option<Number> {
    let trimmed = s.trim_matches(is_numeric_whitespace);
    let len = numeric_prefix_len(trimmed);
    if len == 0 || len != trimmed.len() {
        return None;
    }
    number_from_literal(trimmed)
}

/// Parses the leading numeric part of a string, 0 when there is none.
fn parse_numeric_prefix(s: &str) -> Number {
    let trimmed = s.trim_start_matches(is_numeric_whitespace);
    match numeric_prefix_len(trimmed) {
        0 => Number::Int(0),
        len => number_from_literal(&trimmed[..len]).unwrap_or(Number::Int(0)),
    }
}

/// Returned by index operators for absent entries.
pub(crate) static NULL: Value = Value::Null;

/// A dynamically typed value stored in a `Collection` or a `Map`.
///
/// `PartialEq` is strict: both the variant and the content must match, so
/// `Value::Int(1) != Value::Str("1".into())`. Use [`Value::loose_eq`] for
/// coercive equality.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Record(IndexMap<Key, Value>),
}

impl Value {
    /// Builds a `Value::List` from anything convertible into values.
    pub fn list<I, V>(items: I) -> Value
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Builds a `Value::Record` from key/value pairs; later duplicates overwrite earlier ones.
    pub fn record<I, K, V>(pairs: I) -> Value
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        Value::Record(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Looks up a named field of a record, or a position of a list.
    ///
    /// Scalars have no fields.
    #[must_use]
    pub fn field(&self, key: &Key) -> Option<&Value> {
        match (self, key) {
            (Value::Record(pairs), key) => pairs.get(key),
            (Value::List(items), Key::Int(i)) => usize::try_from(*i).ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Number of entries of a list or record, `None` for scalars.
    #[must_use]
    pub fn entry_count(&self) -> Option<usize> {
        match self {
            Value::List(items) => Some(items.len()),
            Value::Record(pairs) => Some(pairs.len()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !(s.is_empty() || s == "0"),
            Value::List(items) => !items.is_empty(),
            Value::Record(pairs) => !pairs.is_empty(),
        }
    }

    /// Converts the value to text.
    ///
    /// `Null` and `false` become `""`, `true` becomes `"1"`, integral floats
    /// have no fraction and lists and records become `"Array"`.
    ///
    /// Other floats use the shortest text that parses back to the same
    /// `f64`, not a 14 significant digit rounding: `0.1 + 0.2` renders as
    /// `"0.30000000000000004"`, not `"0.3"`. Set operations, `flip` and
    /// `implode` see that full text.
    #[must_use]
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::Null | Value::Bool(false) => Cow::Borrowed(""),
            Value::Bool(true) => Cow::Borrowed("1"),
            Value::Int(i) => Cow::Owned(i.to_string()),
            Value::Float(f) if f.is_nan() => Cow::Borrowed("NAN"),
            Value::Float(f) if f.is_infinite() => {
                Cow::Borrowed(if f.is_sign_positive() { "INF" } else { "-INF" })
            }
            Value::Float(f) => Cow::Owned(f.to_string()),
            Value::Str(s) => Cow::Borrowed(s.as_str()),
            Value::List(_) | Value::Record(_) => Cow::Borrowed("Array"),
        }
    }

    /// Numeric view of the value used by `sum` and `product`.
    ///
    /// Returns `None` for non-numeric strings, lists and records.
    #[must_use]
    pub fn to_number(&self) -> Option<Number> {
        match self {
            Value::Null => Some(Number::Int(0)),
            Value::Bool(b) => Some(Number::Int(i64::from(*b))),
            Value::Int(i) => Some(Number::Int(*i)),
            Value::Float(f) => Some(Number::Float(*f)),
            Value::Str(s) => parse_numeric(s),
            Value::List(_) | Value::Record(_) => None,
        }
    }

    /// Like [`Value::to_number`] but total: strings use their leading numeric
    /// part and containers become `0` or `1` depending on emptiness.
    #[must_use]
    pub fn to_number_lossy(&self) -> Number {
        match self {
            Value::Str(s) => parse_numeric_prefix(s),
            Value::List(_) | Value::Record(_) => Number::Int(i64::from(self.is_truthy())),
            _ => self.to_number().unwrap_or(Number::Int(0)),
        }
    }

    /// Coercive equality.
    ///
    /// Numbers and numeric strings compare by numeric value, other strings
    /// byte-wise, booleans and `null` by truthiness. Lists and records are
    /// equal when they hold the same keys with loosely equal values.
    #[must_use]
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(_) | Value::Record(_), Value::List(_) | Value::Record(_)) => {
                self.entry_count() == other.entry_count()
                    && self.entries().all(|(key, value)| {
                        other.field(&key).is_some_and(|theirs| value.loose_eq(theirs))
                    })
            }
            _ => compare::regular(self, other) == Some(Ordering::Equal),
        }
    }

    /// Standard three-way comparison, `None` when the values are not comparable.
    #[must_use]
    pub fn loose_cmp(&self, other: &Value) -> Option<Ordering> {
        compare::regular(self, other)
    }

    /// Keyed view over a list or record; empty for scalars.
    pub(crate) fn entries(&self) -> Box<dyn Iterator<Item = (Key, &Value)> + '_> {
        match self {
            Value::List(items) => Box::new(items.iter().enumerate().map(|(i, v)| (Key::from(i), v))),
            Value::Record(pairs) => Box::new(pairs.iter().map(|(k, v)| (k.clone(), v))),
            _ => Box::new(core::iter::empty()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a.len() == b.len() && a.iter().eq(b.iter()),
            (Value::List(_), Value::Record(_)) | (Value::Record(_), Value::List(_)) => {
                self.entry_count() == other.entry_count() && self.entries().eq(other.entries())
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! value_from_lossless_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(i: $t) -> Self {
                Value::Int(i64::from(i))
            }
        })*
    };
}

value_from_lossless_int!(i8, i16, i32, i64, u8, u16, u32);

#[allow(clippy::cast_precision_loss)]
impl From<u64> for Value {
    fn from(i: u64) -> Self {
        i64::try_from(i).map_or(Value::Float(i as f64), Value::Int)
    }
}

#[allow(clippy::cast_precision_loss)]
impl From<usize> for Value {
    fn from(i: usize) -> Self {
        i64::try_from(i).map_or(Value::Float(i as f64), Value::Int)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f64::from(f))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Int(i) => Value::Int(i),
            Key::Str(s) => Value::Str(s),
        }
    }
}

impl From<&Key> for Value {
    fn from(key: &Key) -> Self {
        key.to_value()
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::list(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<IndexMap<Key, Value>> for Value {
    fn from(pairs: IndexMap<Key, Value>) -> Self {
        Value::Record(pairs)
    }
}
