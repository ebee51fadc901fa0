use std::cmp::Ordering;

use listmap::{Collection, CollectionError, Key, Map, SortFlags, Value};
use rand::rngs::StdRng;
use rand::SeedableRng;

macro_rules! map {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let pairs: Vec<(Key, Value)> = vec![$((Key::from($key), Value::from($value))),*];
        Map::create(pairs)
    }};
}

fn example() -> Map {
    map! {"foo" => "bar", "baz" => "qux", 123 => 456}
}

fn indexed<I, V>(values: I) -> Map
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Map::from(Collection::create(values))
}

fn reversed(map: &Map) -> Map {
    map.clone().into_iter().rev().collect()
}

fn no_iterables() -> Vec<Vec<(Key, Value)>> {
    Vec::new()
}

fn never_compare_values(_: &Value, _: &Value) -> Ordering {
    panic!("comparator must not be called")
}

fn never_compare_keys(_: &Key, _: &Key) -> Ordering {
    panic!("comparator must not be called")
}

fn id(value: &Value) -> Option<i64> {
    value.field(&Key::from("id")).and_then(Value::as_int)
}

fn by_id(a: &Value, b: &Value) -> Ordering {
    id(a).cmp(&id(b))
}

fn by_trimmed_key(a: &Key, b: &Key) -> Ordering {
    a.to_string().trim().cmp(b.to_string().trim())
}

fn record(id: i64, value: &str) -> Value {
    Value::record([("id", Value::Int(id)), ("value", Value::from(value))])
}

#[test]
fn test_create_and_set_pairs() {
    assert!(Map::new().is_empty());
    assert!(Map::create(Vec::<(Key, Value)>::new()).is_empty());

    let pairs = vec![("foo", Value::from("bar")), ("baz", Value::record([("a", 1)]))];
    let created = Map::create(pairs.clone());
    assert_eq!(created.len(), 2);
    assert_eq!(created.get("baz"), Some(&Value::record([("a", 1)])));

    let mut map = Map::new();
    map.set_pairs(pairs);
    assert_eq!(map, created);

    let from_map = Map::create(created.clone());
    assert_eq!(from_map, created);
}

#[test]
fn test_create_duplicate_keys_keep_first_position() {
    let map = Map::create([("a", 1), ("b", 2), ("a", 3)]);
    assert_eq!(map, map! {"a" => 3, "b" => 2});
}

#[test]
fn test_build() {
    let built = Map::build(Vec::<(Key, Value)>::new(), |_, _| -> Vec<(Key, Value)> {
        panic!("mapper must not be called")
    });
    assert!(built.is_empty());

    let source = map! {123 => "foo", 456 => "bar", 789 => "baz"};

    let built = Map::build(source.clone(), |key, value| {
        vec![(format!("key.{key}"), format!("value.{value}"))]
    });
    assert_eq!(
        built,
        map! {"key.123" => "value.foo", "key.456" => "value.bar", "key.789" => "value.baz"}
    );

    let built = Map::build(source, |key, value| {
        let target = if key.as_int() == Some(123) { "a" } else { "duplicate" };
        vec![(target, value.clone())]
    });
    assert_eq!(built, map! {"a" => "foo", "duplicate" => "bar"});
}

#[test]
fn test_combine() {
    assert!(Map::combine(Vec::<Key>::new(), Vec::<Value>::new())
        .unwrap()
        .is_empty());
    assert_eq!(
        Map::combine(["foo", "bar"], ["baz", "qux"]).unwrap(),
        map! {"foo" => "baz", "bar" => "qux"}
    );
    assert_eq!(
        Map::combine([123, 456], [789, 101]).unwrap(),
        map! {123 => 789, 456 => 101}
    );

    let keys = Collection::collect(["one", "two"]);
    let values = Collection::collect([1, 2]);
    assert_eq!(
        Map::combine(keys.iter().filter_map(Key::from_value), values).unwrap(),
        map! {"one" => 1, "two" => 2}
    );
}

#[test]
fn test_combine_length_mismatch() {
    assert_eq!(
        Map::combine(["a"], [1, 2]),
        Err(CollectionError::LengthMismatch { keys: 1, values: 2 })
    );
}

#[test]
fn test_has() {
    let map = example();

    assert!(map.has("foo"));
    assert!(map.has("baz"));
    assert!(map.has(123));
    assert!(map.has("123"));
    assert!(!map.has(" foo"));
    assert!(!map.has("baz "));
    assert!(!map.has(" 123"));
    assert!(!map.has("123 "));
}

#[test]
fn test_get() {
    let mut map = example();
    map.set("null", Value::Null);

    assert_eq!(map.get(""), None);
    assert_eq!(map.get("foo"), Some(&Value::from("bar")));
    assert_eq!(map.get(123), Some(&Value::Int(456)));
    assert_eq!(map.get("null"), Some(&Value::Null));
    assert!(map.has("null"));
    assert_eq!(map.get("quux"), None);
    assert_eq!(map.get(0), None);
    assert_eq!(map.get(111), None);
}

#[test]
fn test_contains_and_find() {
    let map = example();

    assert_eq!(map.find("bar", true), Some(&Key::from("foo")));
    assert_eq!(map.find("qux", true), Some(&Key::from("baz")));
    assert_eq!(map.find(456, true), Some(&Key::Int(123)));
    assert_eq!(map.find("456", true), None);
    assert_eq!(map.find("456", false), Some(&Key::Int(123)));
    assert_eq!(map.find("quux", true), None);
    assert_eq!(map.find("quux", false), None);
    assert!(map.contains("456", false));
    assert!(!map.contains("456", true));

    let records = indexed([Value::record([("key", 111)]), Value::record([("key", 123)])]);
    assert_eq!(records.find(Value::record([("key", 123)]), true), Some(&Key::Int(1)));
    assert_eq!(records.find(Value::record([("key", "123")]), true), None);
    assert_eq!(records.find(Value::record([("key", "123")]), false), Some(&Key::Int(1)));
}

#[test]
fn test_values_and_keys() {
    let map = example();

    assert_eq!(
        map.values().to_array(),
        vec![Value::from("bar"), Value::from("qux"), Value::Int(456)]
    );
    assert_eq!(
        map.keys().to_array(),
        vec![Value::from("foo"), Value::from("baz"), Value::Int(123)]
    );
    assert_eq!(map.keys().indexes(), vec![0, 1, 2]);

    assert!(Map::new().values().is_empty());
    assert!(Map::new().keys().is_empty());
}

#[test]
fn test_set() {
    let mut map = Map::new();

    map.set("foo", "bar");
    map.set("null", Value::Null);
    map.set("123", "456");

    assert_eq!(map, map! {"foo" => "bar", "null" => Value::Null, 123 => "456"});
}

#[test]
fn test_add() {
    let mut map = example();

    map.add([map! {"foo" => "new bar", "quux" => "corge"}]);
    map.add([map! {123 => 445_566}, map! {789 => 101}]);
    map.add(no_iterables());

    assert_eq!(
        map,
        map! {
            "foo" => "new bar",
            "baz" => "qux",
            123 => 445_566,
            "quux" => "corge",
            789 => 101,
        }
    );
}

#[test]
fn test_fill() {
    let mut map = Map::new();

    map.fill(["foo", "bar"], "");
    map.fill(["bar", "baz"], 123);

    assert_eq!(map, map! {"foo" => "", "bar" => 123, "baz" => 123});
}

#[test]
fn test_remove() {
    let mut map = example();

    map.remove(["foo"]);
    assert_eq!(map, map! {"baz" => "qux", 123 => 456});

    map.remove(["bar"]);
    map.remove([999]);
    map.remove(Vec::<Key>::new());
    assert_eq!(map, map! {"baz" => "qux", 123 => 456});

    map.remove([Key::from("baz"), Key::Int(123), Key::from("nonexistent")]);
    assert!(map.is_empty());
}

#[test]
fn test_clear() {
    let mut map = example();
    map.clear();
    assert!(map.is_empty());
}

#[test]
fn test_reduce() {
    let reducer = |acc: Option<String>, key: &Key, value: &Value| {
        Some(match acc {
            Some(acc) => format!("{acc};{key}:{value}"),
            None => format!("{key}:{value}"),
        })
    };

    assert_eq!(Map::new().reduce(reducer, None), None);
    assert_eq!(
        Map::new().reduce(reducer, Some("foo".to_string())),
        Some("foo".to_string())
    );
    assert_eq!(
        map! {"foo" => "bar", "baz" => "qux"}.reduce(reducer, None),
        Some("foo:bar;baz:qux".to_string())
    );
    assert_eq!(
        map! {"a" => "b", "c" => "d"}.reduce(reducer, Some("test".to_string())),
        Some("test;a:b;c:d".to_string())
    );
}

#[test]
fn test_flip() {
    let map = example();
    let flipped = map.flip();

    assert_eq!(flipped, map! {"bar" => "foo", "qux" => "baz", 456 => 123});
    assert_eq!(map, example());
}

#[test]
fn test_flip_last_write_wins() {
    let flipped = map! {"a" => 1, "b" => "1", "c" => 2}.flip();
    assert_eq!(flipped, map! {1 => "b", 2 => "c"});
}

#[test]
fn test_shuffle_keeps_keys_in_place() {
    let map = indexed(0..30).apply(|key, _| format!("value {key}"));
    let mut rng = StdRng::seed_from_u64(99);

    let shuffled = map.shuffle_with(&mut rng);
    assert_eq!(shuffled.keys(), map.keys());
    for value in map.values().iter() {
        assert!(shuffled.contains(value, true));
    }

    let shuffled = example().shuffle();
    assert!(shuffled.has("foo"));
    assert!(shuffled.has("baz"));
    assert!(shuffled.has(123));
    assert_eq!(shuffled.len(), 3);
}

#[test]
fn test_column() {
    let map = map! {
        "record" => Value::record([("foo", "bar"), ("baz", "qux")]),
        "other" => Value::record([("foo", "123"), ("baz", "456")]),
        "blank" => Value::record(Vec::<(Key, Value)>::new()),
        "string" => "scalar",
        "int" => 123_456,
    };

    assert_eq!(
        map.column("foo", None),
        map! {"record" => "bar", "other" => "123"}
    );
    assert_eq!(
        map.column("foo", Some(Key::from("baz"))),
        map! {"qux" => "bar", 456 => "123"}
    );
    assert!(map.column("nonexistent", None).is_empty());
}

#[test]
fn test_filter() {
    let map = example();

    let filtered = map.filter(|key, value| {
        assert!(["bar", "qux", "456"].contains(&value.to_text().as_ref()));
        *key == Key::from("foo") || *key == Key::Int(123)
    });

    assert_eq!(filtered, map! {"foo" => "bar", 123 => 456});
}

#[test]
fn test_apply() {
    let applied = example().apply(|key, value| format!("{key}{value}"));

    assert_eq!(
        applied,
        map! {"foo" => "foobar", "baz" => "bazqux", 123 => "123456"}
    );
}

#[test]
fn test_map() {
    let mapped = example().map(|key, value| vec![(format!("{key}-2"), format!("{value}-2"))]);

    assert_eq!(
        mapped,
        map! {"foo-2" => "bar-2", "baz-2" => "qux-2", "123-2" => "456-2"}
    );
}

#[test]
fn test_map_first_write_wins() {
    let mapped = map! {"a" => 1, "b" => 2}.map(|_, value| {
        vec![("shared", value.clone()), ("shared", Value::Null)]
    });

    assert_eq!(mapped, map! {"shared" => 1});
}

#[test]
fn test_merge() {
    assert!(Map::new().merge(no_iterables()).is_empty());
    assert_eq!(
        Map::new().merge([map! {"foo" => 123, "bar" => 456}]),
        map! {"foo" => 123, "bar" => 456}
    );

    let map = map! {"foo" => 123, "bar" => 456, "baz" => 789};
    assert_eq!(map.merge(no_iterables()), map);
    assert_eq!(
        map.merge([map! {"foo" => 222, "qux" => 888}]),
        map! {"foo" => 222, "bar" => 456, "baz" => 789, "qux" => 888}
    );
    assert_eq!(
        map.merge([
            map! {"foo" => 222, "qux" => 888},
            map! {"bar" => 555, "qux" => 999},
        ]),
        map! {"foo" => 222, "bar" => 555, "baz" => 789, "qux" => 999}
    );
    assert_eq!(map, map! {"foo" => 123, "bar" => 456, "baz" => 789});
}

#[test]
fn test_intersect() {
    let map = map! {"a" => "foo", "b" => "bar", "c" => "baz"};

    assert_eq!(
        map.intersect([map! {"a" => "foo", "b" => "baz", "c" => "baz", "d" => "foo"}]),
        map! {"a" => "foo", "c" => "baz"}
    );
    assert_eq!(
        map.intersect([
            map! {"a" => "lorem", "b" => "bar", "c" => "ipsum"},
            map! {"a" => "dolor", "b" => "bar", "c" => "bar"},
        ]),
        map! {"b" => "bar"}
    );
}

#[test]
fn test_uintersect() {
    let map = map! {
        "a" => record(1, "one"),
        "b" => record(2, "two"),
        "c" => record(3, "three"),
        "x" => record(1, "one"),
    };

    let intersection = map.uintersect(
        by_id,
        [
            map! {"b" => record(2, "bar"), "c" => record(4, "qux")},
            map! {"x" => record(0, "zero"), "b" => record(2, "also two"), "e" => record(5, "quux")},
        ],
    );

    assert_eq!(intersection, map! {"b" => record(2, "two")});
}

#[test]
fn test_intersect_keys() {
    let map = map! {"foo" => "bar", "baz" => "qux", "quux" => "quuz"};

    assert_eq!(
        map.intersect_keys([map! {"lorem" => "ipsum", "baz" => "dolor", "quux" => "sit", "amet" => 123}]),
        map! {"baz" => "qux", "quux" => "quuz"}
    );
    assert_eq!(
        map.intersect_keys([
            map! {"lorem" => "ipsum", "baz" => "dolor", "quux" => "sit", "amet" => 123},
            map! {"a" => "b", "c" => "d", "foo" => "e", "baz" => "qux"},
        ]),
        map! {"baz" => "qux"}
    );
}

#[test]
fn test_uintersect_keys() {
    let map = map! {"foo" => "bar", "baz" => "qux", "quux" => "quuz"};

    let intersection = map.uintersect_keys(
        by_trimmed_key,
        [
            map! {" foo " => 123, " bar " => 456, " baz " => 789},
            map! {" baz  " => "test", "  foo " => "dummy", "quux " => "example"},
        ],
    );

    assert_eq!(intersection, map! {"foo" => "bar", "baz" => "qux"});
}

#[test]
fn test_diff() {
    assert_eq!(
        map! {"a" => "foo", "b" => "bar", "c" => "baz"}
            .diff([map! {"a" => "foo", "c" => "baz", "d" => "qux"}]),
        map! {"b" => "bar"}
    );
    assert_eq!(
        map! {"a" => "foo", "b" => "bar", "c" => "baz", "d" => "qux"}.diff([
            map! {"a" => "bar", "b" => "bar", "c" => "qux"},
            map! {"c" => "baz", "d" => "quux"},
        ]),
        map! {"a" => "foo", "d" => "qux"}
    );
}

#[test]
fn test_udiff() {
    let map = map! {
        "a" => record(1, "one"),
        "b" => record(2, "two"),
        "c" => record(3, "three"),
        "x" => record(1, "one"),
    };

    let diff = map.udiff(
        by_id,
        [
            map! {"b" => record(2, "bar"), "d" => record(4, "qux")},
            map! {"x" => record(1, "zero"), "a" => record(1, "also one"), "e" => record(5, "quux")},
        ],
    );

    assert_eq!(diff, map! {"c" => record(3, "three")});
}

#[test]
fn test_diff_keys() {
    assert_eq!(
        map! {"foo" => 123, "bar" => 456, "baz" => 789}
            .diff_keys([map! {"foo" => "bar", "baz" => "qux", "quux" => "quuz"}]),
        map! {"bar" => 456}
    );
    assert_eq!(
        map! {"foo" => 123, "bar" => 456, "baz" => 789, "qux" => "test"}.diff_keys([
            map! {"foo" => "bar", "quux" => "quuz"},
            map! {"baz" => "qux", "quux" => "quuz"},
        ]),
        map! {"bar" => 456, "qux" => "test"}
    );
}

#[test]
fn test_udiff_keys() {
    let map = map! {"foo" => 123, "bar" => 456, "baz" => 789, "qux" => "test"};

    let diff = map.udiff_keys(
        by_trimmed_key,
        [
            map! {"  bar " => "lorem", " quux " => "ipsum"},
            map! {" qux  " => "dolor", "quux" => "quuz"},
        ],
    );

    assert_eq!(diff, map! {"foo" => 123, "baz" => 789});
}

fn sort_cases() -> Vec<(Map, Map, SortFlags)> {
    vec![
        (
            indexed([1, 6, 9, 5, 2, 4, 10, 7, 3, 8]),
            map! {0 => 1, 4 => 2, 8 => 3, 5 => 4, 3 => 5, 1 => 6, 7 => 7, 9 => 8, 2 => 9, 6 => 10},
            SortFlags::REGULAR,
        ),
        (
            indexed(["1", "6", "9", "5", "2", "4", "10", "7", "3", "8"]),
            map! {
                0 => "1", 4 => "2", 8 => "3", 5 => "4", 3 => "5",
                1 => "6", 7 => "7", 9 => "8", 2 => "9", 6 => "10",
            },
            SortFlags::REGULAR,
        ),
        (
            indexed(["foo", "bar", "baz"]),
            map! {1 => "bar", 2 => "baz", 0 => "foo"},
            SortFlags::REGULAR,
        ),
        (
            indexed(["foo.5", "foo.10", "foo.1"]),
            map! {2 => "foo.1", 1 => "foo.10", 0 => "foo.5"},
            SortFlags::REGULAR,
        ),
        (
            indexed(["foo.5", "foo.10", "foo.1"]),
            map! {2 => "foo.1", 0 => "foo.5", 1 => "foo.10"},
            SortFlags::NATURAL,
        ),
        (
            indexed(["bar.5", "BAR.2", "bar.1"]),
            map! {1 => "BAR.2", 2 => "bar.1", 0 => "bar.5"},
            SortFlags::NATURAL,
        ),
        (
            indexed(["bar.5", "BAR.2", "bar.1"]),
            map! {2 => "bar.1", 1 => "BAR.2", 0 => "bar.5"},
            SortFlags::NATURAL.case_insensitive(),
        ),
    ]
}

#[test]
fn test_sort() {
    for (unsorted, expected, flags) in sort_cases() {
        assert_eq!(unsorted.sort(flags, false), expected, "{flags:?}");
        assert_eq!(unsorted.sort(flags, true), reversed(&expected), "{flags:?} reversed");
    }
}

#[test]
fn test_ksort() {
    for (unsorted, expected, flags) in sort_cases() {
        let unsorted = unsorted.flip();
        let expected = expected.flip();

        assert_eq!(unsorted.ksort(flags, false), expected, "{flags:?}");
        assert_eq!(unsorted.ksort(flags, true), reversed(&expected), "{flags:?} reversed");
    }
}

#[test]
fn test_usort() {
    let map = indexed([1, 2, 3, 4]);
    let sorted = map.usort(|a, b| b.loose_cmp(a).unwrap_or(Ordering::Equal));

    assert_eq!(sorted, map! {3 => 4, 2 => 3, 1 => 2, 0 => 1});
}

#[test]
fn test_uksort() {
    let map = map! {"a" => 1, "b" => 2, "c" => 3};
    let sorted = map.uksort(|a, b| b.to_string().cmp(&a.to_string()));

    assert_eq!(sorted, map! {"c" => 3, "b" => 2, "a" => 1});
}

#[test]
fn test_index_read() {
    let map = example();

    assert_eq!(map["foo"], Value::from("bar"));
    assert_eq!(map[123], Value::Int(456));
    assert_eq!(map["123"], Value::Int(456));
    assert!(map["nonexistent"].is_null());
}

#[test]
fn test_index_write() {
    let mut map = example();

    map["foo"] = "new bar".into();
    map["baz"] = "new qux".into();
    map[123] = 789.into();
    assert_eq!(map, map! {"foo" => "new bar", "baz" => "new qux", 123 => 789});

    map["added"] = Value::Bool(true);
    assert_eq!(map.get("added"), Some(&Value::Bool(true)));

    map.remove(["baz", "foo", "added"]);
    assert_eq!(map, map! {123 => 789});
}

#[test]
fn test_iteration_order() {
    let map = example();

    let keys: Vec<&Key> = map.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec![&Key::from("foo"), &Key::from("baz"), &Key::Int(123)]);

    let pairs: Vec<(Key, Value)> = map.into_iter().collect();
    assert_eq!(pairs[2], (Key::Int(123), Value::Int(456)));
}

#[test]
fn test_extend() {
    let mut map = map! {"a" => 1};
    map.extend([("b", 2), ("a", 3)]);

    assert_eq!(map, map! {"a" => 3, "b" => 2});
}

#[test]
fn test_equality_is_order_sensitive() {
    assert_ne!(map! {"a" => 1, "b" => 2}, map! {"b" => 2, "a" => 1});
    assert_eq!(map! {"a" => 1, "b" => 2}, map! {"a" => 1, "b" => 2});
}

#[test]
fn test_conversions() {
    let map = Map::from(Collection::collect(["x", "y"]));
    assert_eq!(map, map! {0 => "x", 1 => "y"});

    let value = Value::from(map! {"a" => 1});
    assert_eq!(value, Value::record([("a", 1)]));
}

#[test]
fn test_count() {
    assert_eq!(Map::new().len(), 0);
    assert_eq!(example().len(), 3);
}
