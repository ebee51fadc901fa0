//! `listmap`: ordered value collections and insertion-ordered maps.
//!
//! Two containers over dynamically typed [`Value`]s:
//!
//! - [`Collection`]: a sequence indexed by `0..len`. Removing values closes
//!   the gap, so indexes never become sparse.
//! - [`Map`]: unique [`Key`]s (integers or strings) mapped to values,
//!   iterated in insertion order.
//!
//! Transformations such as `slice`, `filter`, `sort` or `intersect` return new
//! containers and leave the receiver unchanged. A small set of documented
//! methods (`push`, `replace`, `set`, `remove`, ...) mutate in place.
//!
//! # Collection
//!
//! ```
//! use listmap::{Collection, Value};
//!
//! let mut c = Collection::collect([1, 2, 3]);
//! c.push([4]);
//! c.remove([0]);
//!
//! assert_eq!(c.indexes(), vec![0, 1, 2]);
//! assert_eq!(c.sum(), Value::Int(9));
//! assert_eq!(c.implode(", "), "2, 3, 4");
//!
//! let chunks = c.chunk(2);
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[1].to_array(), vec![Value::Int(4)]);
//! ```
//!
//! Only existing indexes can be replaced:
//!
//! ```
//! use listmap::Collection;
//!
//! let mut c = Collection::collect(["a", "b", "c"]);
//! let err = c.replace(10, "x").unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "Cannot replace value at index 10 because it does not exist (valid indexes are 0 to 2)"
//! );
//! ```
//!
//! # Map
//!
//! ```
//! use listmap::{Map, SortFlags, Value};
//!
//! let map = Map::combine(["one", "two"], [1, 2]).unwrap();
//! assert_eq!(map["two"], Value::Int(2));
//! assert!(map["three"].is_null());
//!
//! let sorted = map.sort(SortFlags::REGULAR, true);
//! assert_eq!(sorted.keys().implode(","), "two,one");
//! ```
//!
//! # Equality
//!
//! `PartialEq` on [`Value`] is strict. `contains`, `find` and `unique` can use
//! the coercive [`Value::loose_eq`] instead, under which `123` equals `"123"`:
//!
//! ```
//! use listmap::Collection;
//!
//! let c = Collection::collect([123]);
//! assert!(c.contains("123", false));
//! assert!(!c.contains("123", true));
//! ```
//!
//! # Sorting
//!
//! `sort` and `ksort` take [`SortFlags`]. Sorting is stable and a reversed sort
//! is the exact reverse of the ascending one.
//!
//! ```
//! use listmap::{Collection, SortFlags};
//!
//! let files = Collection::collect(["img12.png", "img10.png", "IMG2.png", "img1.png"]);
//! let sorted = files.sort(SortFlags::NATURAL.case_insensitive(), false);
//! assert_eq!(sorted.implode(" "), "img1.png IMG2.png img10.png img12.png");
//! ```

mod collection;
mod compare;
mod error;
mod iter;
pub mod iterable;
mod map;
mod value;

pub use collection::Collection;
pub use compare::{SortFlags, SortMode};
pub use error::{CollectionError, ValidIndexes};
pub use iter::{IntoPairs, IntoValues, Pairs, Values};
pub use map::Map;
pub use value::{Key, Number, Value};
