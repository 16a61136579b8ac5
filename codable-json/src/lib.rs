//! Parse and serialize JSON for codable.
//!
//! JSON text is parsed into a [`codable::Value`] which is then decoded, and
//! encoded values are written back out as text.  Enable the `speedups`
//! feature to format numbers with `itoa` and `ryu`.
//!
//! ```rust
//! let vec: Vec<u64> = codable_json::from_str("[1, 2, 3, 4]").unwrap();
//! let json = codable_json::to_string(&vec).unwrap();
//! assert_eq!(json, "[1,2,3,4]");
//! ```
mod de;
mod ser;

pub use self::de::{from_str, Deserializer};
pub use self::ser::{to_string, to_string_pretty, Serializer};
