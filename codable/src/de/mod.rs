//! Decoding framework.
//!
//! Decoding is based on the [`Decode`] trait.  A type is handed a
//! [`Decoder`] which is a read-only view into a [`Value`] together with the
//! path of that value relative to the root.  From the decoder a type can
//! either look at the value directly (primitives do that) or request a
//! [`KeyedDecodingContainer`] to read individual keys.
//!
//! Containers can be nested: [`nested_container`](KeyedDecodingContainer::nested_container)
//! returns the container found at a key and [`super_decoder`](KeyedDecodingContainer::super_decoder)
//! returns a fresh decoder for the value at a key, which is what custom
//! [`HelperCoder`](crate::HelperCoder)s receive.
//!
//! # Decoding structs
//!
//! ```rust
//! use codable::{Decode, Decoder, Error, Value};
//!
//! struct Flag {
//!     enabled: bool,
//!     name: String,
//! }
//!
//! impl Decode for Flag {
//!     fn decode(decoder: &Decoder<'_>) -> Result<Self, Error> {
//!         let container = decoder.container()?;
//!         Ok(Flag {
//!             enabled: container.decode("enabled")?,
//!             name: container.decode("name")?,
//!         })
//!     }
//! }
//!
//! let value: Value = [("enabled", Value::from(true)), ("name", Value::from("beta"))]
//!     .into_iter()
//!     .collect();
//! let flag: Flag = codable::from_value(&value).unwrap();
//! assert!(flag.enabled);
//! assert_eq!(flag.name, "beta");
//! ```
use crate::error::{Error, ErrorKind};
use crate::key::CodingKey;
use crate::path::Path;
use crate::value::{Map, Value};

mod impls;

/// A trait for decodable types.
pub trait Decode: Sized {
    /// Decodes the value the decoder points at.
    fn decode(decoder: &Decoder<'_>) -> Result<Self, Error>;
}

/// A read-only view into a value that is being decoded.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    value: &'a Value,
    path: Path,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder for a root value.
    pub fn new(value: &'a Value) -> Decoder<'a> {
        Decoder {
            value,
            path: Path::root(),
        }
    }

    fn with_path(value: &'a Value, path: Path) -> Decoder<'a> {
        Decoder { value, path }
    }

    /// Returns the value this decoder points at.
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Returns the path of the value relative to the root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the value is null.
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Creates an error located at this decoder's path.
    pub fn error<M: Into<std::borrow::Cow<'static, str>>>(&self, kind: ErrorKind, msg: M) -> Error {
        Error::new(kind, msg).at(&self.path)
    }

    /// Creates a type mismatch error for the current value.
    pub fn unexpected(&self, expectation: &str) -> Error {
        self.value.unexpected_error(expectation).at(&self.path)
    }

    /// Returns the keyed container this decoder points at.
    pub fn container(&self) -> Result<KeyedDecodingContainer<'a>, Error> {
        match self.value {
            Value::Map(map) => Ok(KeyedDecodingContainer {
                map,
                path: self.path.clone(),
            }),
            _ => Err(self.unexpected("map")),
        }
    }

    /// Returns decoders for every item if this decoder points at a sequence.
    pub fn seq(&self) -> Result<Vec<Decoder<'a>>, Error> {
        match self.value {
            Value::Seq(items) => Ok(items
                .iter()
                .enumerate()
                .map(|(idx, item)| Decoder::with_path(item, self.path.join_index(idx)))
                .collect()),
            _ => Err(self.unexpected("sequence")),
        }
    }

    /// Decodes a value from this decoder.
    pub fn decode<T: Decode>(&self) -> Result<T, Error> {
        T::decode(self)
    }
}

/// A container that gives access to the keys of a map.
#[derive(Debug, Clone)]
pub struct KeyedDecodingContainer<'a> {
    map: &'a Map,
    path: Path,
}

impl<'a> KeyedDecodingContainer<'a> {
    /// Returns the path of the container.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the key is present (even if it holds null).
    pub fn contains<K: CodingKey>(&self, key: K) -> bool {
        self.map.contains_key(key.as_str())
    }

    /// Returns `true` if the key is present and not null.
    pub fn contains_non_null<K: CodingKey>(&self, key: K) -> bool {
        matches!(self.map.get(key.as_str()), Some(value) if !value.is_null())
    }

    /// Iterates over all keys in the container in their original order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.map.keys().map(|key| key.as_str())
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the container has no keys.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn missing<K: CodingKey>(&self, key: K) -> Error {
        Error::new(
            ErrorKind::KeyNotFound,
            format!("missing key '{}'", key.as_str()),
        )
        .at(&self.path.join_key(key.as_str()))
    }

    /// Returns a decoder for the value at the key.
    ///
    /// Fails with [`ErrorKind::KeyNotFound`] if the key is absent.
    pub fn super_decoder<K: CodingKey>(&self, key: K) -> Result<Decoder<'a>, Error> {
        match self.map.get(key.as_str()) {
            Some(value) => Ok(Decoder::with_path(value, self.path.join_key(key.as_str()))),
            None => Err(self.missing(key)),
        }
    }

    /// Returns a decoder for the value at the key unless it is absent or null.
    pub fn super_decoder_if_present<K: CodingKey>(&self, key: K) -> Option<Decoder<'a>> {
        match self.map.get(key.as_str()) {
            Some(value) if !value.is_null() => {
                Some(Decoder::with_path(value, self.path.join_key(key.as_str())))
            }
            _ => None,
        }
    }

    /// Decodes the value at the key.
    pub fn decode<T: Decode, K: CodingKey>(&self, key: K) -> Result<T, Error> {
        let decoder = self.super_decoder(key)?;
        T::decode(&decoder).map_err(|err| err.at(decoder.path()))
    }

    /// Decodes the value at the key, treating absent and null as `None`.
    pub fn decode_if_present<T: Decode, K: CodingKey>(&self, key: K) -> Result<Option<T>, Error> {
        match self.super_decoder_if_present(key) {
            Some(decoder) => T::decode(&decoder)
                .map(Some)
                .map_err(|err| err.at(decoder.path())),
            None => Ok(None),
        }
    }

    /// Returns the keyed container stored at the key.
    pub fn nested_container<K: CodingKey>(&self, key: K) -> Result<KeyedDecodingContainer<'a>, Error> {
        self.super_decoder(key)?.container()
    }

    /// Returns the keyed container stored at the key unless it is absent or null.
    pub fn nested_container_if_present<K: CodingKey>(
        &self,
        key: K,
    ) -> Result<Option<KeyedDecodingContainer<'a>>, Error> {
        match self.super_decoder_if_present(key) {
            Some(decoder) => decoder.container().map(Some),
            None => Ok(None),
        }
    }
}

/// Decodes a value from a root [`Value`].
pub fn from_value<T: Decode>(value: &Value) -> Result<T, Error> {
    T::decode(&Decoder::new(value))
}

#[test]
fn test_nested_paths() {
    let value: Value = [(
        "data",
        [("id", Value::from("x"))].into_iter().collect::<Value>(),
    )]
    .into_iter()
    .collect();
    let decoder = Decoder::new(&value);
    let container = decoder.container().unwrap();
    let data = container.nested_container("data").unwrap();
    assert_eq!(data.decode::<String, _>("id").unwrap(), "x");

    let err = data.decode::<String, _>("name").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyNotFound);
    assert_eq!(err.path().unwrap().to_string(), "data.name");

    let err = data.decode::<u32, _>("id").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.path().unwrap().to_string(), "data.id");
}
