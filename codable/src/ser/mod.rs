//! Encoding framework.
//!
//! Encoding mirrors decoding: a type implements [`Encode`] and writes itself
//! into an [`Encoder`], which is a mutable view of a slot in a [`Value`]
//! tree.  Primitives [`emit`](Encoder::emit) a value directly, compound
//! types request a [`KeyedEncodingContainer`].
//!
//! Requesting a container on an encoder that already holds a map reuses
//! that map.  This is what allows several fields to be encoded "inline"
//! into the same container (fields coded at the empty path).
//!
//! ```rust
//! use codable::{Encode, Encoder, Error, Value};
//!
//! struct User {
//!     id: u32,
//!     username: String,
//! }
//!
//! impl Encode for User {
//!     fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
//!         let mut container = encoder.container()?;
//!         container.encode("id", &self.id)?;
//!         container.encode("username", &self.username)?;
//!         Ok(())
//!     }
//! }
//!
//! let value = codable::to_value(&User { id: 1, username: "john".into() }).unwrap();
//! assert_eq!(value.get("username"), Some(&Value::from("john")));
//! ```
use crate::error::{Error, ErrorKind};
use crate::key::CodingKey;
use crate::value::{Map, Value};

mod impls;

/// A trait for encodable types.
pub trait Encode {
    /// Encodes the value into the encoder.
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), Error>;
}

/// A mutable view of the slot a value is encoded into.
#[derive(Debug)]
pub struct Encoder<'a> {
    slot: &'a mut Value,
}

impl<'a> Encoder<'a> {
    /// Creates an encoder writing into the given slot.
    pub fn new(slot: &'a mut Value) -> Encoder<'a> {
        Encoder { slot }
    }

    /// Returns the value written so far.
    pub fn value(&self) -> &Value {
        self.slot
    }

    /// Replaces the slot with a single value.
    pub fn emit<V: Into<Value>>(&mut self, value: V) {
        *self.slot = value.into();
    }

    /// Writes null into the slot.
    pub fn encode_nil(&mut self) {
        *self.slot = Value::Null;
    }

    /// Encodes a value into this encoder.
    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        value.encode(self)
    }

    /// Returns the keyed container of this slot.
    ///
    /// An empty slot becomes an empty map, a slot that already holds a map
    /// is reused.  Any other value is an error.
    pub fn container(&mut self) -> Result<KeyedEncodingContainer<'_>, Error> {
        if self.slot.is_null() {
            *self.slot = Value::Map(Map::new());
        }
        match &mut *self.slot {
            Value::Map(map) => Ok(KeyedEncodingContainer { map }),
            other => Err(Error::new(
                ErrorKind::TypeMismatch,
                format!("cannot open a keyed container over {}", other.name()),
            )),
        }
    }
}

/// A container that writes the keys of a map.
#[derive(Debug)]
pub struct KeyedEncodingContainer<'a> {
    map: &'a mut Map,
}

impl<'a> KeyedEncodingContainer<'a> {
    /// Returns an encoder for the slot at the key.
    ///
    /// The slot is created as null if it does not exist yet.
    pub fn super_encoder<K: CodingKey>(&mut self, key: K) -> Encoder<'_> {
        let slot = self
            .map
            .entry(key.as_str().to_string())
            .or_insert(Value::Null);
        Encoder { slot }
    }

    /// Encodes a value at the key.
    pub fn encode<T: Encode + ?Sized, K: CodingKey>(&mut self, key: K, value: &T) -> Result<(), Error> {
        value.encode(&mut self.super_encoder(key))
    }

    /// Encodes a value at the key unless it is `None`.
    pub fn encode_if_present<T: Encode + ?Sized, K: CodingKey>(
        &mut self,
        key: K,
        value: Option<&T>,
    ) -> Result<(), Error> {
        match value {
            Some(value) => self.encode(key, value),
            None => Ok(()),
        }
    }

    /// Writes null at the key.
    pub fn encode_nil<K: CodingKey>(&mut self, key: K) {
        self.super_encoder(key).encode_nil();
    }

    /// Returns the keyed container at the key, creating it if needed.
    pub fn nested_container<K: CodingKey>(&mut self, key: K) -> Result<KeyedEncodingContainer<'_>, Error> {
        let slot = self
            .map
            .entry(key.as_str().to_string())
            .or_insert(Value::Null);
        if slot.is_null() {
            *slot = Value::Map(Map::new());
        }
        match slot {
            Value::Map(map) => Ok(KeyedEncodingContainer { map }),
            other => Err(Error::new(
                ErrorKind::TypeMismatch,
                format!(
                    "cannot open a keyed container at '{}' over {}",
                    key.as_str(),
                    other.name()
                ),
            )),
        }
    }
}

/// Encodes a value into a new [`Value`].
pub fn to_value<T: Encode + ?Sized>(value: &T) -> Result<Value, Error> {
    let mut out = Value::Null;
    value.encode(&mut Encoder::new(&mut out))?;
    Ok(out)
}

#[test]
fn test_containers_merge() {
    let mut out = Value::Null;
    {
        let mut encoder = Encoder::new(&mut out);
        let mut container = encoder.container().unwrap();
        let mut data = container.nested_container("data").unwrap();
        data.encode("id", "x").unwrap();
    }
    {
        let mut encoder = Encoder::new(&mut out);
        let mut container = encoder.container().unwrap();
        let mut data = container.nested_container("data").unwrap();
        data.encode("name", "y").unwrap();
    }
    let data = out.get("data").unwrap();
    assert_eq!(data.get("id"), Some(&Value::from("x")));
    assert_eq!(data.get("name"), Some(&Value::from("y")));
}
