use std::borrow::Cow;

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind};

/// The map type used for keyed containers.
///
/// Insertion order is preserved so that encoding emits keys in the order
/// the fields were declared.
pub type Map = IndexMap<String, Value>;

/// The in-memory data model codable decodes from and encodes into.
///
/// Format crates (such as `codable-json`) convert between their textual
/// representation and a [`Value`].  Generated code only ever talks to the
/// [`Decoder`](crate::Decoder) and [`Encoder`](crate::Encoder) views over
/// a value.
#[derive(Debug, PartialEq, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    U64(u64),
    I64(i64),
    F64(f64),
    Str(String),
    Bytes(Vec<u8>),
    Seq(Vec<Value>),
    Map(Map),
}

impl Value {
    /// Returns the human readable name of the value's kind.
    pub fn name(&self) -> &'static str {
        match *self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::U64(_) => "unsigned integer",
            Value::I64(_) => "signed integer",
            Value::F64(_) => "float",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Seq(_) => "sequence",
            Value::Map(_) => "map",
        }
    }

    /// Returns `true` if this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the string if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the map if this is a map value.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a key if this is a map value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Creates a "type mismatch" error.
    ///
    /// This is what [`Decode`](crate::Decode) implementations return when
    /// they are handed a value of the wrong shape.
    pub fn unexpected_error(&self, expectation: &str) -> Error {
        let kind = if self.is_null() {
            ErrorKind::ValueNotFound
        } else {
            ErrorKind::TypeMismatch
        };
        Error::new(
            kind,
            format!("unexpected {}, expected {}", self.name(), expectation),
        )
    }
}

macro_rules! impl_from {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::$variant(value as _)
            }
        }
    };
}

impl_from!(u64, U64);
impl_from!(u32, U64);
impl_from!(usize, U64);
impl_from!(i64, I64);
impl_from!(i32, I64);
impl_from!(isize, I64);
impl_from!(f64, F64);
impl_from!(bool, Bool);

impl From<()> for Value {
    fn from(_: ()) -> Value {
        Value::Null
    }
}

impl<'a> From<&'a str> for Value {
    fn from(value: &'a str) -> Value {
        Value::Str(value.to_string())
    }
}

impl<'a> From<Cow<'a, str>> for Value {
    fn from(value: Cow<'a, str>) -> Value {
        Value::Str(value.into_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Value {
        Value::Seq(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Value {
        Value::Map(value)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Value {
        Value::Map(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
