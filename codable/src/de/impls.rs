use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::de::{Decode, Decoder};
use crate::error::{Error, ErrorKind};
use crate::value::Value;

impl Decode for () {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, Error> {
        match decoder.value() {
            Value::Null => Ok(()),
            _ => Err(decoder.unexpected("null")),
        }
    }
}

impl Decode for bool {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, Error> {
        match decoder.value() {
            Value::Bool(value) => Ok(*value),
            _ => Err(decoder.unexpected("bool")),
        }
    }
}

impl Decode for String {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, Error> {
        match decoder.value() {
            Value::Str(value) => Ok(value.clone()),
            _ => Err(decoder.unexpected("string")),
        }
    }
}

impl Decode for char {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, Error> {
        match decoder.value() {
            Value::Str(value) => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(decoder.error(
                        ErrorKind::InvalidValue,
                        "expected a string of exactly one character",
                    )),
                }
            }
            _ => Err(decoder.unexpected("char")),
        }
    }
}

macro_rules! int_decode {
    ($ty:ty) => {
        impl Decode for $ty {
            fn decode(decoder: &Decoder<'_>) -> Result<Self, Error> {
                let converted = match *decoder.value() {
                    Value::U64(value) => <$ty>::try_from(value).ok(),
                    Value::I64(value) => <$ty>::try_from(value).ok(),
                    _ => return Err(decoder.unexpected(stringify!($ty))),
                };
                converted.ok_or_else(|| {
                    decoder.error(
                        ErrorKind::OutOfRange,
                        concat!("value out of range for ", stringify!($ty)),
                    )
                })
            }
        }
    };
}

int_decode!(u8);
int_decode!(u16);
int_decode!(u32);
int_decode!(u64);
int_decode!(usize);
int_decode!(i8);
int_decode!(i16);
int_decode!(i32);
int_decode!(i64);
int_decode!(isize);

macro_rules! float_decode {
    ($ty:ty) => {
        impl Decode for $ty {
            fn decode(decoder: &Decoder<'_>) -> Result<Self, Error> {
                match *decoder.value() {
                    Value::U64(value) => Ok(value as $ty),
                    Value::I64(value) => Ok(value as $ty),
                    Value::F64(value) => Ok(value as $ty),
                    _ => Err(decoder.unexpected(stringify!($ty))),
                }
            }
        }
    };
}

float_decode!(f32);
float_decode!(f64);

impl Decode for Value {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, Error> {
        Ok(decoder.value().clone())
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, Error> {
        if decoder.is_null() {
            Ok(None)
        } else {
            T::decode(decoder).map(Some)
        }
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, Error> {
        T::decode(decoder).map(Box::new)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, Error> {
        decoder.seq()?.iter().map(T::decode).collect()
    }
}

impl<T: Decode> Decode for BTreeMap<String, T> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, Error> {
        let container = decoder.container()?;
        container
            .keys()
            .map(|key| Ok((key.to_string(), container.decode(key)?)))
            .collect()
    }
}

impl<T: Decode, S: BuildHasher + Default> Decode for HashMap<String, T, S> {
    fn decode(decoder: &Decoder<'_>) -> Result<Self, Error> {
        let container = decoder.container()?;
        container
            .keys()
            .map(|key| Ok((key.to_string(), container.decode(key)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_ranges() {
        let negative = Value::I64(-1);
        let err = Decoder::new(&negative).decode::<u64>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);

        let large = Value::U64(300);
        assert_eq!(
            Decoder::new(&large).decode::<u8>().unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
        assert_eq!(Decoder::new(&large).decode::<i16>().unwrap(), 300);
    }

    #[test]
    fn test_null_is_value_not_found() {
        let null = Value::Null;
        let err = Decoder::new(&null).decode::<String>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueNotFound);
        assert_eq!(Decoder::new(&null).decode::<Option<String>>().unwrap(), None);
    }

    #[test]
    fn test_seq_paths() {
        let value = Value::Seq(vec![Value::U64(1), Value::from("two")]);
        let err = Decoder::new(&value).decode::<Vec<u32>>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.path().unwrap().to_string(), "[1]");
    }
}
