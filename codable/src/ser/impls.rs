use std::collections::{BTreeMap, HashMap};

use crate::error::Error;
use crate::ser::{Encode, Encoder};
use crate::value::Value;

macro_rules! encode_into {
    ($ty:ty, $variant:ident) => {
        impl Encode for $ty {
            fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
                encoder.emit(Value::$variant(*self as _));
                Ok(())
            }
        }
    };
}

encode_into!(bool, Bool);
encode_into!(u8, U64);
encode_into!(u16, U64);
encode_into!(u32, U64);
encode_into!(u64, U64);
encode_into!(usize, U64);
encode_into!(i8, I64);
encode_into!(i16, I64);
encode_into!(i32, I64);
encode_into!(i64, I64);
encode_into!(isize, I64);
encode_into!(f32, F64);
encode_into!(f64, F64);

impl Encode for () {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        encoder.encode_nil();
        Ok(())
    }
}

impl Encode for str {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        encoder.emit(self);
        Ok(())
    }
}

impl Encode for String {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        encoder.emit(self.as_str());
        Ok(())
    }
}

impl Encode for char {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        encoder.emit(self.to_string());
        Ok(())
    }
}

impl Encode for Value {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        encoder.emit(self.clone());
        Ok(())
    }
}

impl<'a, T: Encode + ?Sized> Encode for &'a T {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        (**self).encode(encoder)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        (**self).encode(encoder)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        match self {
            Some(value) => value.encode(encoder),
            None => {
                encoder.encode_nil();
                Ok(())
            }
        }
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        let mut items = Vec::with_capacity(self.len());
        for item in self {
            let mut slot = Value::Null;
            item.encode(&mut Encoder::new(&mut slot))?;
            items.push(slot);
        }
        encoder.emit(Value::Seq(items));
        Ok(())
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        self.as_slice().encode(encoder)
    }
}

impl<T: Encode> Encode for BTreeMap<String, T> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        let mut container = encoder.container()?;
        for (key, value) in self {
            container.encode(key.as_str(), value)?;
        }
        Ok(())
    }
}

impl<T: Encode, S> Encode for HashMap<String, T, S> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        let mut container = encoder.container()?;
        for (key, value) in self {
            container.encode(key.as_str(), value)?;
        }
        Ok(())
    }
}
