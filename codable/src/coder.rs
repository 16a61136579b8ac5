use crate::de::Decoder;
use crate::error::Error;
use crate::ser::Encoder;

/// A strategy object that decodes and encodes a value on behalf of a field.
///
/// Fields annotated with `#[codable(by = expr)]` are coded through the
/// helper produced by `expr` instead of through their own
/// [`Decode`](crate::Decode) and [`Encode`](crate::Encode) implementations.
/// For an `Option<T>` field the helper codes `T` and the `*_if_present`
/// methods take care of absent values.
///
/// ```rust
/// use codable::{Decoder, Encoder, Error, ErrorKind, HelperCoder, Value};
///
/// /// Codes integers as decimal strings.
/// struct Stringified;
///
/// impl HelperCoder for Stringified {
///     type Coded = u64;
///
///     fn decode(&self, decoder: &Decoder<'_>) -> Result<u64, Error> {
///         let text: String = decoder.decode()?;
///         text.parse()
///             .map_err(|_| decoder.error(ErrorKind::InvalidValue, "not a decimal number"))
///     }
///
///     fn encode(&self, value: &u64, encoder: &mut Encoder<'_>) -> Result<(), Error> {
///         encoder.emit(value.to_string());
///         Ok(())
///     }
/// }
///
/// let value = Value::from("42");
/// assert_eq!(Stringified.decode(&Decoder::new(&value)).unwrap(), 42);
/// ```
pub trait HelperCoder {
    /// The type of value the helper codes.
    type Coded;

    /// Decodes a value.
    fn decode(&self, decoder: &Decoder<'_>) -> Result<Self::Coded, Error>;

    /// Decodes a value, treating null as `None`.
    fn decode_if_present(&self, decoder: &Decoder<'_>) -> Result<Option<Self::Coded>, Error> {
        if decoder.is_null() {
            Ok(None)
        } else {
            self.decode(decoder).map(Some)
        }
    }

    /// Encodes a value.
    fn encode(&self, value: &Self::Coded, encoder: &mut Encoder<'_>) -> Result<(), Error>;

    /// Encodes a value, writing null for `None`.
    fn encode_if_present(
        &self,
        value: Option<&Self::Coded>,
        encoder: &mut Encoder<'_>,
    ) -> Result<(), Error> {
        match value {
            Some(value) => self.encode(value, encoder),
            None => {
                encoder.encode_nil();
                Ok(())
            }
        }
    }
}
