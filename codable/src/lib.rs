//! Codable is an attribute driven encoding and decoding library for Rust.
//!
//! Types implement [`Decode`] and [`Encode`] against a small keyed
//! container model ([`Decoder`], [`Encoder`]) over an in-memory [`Value`].
//! The interesting part is the [`derive`] support which lets fields be
//! renamed, nested at arbitrary key paths, defaulted, coded through custom
//! helpers and lets enums pick a tagging strategy.

mod coder;
pub mod de;
mod error;
mod key;
mod path;
pub mod ser;
mod value;

#[cfg(feature = "derive")]
pub mod derive;

pub use self::coder::HelperCoder;
pub use self::de::{from_value, Decode, Decoder, KeyedDecodingContainer};
pub use self::error::{Error, ErrorKind};
pub use self::key::CodingKey;
pub use self::path::{Path, PathSegment};
pub use self::ser::{to_value, Encode, Encoder, KeyedEncodingContainer};
pub use self::value::{Map, Value};

#[cfg(feature = "derive")]
pub use self::derive::{Decode, Encode, MemberInit};

#[doc(hidden)]
pub mod __derive {
    pub use std::boxed::Box;
    pub use std::default::Default;
    pub use std::format;
    pub use std::option::Option::{self, None, Some};
    pub use std::result::Result::{self, Err, Ok};
    pub use std::string::String;
    pub use std::vec::Vec;
}
