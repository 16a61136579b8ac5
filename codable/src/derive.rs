//! Support for automatic encoder and decoder deriving.
//!
//! When the `derive` feature is enabled [`Decode`](crate::Decode) and
//! [`Encode`](crate::Encode) can be derived for structs and enums, and
//! [`MemberInit`] generates memberwise constructors for structs.  All
//! customization happens through `#[codable(...)]` attributes.
//!
//! # Example
//!
//! ```
//! use codable::{Decode, Encode, Value};
//!
//! #[derive(Decode, Encode, Debug, PartialEq)]
//! #[codable(rename_all = "camelCase")]
//! pub struct Post {
//!     id: String,
//!     #[codable(at("header", "title"))]
//!     title: String,
//!     #[codable(default = 0)]
//!     like_count: u32,
//! }
//!
//! let value: Value = [
//!     ("id", Value::from("x")),
//!     ("header", [("title", Value::from("T"))].into_iter().collect()),
//! ]
//! .into_iter()
//! .collect();
//! let post: Post = codable::from_value(&value).unwrap();
//! assert_eq!(post.like_count, 0);
//! assert_eq!(codable::to_value(&post).unwrap().get("likeCount"), Some(&Value::from(0u32)));
//! ```
//!
//! # Key Paths
//!
//! Every field is coded at a key path.  By default this is the field name
//! (transformed by `rename_all`), tuple fields use their index and the only
//! field of a tuple struct is coded transparently in place of the struct.
//! Paths with more than one segment are read from and written to nested
//! containers which are shared between all fields below them.
//!
//! Two fields coded at the same key path are an error.  The first field
//! keeps the location, the later one is still decoded from it but never
//! encoded.
//!
//! # Container Attributes
//!
//! * `#[codable(rename_all = "...")]`: transforms all field names and the
//!   names of enum variants.  The possible values are `"lowercase"`,
//!   `"UPPERCASE"`, `"PascalCase"`, `"camelCase"`, `"snake_case"`,
//!   `"SCREAMING_SNAKE_CASE"`, `"kebab-case"`, `"SCREAMING-KEBAB-CASE"` and
//!   `"Train-Case"`.
//! * `#[codable(ignore_initialized)]` (structs): ignores every field with an
//!   `initial` value.
//! * `#[codable(tag = "...")]` or `#[codable(tag("a", "b"))]` (enums): the
//!   variant name is stored at this key path next to the variant's fields.
//! * `#[codable(content = "...")]` (enums, requires `tag`): the variant's
//!   fields are stored at this key path instead.
//! * `#[codable(untagged)]` (enums): no variant name is stored.  Decoding
//!   picks the first variant that knows all keys of the input and
//!   decodes, then the first variant that decodes at all.
//!
//! Enums without any of these are externally tagged: they are coded as a
//! map with the variant name as its only key.
//!
//! # Field Attributes
//!
//! * `#[codable(at("a", "b"))]`: codes the field at this exact key path.
//!   `at()` codes the field in place of the containing type.
//! * `#[codable(rename = "...")]`: codes the field at this key.
//! * `#[codable(coded_in("a", "b"))]`: prefixes the field's key.
//! * `#[codable(alias = "...")]`: an alternative key accepted when decoding.
//!   The first key present wins, encoding uses the primary key.
//! * `#[codable(by = expr)]`: codes the field through the
//!   [`HelperCoder`](crate::HelperCoder) `expr`.
//! * `#[codable(default)]`, `#[codable(default = expr)]`: uses the default
//!   if the field cannot be decoded for any reason.
//! * `#[codable(default_if_missing)]`,
//!   `#[codable(default_if_missing = expr)]`: uses the default only if the
//!   key is absent or null.
//! * `#[codable(ignore)]`: neither decodes nor encodes the field.  The field
//!   needs a `default` or `initial` value.
//! * `#[codable(ignore_decoding)]`, `#[codable(ignore_encoding)]`: skips
//!   only one direction.
//! * `#[codable(ignore_encoding_if = path)]`: skips encoding when the
//!   predicate returns `true` for a reference to the value.
//! * `#[codable(initial = expr)]` (struct fields): the value a field starts
//!   out with.  It is still decoded and an optional constructor parameter.
//! * `#[codable(constant = expr)]` (struct fields): the field always holds
//!   this value.  It is encoded but never decoded.
//!
//! `Option<T>` fields are decoded as `None` when their key is absent or
//! null and are not encoded when they are `None`.
//!
//! # Variant Attributes
//!
//! * `#[codable(rename = "...")]`: the tag value of the variant.
//! * `#[codable(alias = "...")]`: alternative tag values accepted when
//!   decoding.
//! * `#[codable(ignore)]`: the variant is never decoded and encoding it
//!   fails.
//!
//! # Memberwise Initializers
//!
//! `#[derive(MemberInit)]` generates `new` taking every required field.  For
//! every subset of the fields with a `default` or `initial` value an
//! additional `new_with_<a>_and_<b>` takes those fields too; the others fall
//! back to their value.  Constant fields are never parameters.  If two of
//! these names clash, the constructors are named after the positions of the
//! optional fields instead, as in `new_with_0_and_2`.
//!
//! ```
//! use codable::MemberInit;
//!
//! #[derive(MemberInit)]
//! pub struct Counter {
//!     name: String,
//!     #[codable(default = 1)]
//!     step: u32,
//!     #[codable(constant = 2)]
//!     version: u32,
//! }
//!
//! let counter = Counter::new("a".into());
//! assert_eq!((counter.step, counter.version), (1, 2));
//! let counter = Counter::new_with_step("b".into(), 5);
//! assert_eq!(counter.step, 5);
//! ```

/// Provides automatic deriving for [`Decode`](crate::Decode).
pub use codable_derive::Decode;

/// Provides automatic deriving for [`Encode`](crate::Encode).
pub use codable_derive::Encode;

/// Provides memberwise constructors for structs.
pub use codable_derive::MemberInit;
