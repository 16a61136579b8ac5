pub mod kinds;
pub mod syntax;
pub mod validate;

use std::fmt;

/// The kind of declaration an attribute is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Struct,
    Enum,
    Field,
    Variant,
    VariantField,
}

impl DeclKind {
    pub const CONTAINERS: &'static [DeclKind] = &[DeclKind::Struct, DeclKind::Enum];
    pub const FIELDS: &'static [DeclKind] = &[DeclKind::Field, DeclKind::VariantField];
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeclKind::Struct => "a struct",
            DeclKind::Enum => "an enum",
            DeclKind::Field => "a struct field",
            DeclKind::Variant => "an enum variant",
            DeclKind::VariantField => "a variant field",
        })
    }
}
