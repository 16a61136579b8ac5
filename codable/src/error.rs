//! Error interface.
use std::borrow::Cow;
use std::fmt;

use crate::path::Path;

/// Describes the kind of error.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ErrorKind {
    /// The value had a different shape than the one expected.
    TypeMismatch,
    /// A required key was absent from a keyed container.
    KeyNotFound,
    /// A key was present but held `null` where a value was required.
    ValueNotFound,
    /// A number did not fit into the target type.
    OutOfRange,
    /// A discriminator did not name any known variant.
    UnknownVariant,
    /// No variant of an untagged enum could decode the value.
    NoMatchingVariant,
    /// The value cannot be represented (for instance an ignored variant).
    InvalidValue,
    /// The input text was not well formed.
    Syntax,
}

/// An error for codable.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    msg: Cow<'static, str>,
    path: Option<Path>,
}

impl Error {
    /// Creates a new error.
    pub fn new<M: Into<Cow<'static, str>>>(kind: ErrorKind, msg: M) -> Error {
        Error {
            kind,
            msg: msg.into(),
            path: None,
        }
    }

    /// Attaches the coding path where the error happened.
    ///
    /// If the error already carries a path the innermost one is kept.
    pub fn at(mut self, path: &Path) -> Error {
        if self.path.is_none() && !path.is_empty() {
            self.path = Some(path.clone());
        }
        self
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message without the path.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the coding path of the error if known.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path {
            Some(ref path) => write!(f, "{:?} at {}: {}", self.kind, path, self.msg),
            None => write!(f, "{:?}: {}", self.kind, self.msg),
        }
    }
}

impl std::error::Error for Error {}
