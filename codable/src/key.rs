/// A key into a keyed container.
///
/// The derive macros generate a private key enum per type whose variants
/// implement this trait; plain string slices work as keys too which is
/// convenient for hand written implementations.
pub trait CodingKey: Copy {
    /// Returns the raw string value of the key.
    fn as_str(&self) -> &str;
}

impl<'a> CodingKey for &'a str {
    fn as_str(&self) -> &str {
        self
    }
}
