use codable::{Encode, Error, ErrorKind, Value};

/// Serializes an encodable to JSON.
pub struct Serializer {
    out: String,
    indent: Option<&'static str>,
    depth: usize,
}

impl Default for Serializer {
    fn default() -> Serializer {
        Serializer::new()
    }
}

impl Serializer {
    /// Creates a new serializer producing compact output.
    pub fn new() -> Serializer {
        Serializer {
            out: String::new(),
            indent: None,
            depth: 0,
        }
    }

    /// Creates a new serializer that indents nested containers by two spaces.
    pub fn pretty() -> Serializer {
        Serializer {
            indent: Some("  "),
            ..Serializer::new()
        }
    }

    /// Serializes the given value.
    pub fn serialize(mut self, value: &dyn Encode) -> Result<String, Error> {
        let value = codable::to_value(value)?;
        self.write_value(&value)?;
        Ok(self.out)
    }

    fn write_value(&mut self, value: &Value) -> Result<(), Error> {
        match *value {
            Value::Null => self.write_str("null"),
            Value::Bool(true) => self.write_str("true"),
            Value::Bool(false) => self.write_str("false"),
            Value::Str(ref val) => self.write_escaped_str(val),
            Value::Bytes(_) => {
                return Err(Error::new(
                    ErrorKind::InvalidValue,
                    "JSON doesn't support bytes",
                ))
            }
            Value::U64(val) => {
                #[cfg(feature = "speedups")]
                {
                    self.write_str(itoa::Buffer::new().format(val))
                }
                #[cfg(not(feature = "speedups"))]
                {
                    self.write_display(val);
                }
            }
            Value::I64(val) => {
                #[cfg(feature = "speedups")]
                {
                    self.write_str(itoa::Buffer::new().format(val))
                }
                #[cfg(not(feature = "speedups"))]
                {
                    self.write_display(val);
                }
            }
            Value::F64(val) => {
                if val.is_finite() {
                    #[cfg(feature = "speedups")]
                    {
                        self.write_str(ryu::Buffer::new().format_finite(val))
                    }
                    #[cfg(not(feature = "speedups"))]
                    {
                        self.write_float(val)
                    }
                } else {
                    self.write_str("null")
                }
            }
            Value::Seq(ref items) => {
                self.write_char('[');
                self.depth += 1;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        self.write_char(',');
                    }
                    self.write_newline();
                    self.write_value(item)?;
                }
                self.depth -= 1;
                if !items.is_empty() {
                    self.write_newline();
                }
                self.write_char(']');
            }
            Value::Map(ref map) => {
                self.write_char('{');
                self.depth += 1;
                for (idx, (key, item)) in map.iter().enumerate() {
                    if idx > 0 {
                        self.write_char(',');
                    }
                    self.write_newline();
                    self.write_escaped_str(key);
                    self.write_char(':');
                    if self.indent.is_some() {
                        self.write_char(' ');
                    }
                    self.write_value(item)?;
                }
                self.depth -= 1;
                if !map.is_empty() {
                    self.write_newline();
                }
                self.write_char('}');
            }
        }
        Ok(())
    }

    fn write_newline(&mut self) {
        if let Some(indent) = self.indent {
            self.write_char('\n');
            for _ in 0..self.depth {
                self.write_str(indent);
            }
        }
    }

    #[cfg(not(feature = "speedups"))]
    fn write_float(&mut self, val: f64) {
        // floats without a fractional part still need to read back as floats
        if val.fract() == 0.0 && val.abs() < 1e16 {
            self.write_display(format_args!("{:.1}", val));
        } else {
            self.write_display(val);
        }
    }

    fn write_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    #[cfg(not(feature = "speedups"))]
    fn write_display<D: std::fmt::Display>(&mut self, s: D) {
        use std::fmt::Write;
        let _ = write!(self.out, "{}", s);
    }

    fn write_char(&mut self, c: char) {
        self.out.push(c);
    }

    fn write_escaped_str(&mut self, value: &str) {
        self.write_char('"');

        let bytes = value.as_bytes();
        let mut start = 0;

        for (i, &byte) in bytes.iter().enumerate() {
            let escape = ESCAPE[byte as usize];
            if escape == 0 {
                continue;
            }

            if start < i {
                self.write_str(&value[start..i]);
            }

            match escape {
                self::BB => self.write_str("\\b"),
                self::TT => self.write_str("\\t"),
                self::NN => self.write_str("\\n"),
                self::FF => self.write_str("\\f"),
                self::RR => self.write_str("\\r"),
                self::QU => self.write_str("\\\""),
                self::BS => self.write_str("\\\\"),
                self::U => {
                    static HEX_DIGITS: [u8; 16] = *b"0123456789abcdef";
                    self.write_str("\\u00");
                    self.write_char(HEX_DIGITS[(byte >> 4) as usize] as char);
                    self.write_char(HEX_DIGITS[(byte & 0xF) as usize] as char);
                }
                _ => unreachable!(),
            }

            start = i + 1;
        }

        if start != bytes.len() {
            self.write_str(&value[start..]);
        }

        self.write_char('"');
    }
}

const BB: u8 = b'b'; // \x08
const TT: u8 = b't'; // \x09
const NN: u8 = b'n'; // \x0A
const FF: u8 = b'f'; // \x0C
const RR: u8 = b'r'; // \x0D
const QU: u8 = b'"'; // \x22
const BS: u8 = b'\\'; // \x5C
const U: u8 = b'u'; // \x00...\x1F except the ones above

// Lookup table of escape sequences. A value of b'x' at index i means that byte
// i is escaped as "\x" in JSON. A value of 0 means that byte i is not escaped.
#[rustfmt::skip]
static ESCAPE: [u8; 256] = [
    //  1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
    U,  U,  U,  U,  U,  U,  U,  U, BB, TT, NN,  U, FF, RR,  U,  U, // 0
    U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U, // 1
    0,  0, QU,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // 2
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // 3
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // 4
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, BS,  0,  0,  0, // 5
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // 6
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // 7
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // 8
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // 9
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // A
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // B
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // C
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // D
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // E
    0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // F
];

/// Serializes a value to compact JSON.
pub fn to_string(value: &dyn Encode) -> Result<String, Error> {
    Serializer::new().serialize(value)
}

/// Serializes a value to indented JSON.
pub fn to_string_pretty(value: &dyn Encode) -> Result<String, Error> {
    Serializer::pretty().serialize(value)
}
