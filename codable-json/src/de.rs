use codable::{Decode, Error, ErrorKind, Map, Value};

const MAX_DEPTH: usize = 128;

/// Parses JSON text into a [`Value`].
pub struct Deserializer<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Deserializer<'a> {
    /// Creates a new deserializer over the given text.
    pub fn new(input: &'a str) -> Deserializer<'a> {
        Deserializer {
            input,
            pos: 0,
            depth: 0,
        }
    }

    /// Parses the entire input as a single JSON value.
    pub fn parse(mut self) -> Result<Value, Error> {
        let value = self.parse_value()?;
        self.skip_whitespace();
        if self.pos != self.input.len() {
            return Err(self.error("trailing characters"));
        }
        Ok(value)
    }

    /// Parses the input and decodes it into `T`.
    pub fn deserialize<T: Decode>(self) -> Result<T, Error> {
        let value = self.parse()?;
        codable::from_value(&value)
    }

    fn error(&self, msg: &str) -> Error {
        Error::new(
            ErrorKind::Syntax,
            format!("{} at position {}", msg, self.pos),
        )
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn next(&mut self) -> Option<u8> {
        let rv = self.peek();
        if rv.is_some() {
            self.pos += 1;
        }
        rv
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\n' | b'\t' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), Error> {
        self.skip_whitespace();
        match self.next() {
            Some(b) if b == byte => Ok(()),
            Some(_) => {
                self.pos -= 1;
                Err(self.error(&format!("expected '{}'", byte as char)))
            }
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn expect_literal(&mut self, literal: &str, value: Value) -> Result<Value, Error> {
        if self.input[self.pos..].starts_with(literal) {
            self.pos += literal.len();
            Ok(value)
        } else {
            Err(self.error("invalid literal"))
        }
    }

    fn parse_value(&mut self) -> Result<Value, Error> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'n') => self.expect_literal("null", Value::Null),
            Some(b't') => self.expect_literal("true", Value::Bool(true)),
            Some(b'f') => self.expect_literal("false", Value::Bool(false)),
            Some(b'"') => self.parse_str().map(Value::Str),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(b'[') => self.nested(Self::parse_seq),
            Some(b'{') => self.nested(Self::parse_map),
            Some(_) => Err(self.error("expected value")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn nested<F>(&mut self, f: F) -> Result<Value, Error>
    where
        F: FnOnce(&mut Self) -> Result<Value, Error>,
    {
        if self.depth == MAX_DEPTH {
            return Err(self.error("recursion limit exceeded"));
        }
        self.depth += 1;
        let rv = f(self);
        self.depth -= 1;
        rv
    }

    fn parse_seq(&mut self) -> Result<Value, Error> {
        self.expect(b'[')?;
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(Value::Seq(items));
        }
        loop {
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.next() {
                Some(b',') => continue,
                Some(b']') => return Ok(Value::Seq(items)),
                _ => return Err(self.error("expected ',' or ']'")),
            }
        }
    }

    fn parse_map(&mut self) -> Result<Value, Error> {
        self.expect(b'{')?;
        let mut map = Map::new();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(Value::Map(map));
        }
        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(self.error("expected string key"));
            }
            let key = self.parse_str()?;
            self.expect(b':')?;
            let value = self.parse_value()?;
            // later duplicates win
            map.insert(key, value);
            self.skip_whitespace();
            match self.next() {
                Some(b',') => continue,
                Some(b'}') => return Ok(Value::Map(map)),
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    fn parse_str(&mut self) -> Result<String, Error> {
        self.pos += 1;
        let mut buf = String::new();
        let mut start = self.pos;
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated string")),
                Some(b'"') => {
                    buf.push_str(&self.input[start..self.pos]);
                    self.pos += 1;
                    return Ok(buf);
                }
                Some(b'\\') => {
                    buf.push_str(&self.input[start..self.pos]);
                    self.pos += 1;
                    self.parse_escape(&mut buf)?;
                    start = self.pos;
                }
                Some(0x00..=0x1f) => return Err(self.error("control character in string")),
                Some(_) => self.pos += 1,
            }
        }
    }

    fn parse_escape(&mut self, buf: &mut String) -> Result<(), Error> {
        let c = match self.next() {
            Some(b'"') => '"',
            Some(b'\\') => '\\',
            Some(b'/') => '/',
            Some(b'b') => '\x08',
            Some(b'f') => '\x0c',
            Some(b'n') => '\n',
            Some(b'r') => '\r',
            Some(b't') => '\t',
            Some(b'u') => {
                let high = self.parse_hex4()?;
                let code = match high {
                    0xd800..=0xdbff => {
                        if self.next() != Some(b'\\') || self.next() != Some(b'u') {
                            return Err(self.error("unpaired surrogate"));
                        }
                        let low = self.parse_hex4()?;
                        if !(0xdc00..=0xdfff).contains(&low) {
                            return Err(self.error("unpaired surrogate"));
                        }
                        0x10000 + ((high - 0xd800) << 10) + (low - 0xdc00)
                    }
                    0xdc00..=0xdfff => return Err(self.error("unpaired surrogate")),
                    code => code,
                };
                char::from_u32(code).ok_or_else(|| self.error("invalid unicode escape"))?
            }
            _ => return Err(self.error("invalid escape")),
        };
        buf.push(c);
        Ok(())
    }

    fn parse_hex4(&mut self) -> Result<u32, Error> {
        let digits = self
            .input
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| self.error("unexpected end of input"))?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(self.error("invalid unicode escape"));
        }
        let code =
            u32::from_str_radix(digits, 16).map_err(|_| self.error("invalid unicode escape"))?;
        self.pos += 4;
        Ok(code)
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while let Some(b'0'..=b'9') = self.peek() {
            self.pos += 1;
        }
        self.pos - start
    }

    fn parse_number(&mut self) -> Result<Value, Error> {
        let start = self.pos;
        let negative = self.peek() == Some(b'-');
        if negative {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => {
                self.skip_digits();
            }
            _ => return Err(self.error("invalid number")),
        }
        let mut float = false;
        if self.peek() == Some(b'.') {
            float = true;
            self.pos += 1;
            if self.skip_digits() == 0 {
                return Err(self.error("invalid number"));
            }
        }
        if let Some(b'e' | b'E') = self.peek() {
            float = true;
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            if self.skip_digits() == 0 {
                return Err(self.error("invalid number"));
            }
        }

        let text = &self.input[start..self.pos];
        if !float {
            if negative {
                if let Ok(value) = text.parse::<i64>() {
                    return Ok(Value::I64(value));
                }
            } else if let Ok(value) = text.parse::<u64>() {
                return Ok(Value::U64(value));
            }
        }
        text.parse::<f64>()
            .map(Value::F64)
            .map_err(|_| self.error("invalid number"))
    }
}

/// Deserializes JSON text into a decodable value.
pub fn from_str<T: Decode>(s: &str) -> Result<T, Error> {
    Deserializer::new(s).deserialize()
}
