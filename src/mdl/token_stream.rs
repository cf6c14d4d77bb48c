//! MDL tokenizer.
//!
//! Tokens are slices of the source text. There is no token buffer: `peek`
//! saves and restores the cursor, and nested blocks are walked by calling
//! [`TokenStream::enter_block`] / [`TokenStream::next_in_block`] on the same
//! stream from inside the loop of an outer block.
//!
//! ```text
//! Bone "Root" {          ->  Bone, Root, {,
//!     ObjectId 0,        ->  ObjectId, 0,
//!     Translation 1 {    ->  Translation, 1, {,
//!         Linear,        ->  Linear,
//!         0: { 0, 0, 0 } ->  0, {, 0, 0, 0, },
//!     }                  ->  },
//! }                      ->  }
//! ```

use std::str::FromStr;

use crate::util::{Error, Result, Vec2, Vec3};

/// Cursor over MDL source text.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    /// Line on which the last token returned by `read` started.
    token_line: usize,
}

#[inline]
fn is_delimiter(c: u8) -> bool {
    matches!(c, b' ' | b',' | b'\t' | b'\n' | b':' | b'\r')
}

impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str) -> Self {
        // A UTF-8 byte order mark is not part of the first token.
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        Self { source, pos: 0, line: 1, token_line: 1 }
    }

    /// 1-based line of the cursor, for error messages.
    ///
    /// Kept up to date by [`TokenStream::read`], so this is O(1).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Line on which the last token read started.
    pub fn token_line(&self) -> usize {
        self.token_line
    }

    /// Next token, or `None` at end of input.
    ///
    /// All bytes the tokenizer reacts to are ASCII, so slicing at them never
    /// splits a multi-byte character.
    pub fn read(&mut self) -> Result<Option<&'a str>> {
        let bytes = self.source.as_bytes();
        let mut start: Option<usize> = None;

        while self.pos < bytes.len() {
            let c = bytes[self.pos];

            if c == b'/' && bytes.get(self.pos + 1) == Some(&b'/') {
                if let Some(s) = start {
                    return Ok(Some(&self.source[s..self.pos]));
                }
                self.pos = match bytes[self.pos..].iter().position(|&b| b == b'\n') {
                    Some(n) => {
                        self.line += 1;
                        self.pos + n + 1
                    }
                    None => bytes.len(),
                };
            } else if c == b'"' {
                if let Some(s) = start {
                    return Ok(Some(&self.source[s..self.pos]));
                }
                self.token_line = self.line;
                let body = self.pos + 1;
                let Some(n) = bytes[body..].iter().position(|&b| b == b'"') else {
                    return Err(Error::UnexpectedEnd(self.line));
                };
                self.line += bytes[body..body + n].iter().filter(|&&b| b == b'\n').count();
                self.pos = body + n + 1;
                return Ok(Some(&self.source[body..body + n]));
            } else if is_delimiter(c) {
                if c == b'\n' {
                    self.line += 1;
                }
                self.pos += 1;
                if let Some(s) = start {
                    return Ok(Some(&self.source[s..self.pos - 1]));
                }
            } else if c == b'{' || c == b'}' {
                if let Some(s) = start {
                    return Ok(Some(&self.source[s..self.pos]));
                }
                self.token_line = self.line;
                self.pos += 1;
                return Ok(Some(&self.source[self.pos - 1..self.pos]));
            } else {
                if start.is_none() {
                    start = Some(self.pos);
                    self.token_line = self.line;
                }
                self.pos += 1;
            }
        }

        Ok(start.map(|s| &self.source[s..]))
    }

    /// Next token without consuming it.
    pub fn peek(&mut self) -> Result<Option<&'a str>> {
        let saved = (self.pos, self.line, self.token_line);
        let token = self.read();
        (self.pos, self.line, self.token_line) = saved;
        token
    }

    /// Next token; end of input is an error.
    pub fn read_token(&mut self) -> Result<&'a str> {
        self.read()?.ok_or_else(|| Error::UnexpectedEnd(self.line()))
    }

    /// Consume a token that must equal `expected`.
    pub fn expect(&mut self, expected: &str) -> Result<()> {
        let token = self.read_token()?;
        if token != expected {
            return Err(Error::UnexpectedToken {
                expected: expected.to_string(),
                actual: token.to_string(),
                line: self.token_line,
            });
        }
        Ok(())
    }

    /// Consume the `{` that opens a block.
    pub fn enter_block(&mut self) -> Result<()> {
        self.expect("{")
    }

    /// Next token inside the current block, or `None` once its `}` is consumed.
    pub fn next_in_block(&mut self) -> Result<Option<&'a str>> {
        let token = self.read_token()?;
        Ok(if token == "}" { None } else { Some(token) })
    }

    /// Parse one token as a number.
    pub fn read_number<T: FromStr>(&mut self) -> Result<T> {
        let token = self.read_token()?;
        token.parse().map_err(|_| Error::InvalidNumber {
            token: token.to_string(),
            line: self.token_line,
        })
    }

    pub fn read_int(&mut self) -> Result<i32> {
        self.read_number()
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_number()
    }

    pub fn read_float(&mut self) -> Result<f32> {
        self.read_number()
    }

    /// Read an integer, or `value` when the token is the word `keyword`
    /// (`GeosetId Multiple`, `GeosetAnimId None`).
    pub fn read_int_or(&mut self, keyword: &str, value: i32) -> Result<i32> {
        if self.peek()? == Some(keyword) {
            self.read()?;
            return Ok(value);
        }
        self.read_int()
    }

    /// Read `{ v0, v1, ... }` filling `values` exactly.
    pub fn read_float_slice(&mut self, values: &mut [f32]) -> Result<()> {
        self.enter_block()?;
        for value in values.iter_mut() {
            *value = self.read_float()?;
        }
        self.expect("}")
    }

    pub fn read_float_array<const N: usize>(&mut self) -> Result<[f32; N]> {
        let mut values = [0.0; N];
        self.read_float_slice(&mut values)?;
        Ok(values)
    }

    pub fn read_vec2(&mut self) -> Result<Vec2> {
        Ok(Vec2::from_array(self.read_float_array::<2>()?))
    }

    pub fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::from_array(self.read_float_array::<3>()?))
    }

    /// Read a `{ b, g, r }` color into red-green-blue order.
    pub fn read_color(&mut self) -> Result<[f32; 3]> {
        let [b, g, r] = self.read_float_array::<3>()?;
        Ok([r, g, b])
    }

    /// Read a keyframe value: one bare number for a single element, or a
    /// braced array otherwise.
    pub fn read_keyframe(&mut self, values: &mut [f32]) -> Result<()> {
        if let [value] = values {
            *value = self.read_float()?;
            Ok(())
        } else {
            self.read_float_slice(values)
        }
    }

    /// Read `{ a, b, c, ... }` with any number of elements.
    pub fn read_number_list<T: FromStr>(&mut self) -> Result<Vec<T>> {
        self.enter_block()?;
        let mut values = Vec::new();
        loop {
            match self.next_in_block()? {
                Some(token) => values.push(token.parse().map_err(|_| Error::InvalidNumber {
                    token: token.to_string(),
                    line: self.token_line,
                })?),
                None => return Ok(values),
            }
        }
    }

    /// Read `{ { x, y, z }, { x, y, z }, ... }` with any number of vectors.
    pub fn read_vector_list<const N: usize>(&mut self) -> Result<Vec<[f32; N]>> {
        self.enter_block()?;
        let mut vectors = Vec::new();
        loop {
            match self.peek()? {
                Some("}") => {
                    self.read()?;
                    return Ok(vectors);
                }
                Some(_) => vectors.push(self.read_float_array::<N>()?),
                None => return Err(Error::UnexpectedEnd(self.line())),
            }
        }
    }
}
