//! Left-to-right scanning decoder.
//!
//! The decoder never looks ahead further than the current token: it reads
//! one complete token at a time and, while still before the NUL separator,
//! appends each to a growing dictionary under the next sequential `$n`.
//! Implicitly this walks three phases (accumulating the dictionary,
//! decoding the single post-separator value, and done) with the NUL byte
//! as the only transition trigger.

use crate::error::elide;
use crate::number::{is_valid_bigint_body, is_valid_number_body, parse_bigint, parse_number};
use crate::symbols::{is_token_terminator, needs_escape};
use crate::{Log, TsionError, Value};

/// Scans a single Tsion payload into a [`Value`] tree.
///
/// Lives only for the duration of one [`decode`](crate::decode) call; its
/// `dictionary` grows as the payload's prefix is read and is then used to
/// resolve every `$n` back-reference encountered afterward.
pub struct Decoder<'a> {
    source: &'a str,
    pos: usize,
    dictionary: Vec<Value>,
    log: Log<&'static str>,
}

impl<'a> Decoder<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            dictionary: Vec::new(),
            log: Log::None,
        }
    }

    pub fn with_log(source: &'a str, log: Log<&'static str>) -> Self {
        Self {
            source,
            pos: 0,
            dictionary: Vec::new(),
            log,
        }
    }

    pub fn decode(mut self) -> Result<Value, TsionError> {
        loop {
            if self.at_end() {
                return self.finish_content_only();
            }

            if self.peek() == Some('\u{0}') {
                self.advance();
                return self.finish_after_separator();
            }

            let value = self.decode_token()?;
            self.log.log_token(self.pos, "dictionary entry");
            self.dictionary.push(value);
        }
    }

    fn finish_content_only(mut self) -> Result<Value, TsionError> {
        if self.dictionary.len() != 1 {
            return Err(self.fail(0, "Bad input".to_string()));
        }

        Ok(self.dictionary.pop().unwrap())
    }

    fn finish_after_separator(&mut self) -> Result<Value, TsionError> {
        let value = self.decode_token()?;

        if !self.at_end() {
            return Err(self.fail(self.pos, "Bad input: trailing data after content".to_string()));
        }

        Ok(value)
    }

    fn decode_token(&mut self) -> Result<Value, TsionError> {
        match self.peek() {
            None => Err(self.fail(self.pos, "Unexpected end of input".to_string())),
            Some('$') => self.decode_ref(),
            Some(':') => self.decode_constant(),
            Some('&') => self.decode_string(),
            Some('#') => self.decode_number(),
            Some('%') => self.decode_bigint(),
            Some('[') => self.decode_array(),
            Some('{') => self.decode_object(),
            Some(c) => {
                let start = self.pos;
                self.advance();
                Err(self.fail(start, format!("Unexpected character '{}'", c)))
            }
        }
    }

    fn decode_ref(&mut self) -> Result<Value, TsionError> {
        let start = self.pos;
        self.advance(); // '$'
        let digits = self.read_plain_body();

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self.fail(start, format!("Invalid back-reference '{}'", elide(&digits))));
        }

        let index: usize = digits
            .parse()
            .map_err(|_| self.fail(start, format!("Invalid back-reference '{}'", elide(&digits))))?;

        self.dictionary
            .get(index)
            .cloned()
            .ok_or_else(|| self.fail(start, format!("Unknown back-reference '${}'", index)))
    }

    fn decode_constant(&mut self) -> Result<Value, TsionError> {
        let start = self.pos;
        self.advance(); // ':'
        let name = self.read_plain_body();

        match name.as_str() {
            "n" => Ok(Value::Null),
            "t" => Ok(Value::Bool(true)),
            "f" => Ok(Value::Bool(false)),
            "inf" => Ok(Value::Number(f64::INFINITY)),
            "ninf" => Ok(Value::Number(f64::NEG_INFINITY)),
            "nan" => Ok(Value::Number(f64::NAN)),
            _ => Err(self.fail(start, format!("Unknown constant ':{}'", elide(&name)))),
        }
    }

    fn decode_number(&mut self) -> Result<Value, TsionError> {
        let start = self.pos;
        self.advance(); // '#'
        let body = self.read_plain_body();

        if !is_valid_number_body(&body) {
            return Err(self.fail(start, format!("Invalid number literal '{}'", elide(&body))));
        }

        let n = parse_number(&body)
            .ok_or_else(|| self.fail(start, format!("Invalid number literal '{}'", elide(&body))))?;

        Ok(Value::Number(n))
    }

    fn decode_bigint(&mut self) -> Result<Value, TsionError> {
        let start = self.pos;
        self.advance(); // '%'
        let body = self.read_plain_body();

        if !is_valid_bigint_body(&body) {
            return Err(self.fail(start, format!("Invalid bigint literal '{}'", elide(&body))));
        }

        let n = parse_bigint(&body)
            .ok_or_else(|| self.fail(start, format!("Invalid bigint literal '{}'", elide(&body))))?;

        Ok(Value::BigInt(n))
    }

    fn decode_string(&mut self) -> Result<Value, TsionError> {
        self.advance(); // '&'
        let body = self.read_string_body()?;
        Ok(Value::String(body))
    }

    fn decode_array(&mut self) -> Result<Value, TsionError> {
        let start = self.pos;
        self.advance(); // '['
        let mut items = Vec::new();

        loop {
            if self.peek() == Some(']') {
                self.advance();
                return Ok(Value::Array(items));
            }

            if self.at_end() {
                return Err(self.fail(start, "Missing ']'".to_string()));
            }

            items.push(self.decode_token()?);
        }
    }

    fn decode_object(&mut self) -> Result<Value, TsionError> {
        let start = self.pos;
        self.advance(); // '{'

        if self.peek() == Some('}') {
            self.advance();
            return Ok(Value::Object(Vec::new()));
        }

        if self.at_end() {
            return Err(self.fail(start, "Missing '}'".to_string()));
        }

        let key_start = self.pos;
        let key_token = self.decode_token()?;

        let keys: Vec<String> = match key_token {
            Value::String(key) => vec![key],
            Value::Array(items) if items.len() >= 2 && items.iter().all(|v| matches!(v, Value::String(_))) => items
                .into_iter()
                .map(|v| match v {
                    Value::String(s) => s,
                    _ => unreachable!(),
                })
                .collect(),
            _ => return Err(self.fail(key_start, "Invalid key or list of keys".to_string())),
        };

        let mut values = Vec::new();

        loop {
            if self.peek() == Some('}') {
                self.advance();
                break;
            }

            if self.at_end() {
                return Err(self.fail(start, "Missing '}'".to_string()));
            }

            values.push(self.decode_token()?);
        }

        if values.len() != keys.len() {
            return Err(self.fail(start, "Unexpected number of values".to_string()));
        }

        Ok(Value::Object(keys.into_iter().zip(values).collect()))
    }

    /// Consumes token characters (anything that is not a sigil, delimiter,
    /// NUL, or end-of-input) until the terminator.
    fn read_plain_body(&mut self) -> String {
        let mut body = String::new();

        while let Some(c) = self.peek() {
            if is_token_terminator(c) {
                break;
            }

            body.push(c);
            self.advance();
        }

        body
    }

    /// Like [`read_plain_body`](Self::read_plain_body) but honors
    /// backslash escaping: while escaping is active, any character
    /// (including sigils and delimiters) is part of the body.
    fn read_string_body(&mut self) -> Result<String, TsionError> {
        let mut body = String::new();

        loop {
            match self.peek() {
                None => break,
                Some('\\') => {
                    let escape_start = self.pos;
                    self.advance();

                    match self.peek() {
                        None => {
                            return Err(self.fail(escape_start, "Unexpected end of input after '\\'".to_string()))
                        }
                        Some(c) if needs_escape(c) => {
                            body.push(c);
                            self.advance();
                        }
                        Some(c) => {
                            return Err(self.fail(
                                escape_start,
                                format!("Invalid escape character '{}'", elide(&c.to_string())),
                            ))
                        }
                    }
                }
                Some(c) if is_token_terminator(c) => break,
                Some(c) => {
                    body.push(c);
                    self.advance();
                }
            }
        }

        Ok(body)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn fail(&mut self, pointer: usize, message: String) -> TsionError {
        self.log.log_failure(pointer, &message);
        TsionError::new(pointer, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;

    #[test]
    fn decodes_constants() {
        assert_eq!(decode(":n").unwrap(), Value::Null);
        assert_eq!(decode(":t").unwrap(), Value::Bool(true));
        assert_eq!(decode(":f").unwrap(), Value::Bool(false));
        assert!(matches!(decode(":nan").unwrap(), Value::Number(n) if n.is_nan()));
        assert_eq!(decode(":inf").unwrap(), Value::Number(f64::INFINITY));
        assert_eq!(decode(":ninf").unwrap(), Value::Number(f64::NEG_INFINITY));
    }

    #[test]
    fn rejects_unknown_constant() {
        assert!(decode(":foo").is_err());
    }

    #[test]
    fn rejects_missing_closing_bracket() {
        assert!(decode("[&hello").is_err());
    }

    #[test]
    fn rejects_object_with_key_but_no_value() {
        assert!(decode("{&k}").is_err());
    }

    #[test]
    fn rejects_invalid_number() {
        assert!(decode("#01").is_err());
    }

    #[test]
    fn rejects_unknown_back_reference() {
        assert!(decode("$5").is_err());
    }

    #[test]
    fn rejects_invalid_escape() {
        assert!(decode("&abc\\q").is_err());
    }

    #[test]
    fn rejects_multiple_top_level_tokens_without_separator() {
        assert!(decode(":n:t").is_err());
    }

    #[test]
    fn decodes_dictionary_and_content() {
        let value = decode("&a\u{0}[$0$0]").unwrap();
        assert_eq!(
            value,
            Value::Array(vec![Value::String("a".into()), Value::String("a".into())])
        );
    }

    #[test]
    fn decodes_empty_object() {
        assert_eq!(decode("{}").unwrap(), Value::Object(Vec::new()));
    }

    #[test]
    fn decodes_multi_key_object() {
        let value = decode("{[&x&y]#1#2}").unwrap();
        assert_eq!(
            value,
            Value::Object(vec![
                ("x".to_string(), Value::Number(1.0)),
                ("y".to_string(), Value::Number(2.0)),
            ])
        );
    }

    #[test]
    fn preserves_key_order() {
        let value = decode("{[&b&a]#1#2}").unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
