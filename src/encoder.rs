//! Depth-first encoding, duplicate detection and dictionary rewriting.
//!
//! Rather than building the intermediate form as raw text sprinkled with
//! `?n`/`+n` placeholder substrings and re-scanning it with a regex during
//! the rewrite pass, each structure body here is kept as a small sequence
//! of [`Segment`]s: literal text the encoder already knows is final, or a
//! reference to a literal or structure map entry. Resolving a body is then
//! a direct substitution over known positions instead of a textual scan,
//! which sidesteps having to prove that a `?3`-shaped run of characters
//! occurring inside a string's own (unescaped) content can never be
//! confused for a placeholder. `?`/`+` never exist in emitted text.

use crate::ordered_map::OrderedMap;
use crate::symbols::needs_escape;
use crate::{Log, Value};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Segment {
    /// Already-final text: a constant token, a delimiter, or a brace.
    Text(String),
    /// A reference to `literal_map`'s entry at this index.
    Literal(usize),
    /// A reference to `structure_map`'s entry at this index.
    Structure(usize),
}

/// Depth-first encoder for a single [`encode`](crate::encode) call.
///
/// Interns every literal and structure it visits, then performs a
/// duplicate-detection and rewrite pass to produce the final
/// `dictionary NUL content` (or bare `content`) text.
pub struct Encoder {
    literal_map: OrderedMap<String>,
    structure_map: OrderedMap<Vec<Segment>>,
    log: Log<&'static str>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            literal_map: OrderedMap::new(),
            structure_map: OrderedMap::new(),
            log: Log::None,
        }
    }

    pub fn with_log(log: Log<&'static str>) -> Self {
        Self {
            literal_map: OrderedMap::new(),
            structure_map: OrderedMap::new(),
            log,
        }
    }

    /// Encodes `value`, consuming this encoder (its interning maps exist
    /// only for the duration of one call).
    pub fn encode(mut self, value: &Value) -> String {
        let content = self.encode_value(value);

        let (duplicate_literal, duplicate_structure) = self.detect_duplicates();

        self.rewrite(content, &duplicate_literal, &duplicate_structure)
    }

    fn encode_value(&mut self, value: &Value) -> Segment {
        match value {
            Value::Null => Segment::Text(":n".to_string()),
            Value::Bool(true) => Segment::Text(":t".to_string()),
            Value::Bool(false) => Segment::Text(":f".to_string()),
            Value::Number(n) if n.is_nan() => Segment::Text(":nan".to_string()),
            Value::Number(n) if *n == f64::INFINITY => Segment::Text(":inf".to_string()),
            Value::Number(n) if *n == f64::NEG_INFINITY => Segment::Text(":ninf".to_string()),
            Value::Number(n) => {
                let text = format!("#{}", crate::number::format_number(*n));
                Segment::Literal(self.intern_literal(text))
            }
            Value::BigInt(n) => {
                let text = format!("%{}", crate::number::format_bigint(n));
                Segment::Literal(self.intern_literal(text))
            }
            Value::String(s) => {
                let text = format!("&{}", escape_string(s));
                Segment::Literal(self.intern_literal(text))
            }
            Value::Array(items) => {
                let mut segments = vec![Segment::Text("[".to_string())];

                for item in items {
                    segments.push(self.encode_value(item));
                }

                segments.push(Segment::Text("]".to_string()));

                Segment::Structure(self.intern_structure(segments))
            }
            Value::Object(entries) => {
                let segments = self.encode_object(entries);
                Segment::Structure(self.intern_structure(segments))
            }
        }
    }

    /// Chooses between the empty, single-entry and multi-entry object
    /// shapes by key count. A two-key-or-more object wraps its keys in an
    /// array structure; a one-key object does not. The asymmetry is
    /// deliberate and must be preserved.
    fn encode_object(&mut self, entries: &[(String, Value)]) -> Vec<Segment> {
        match entries.len() {
            0 => vec![Segment::Text("{}".to_string())],
            1 => {
                let (key, value) = &entries[0];
                let key_text = format!("&{}", escape_string(key));
                let key_seg = Segment::Literal(self.intern_literal(key_text));
                let value_seg = self.encode_value(value);

                vec![Segment::Text("{".to_string()), key_seg, value_seg, Segment::Text("}".to_string())]
            }
            _ => {
                let mut key_segments = vec![Segment::Text("[".to_string())];

                for (key, _) in entries {
                    let key_text = format!("&{}", escape_string(key));
                    key_segments.push(Segment::Literal(self.intern_literal(key_text)));
                }

                key_segments.push(Segment::Text("]".to_string()));

                let key_array_seg = Segment::Structure(self.intern_structure(key_segments));

                let mut segments = vec![Segment::Text("{".to_string()), key_array_seg];

                for (_, value) in entries {
                    segments.push(self.encode_value(value));
                }

                segments.push(Segment::Text("}".to_string()));

                segments
            }
        }
    }

    fn intern_literal(&mut self, text: String) -> usize {
        let index = self.literal_map.intern(text);
        self.log.log_intern(&format!("?{}", index), self.literal_map.key_at(index).unwrap());
        index
    }

    fn intern_structure(&mut self, segments: Vec<Segment>) -> usize {
        self.structure_map.intern(segments)
    }

    /// Counts every `Literal`/`Structure` reference occurring inside a
    /// `structureMap` body. The root `content` is intentionally excluded
    /// from this count: a placeholder referenced once at the root and
    /// never from inside a structure is never lifted.
    fn detect_duplicates(&self) -> (Vec<bool>, Vec<bool>) {
        let mut literal_counts = vec![0usize; self.literal_map.len()];
        let mut structure_counts = vec![0usize; self.structure_map.len()];

        for index in 0..self.structure_map.len() {
            let segments = self.structure_map.key_at(index).unwrap();

            for segment in segments {
                match segment {
                    Segment::Literal(i) => literal_counts[*i] += 1,
                    Segment::Structure(i) => structure_counts[*i] += 1,
                    Segment::Text(_) => {}
                }
            }
        }

        (
            literal_counts.into_iter().map(|c| c >= 2).collect(),
            structure_counts.into_iter().map(|c| c >= 2).collect(),
        )
    }

    /// Performs the rewrite pass: literals first (insertion order), then
    /// structures (depth-first post-order == structureMap insertion
    /// order), then the root content, in exactly the order the decoder's
    /// sequential `$0, $1, $2, …` numbering lines up.
    fn rewrite(
        &mut self,
        content: Segment,
        duplicate_literal: &[bool],
        duplicate_structure: &[bool],
    ) -> String {
        let mut dictionary = String::new();
        let mut next_dollar = 0usize;

        let mut literal_dollar: Vec<Option<usize>> = vec![None; self.literal_map.len()];
        let mut structure_dollar: Vec<Option<usize>> = vec![None; self.structure_map.len()];
        let mut resolved_structure: Vec<Option<String>> = vec![None; self.structure_map.len()];

        for index in 0..self.literal_map.len() {
            if duplicate_literal[index] {
                let dollar = next_dollar;
                next_dollar += 1;
                literal_dollar[index] = Some(dollar);

                let text = self.literal_map.key_at(index).unwrap();
                self.log.log_promote(&format!("?{}", index), dollar);
                dictionary.push_str(text);
            }
        }

        for index in 0..self.structure_map.len() {
            let segments = self.structure_map.key_at(index).unwrap().clone();
            let resolved = Self::resolve_segments(&segments, &literal_dollar, &structure_dollar, &resolved_structure, &self.literal_map);
            resolved_structure[index] = Some(resolved.clone());

            if duplicate_structure[index] {
                let dollar = next_dollar;
                next_dollar += 1;
                structure_dollar[index] = Some(dollar);

                self.log.log_promote(&format!("+{}", index), dollar);
                dictionary.push_str(&resolved);
            }
        }

        let content_text = Self::resolve_segment(&content, &literal_dollar, &structure_dollar, &resolved_structure, &self.literal_map);

        if dictionary.is_empty() {
            content_text
        } else {
            format!("{}\u{0}{}", dictionary, content_text)
        }
    }

    fn resolve_segments(
        segments: &[Segment],
        literal_dollar: &[Option<usize>],
        structure_dollar: &[Option<usize>],
        resolved_structure: &[Option<String>],
        literal_map: &OrderedMap<String>,
    ) -> String {
        segments
            .iter()
            .map(|segment| {
                Self::resolve_segment(segment, literal_dollar, structure_dollar, resolved_structure, literal_map)
            })
            .collect()
    }

    fn resolve_segment(
        segment: &Segment,
        literal_dollar: &[Option<usize>],
        structure_dollar: &[Option<usize>],
        resolved_structure: &[Option<String>],
        literal_map: &OrderedMap<String>,
    ) -> String {
        match segment {
            Segment::Text(s) => s.clone(),
            Segment::Literal(i) => match literal_dollar[*i] {
                Some(dollar) => format!("${}", dollar),
                None => literal_map.key_at(*i).unwrap().clone(),
            },
            Segment::Structure(i) => match structure_dollar[*i] {
                Some(dollar) => format!("${}", dollar),
                None => resolved_structure[*i].clone().unwrap(),
            },
        }
    }
}

/// Backslash-escapes every reserved character in `s`. No other escape
/// forms exist.
fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());

    for c in s.chars() {
        if needs_escape(c) {
            out.push('\\');
        }

        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;

    fn roundtrip(value: Value) {
        let text = Encoder::new().encode(&value);
        let decoded = decode(&text).expect("decode should succeed");
        assert_eq!(decoded, value, "round trip mismatch for text {:?}", text);
    }

    #[test]
    fn encodes_constants() {
        assert_eq!(Encoder::new().encode(&Value::Null), ":n");
        assert_eq!(Encoder::new().encode(&Value::Bool(true)), ":t");
        assert_eq!(Encoder::new().encode(&Value::Bool(false)), ":f");
        assert_eq!(Encoder::new().encode(&Value::Number(f64::NAN)), ":nan");
        assert_eq!(Encoder::new().encode(&Value::Number(f64::INFINITY)), ":inf");
        assert_eq!(Encoder::new().encode(&Value::Number(f64::NEG_INFINITY)), ":ninf");
    }

    #[test]
    fn encodes_leaves() {
        assert_eq!(Encoder::new().encode(&Value::String("hello".into())), "&hello");
        assert_eq!(Encoder::new().encode(&Value::Number(42.0)), "#42");
    }

    #[test]
    fn minimal_dictionary_when_nothing_repeats() {
        let value = Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]);
        let text = Encoder::new().encode(&value);
        assert!(!text.contains('\u{0}'));
        assert!(!text.contains('$'));
    }

    #[test]
    fn duplicate_array_elements_are_lifted() {
        let value = Value::Array(vec![Value::String("a".into()), Value::String("a".into())]);
        let text = Encoder::new().encode(&value);
        assert!(text.contains('\u{0}'));
        assert!(text.contains('$'));
        roundtrip(value);
    }

    #[test]
    fn duplicate_structures_are_lifted_once() {
        let shared = Value::Object(vec![("k".to_string(), Value::Number(1.0))]);
        let value = Value::Array(vec![shared.clone(), shared]);
        let text = Encoder::new().encode(&value);

        // the structure body should appear exactly once in the dictionary
        let dict = text.split('\u{0}').next().unwrap();
        assert_eq!(dict.matches("{&k#1}").count(), 1);

        roundtrip(value);
    }

    #[test]
    fn root_only_reference_is_not_lifted() {
        // a value referenced once, only at the root, is never promoted
        let value = Value::String("solo".into());
        let text = Encoder::new().encode(&value);
        assert_eq!(text, "&solo");
    }

    #[test]
    fn single_key_object_has_no_wrapper() {
        let value = Value::Object(vec![("x".to_string(), Value::Number(1.0))]);
        assert_eq!(Encoder::new().encode(&value), "{&x#1}");
    }

    #[test]
    fn multi_key_object_wraps_keys_in_array() {
        let value = Value::Object(vec![
            ("x".to_string(), Value::Number(1.0)),
            ("y".to_string(), Value::Number(2.0)),
        ]);
        assert_eq!(Encoder::new().encode(&value), "{[&x&y]#1#2}");
    }

    #[test]
    fn escapes_reserved_characters_in_strings() {
        let value = Value::String("a:b$c&d#e%f[g]h{i}j\\k\0l\tm\nn\ro".into());
        roundtrip(value);
    }

    #[test]
    fn roundtrips_nested_trees() {
        roundtrip(Value::Array(vec![
            Value::Object(vec![
                ("k".to_string(), Value::Number(1.0)),
                ("list".to_string(), Value::Array(vec![Value::Null, Value::Bool(true)])),
            ]),
            Value::BigInt(num_bigint::BigInt::from(-123456789012345678_i128)),
        ]));
    }
}
