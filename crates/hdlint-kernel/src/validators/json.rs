//! JSON well-formedness via serde_json.
//!
//! Besides syntax errors, a key repeated within one object is reported as a
//! warning. Either way only the first problem is reported: serde_json stops
//! at the first error.

use std::collections::HashSet;
use std::fmt;

use async_trait::async_trait;
use hdlint_types::{LocalDiagnostic, Range, Severity};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::error::Category;

use super::{offset_of, position_at, strip_location, Validator, ValidatorError};

/// Reports the first JSON syntax error or duplicate key in a body.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonValidator;

#[async_trait]
impl Validator for JsonValidator {
    fn key(&self) -> &str {
        "json"
    }

    async fn validate(&self, text: &str) -> Result<Vec<LocalDiagnostic>, ValidatorError> {
        Ok(check(text).into_iter().collect())
    }
}

fn check(text: &str) -> Option<LocalDiagnostic> {
    // An empty heredoc body has nothing to complain about.
    if text.trim().is_empty() {
        return None;
    }

    let err = serde_json::from_str::<Checked>(text).err()?;
    let mut offset = offset_of(
        text,
        err.line().saturating_sub(1),
        err.column().saturating_sub(1),
    );
    let bytes = text.as_bytes();

    let severity = if err.classify() == Category::Data {
        // Reported just past the key; move back to its opening quote.
        if bytes.get(offset) != Some(&b'"') && offset > 0 && bytes.get(offset - 1) == Some(&b'"') {
            offset -= 1;
        }
        if bytes.get(offset) == Some(&b'"') {
            if let Some(open) = text[..offset].rfind('"') {
                offset = open;
            }
        }
        Severity::Warning
    } else {
        // `{"a":1,}` fails on the brace; point at the trailing comma instead.
        if matches!(bytes.get(offset), Some(b'}' | b']')) {
            let before = text[..offset].trim_end();
            if before.ends_with(',') {
                offset = before.len() - 1;
            }
        }
        Severity::Error
    };

    // Skip from blank space to the next token on the same line.
    while matches!(bytes.get(offset), Some(b' ' | b'\t' | b'\r')) {
        offset += 1;
    }

    let at = position_at(text, offset);
    let message = err.to_string();
    Some(LocalDiagnostic::new(
        severity,
        strip_location(&message),
        Range::single_char(at.line, at.character),
    ))
}

/// Any JSON value, rejecting objects that repeat a key.
struct Checked;

impl<'de> Deserialize<'de> for Checked {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(CheckedVisitor)
    }
}

struct CheckedVisitor;

impl<'de> Visitor<'de> for CheckedVisitor {
    type Value = Checked;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Checked, E> {
        Ok(Checked)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Checked, E> {
        Ok(Checked)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Checked, E> {
        Ok(Checked)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Checked, E> {
        Ok(Checked)
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Checked, E> {
        Ok(Checked)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Checked, E> {
        Ok(Checked)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Checked, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<Checked>()?.is_some() {}
        Ok(Checked)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Checked, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut seen = HashSet::new();
        while let Some(key) = map.next_key::<String>()? {
            if seen.contains(&key) {
                return Err(de::Error::custom(format_args!("duplicate object key `{key}`")));
            }
            map.next_value::<Checked>()?;
            seen.insert(key);
        }
        Ok(Checked)
    }
}
