//! XML well-formedness via quick-xml.
//!
//! quick-xml is a pull parser and happily stops at EOF with elements still
//! open, so we keep our own element stack to catch unclosed tags, stray
//! text, and a missing or repeated root. A blank body is clean.

use async_trait::async_trait;
use hdlint_types::{LocalDiagnostic, Range};
use quick_xml::events::Event;
use quick_xml::Reader;

use super::{position_at, Validator, ValidatorError};

/// Reports the first well-formedness problem in an XML body.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlValidator;

#[async_trait]
impl Validator for XmlValidator {
    fn key(&self) -> &str {
        "xml"
    }

    async fn validate(&self, text: &str) -> Result<Vec<LocalDiagnostic>, ValidatorError> {
        Ok(check(text).into_iter().collect())
    }
}

fn check(text: &str) -> Option<LocalDiagnostic> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().check_end_names = true;

    let mut open: Vec<String> = Vec::new();
    let mut roots = 0usize;

    loop {
        let event_start = to_offset(reader.buffer_position());
        match reader.read_event() {
            Ok(Event::Start(tag)) => {
                if open.is_empty() {
                    roots += 1;
                    if roots > 1 {
                        return Some(error_at(text, event_start, "multiple root elements"));
                    }
                }
                open.push(String::from_utf8_lossy(tag.name().as_ref()).into_owned());
            }
            Ok(Event::Empty(_)) => {
                if open.is_empty() {
                    roots += 1;
                    if roots > 1 {
                        return Some(error_at(text, event_start, "multiple root elements"));
                    }
                }
            }
            Ok(Event::End(_)) => {
                open.pop();
            }
            Ok(Event::Text(content)) => {
                if open.is_empty() && !content.iter().all(u8::is_ascii_whitespace) {
                    let offset = event_start + leading_whitespace(&content);
                    return Some(error_at(text, offset, "text outside the root element"));
                }
            }
            Ok(Event::CData(_)) => {
                if open.is_empty() {
                    return Some(error_at(text, event_start, "CDATA outside the root element"));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                let offset = to_offset(reader.error_position());
                return Some(error_at(text, offset, &err.to_string()));
            }
        }
    }

    if let Some(name) = open.last() {
        return Some(error_at(text, text.len(), &format!("unclosed tag <{name}>")));
    }
    if roots == 0 && !text.trim().is_empty() {
        return Some(error_at(text, text.len(), "no root element"));
    }
    None
}

fn error_at(text: &str, offset: usize, message: &str) -> LocalDiagnostic {
    let at = position_at(text, offset);
    LocalDiagnostic::error(message, Range::single_char(at.line, at.character))
}

fn leading_whitespace(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_whitespace()).count()
}

fn to_offset<T>(position: T) -> usize
where
    usize: TryFrom<T>,
{
    usize::try_from(position).unwrap_or(usize::MAX)
}
