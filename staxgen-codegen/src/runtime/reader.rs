//! StAX-style pull reader over `quick-xml`.

use std::fmt;

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use super::ParseError;

/// Line and column (both 1-based) of a reader event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    fn at(src: &str, offset: usize) -> Self {
        let before = &src[..floor_char_boundary(src, offset)];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(nl) => before[nl + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Pull reader with the two operations generated parsers use:
/// [`next_tag`](Self::next_tag) and [`element_text`](Self::element_text).
pub struct PullReader<'x> {
    src: &'x str,
    reader: Reader<&'x [u8]>,
    local_name: String,
    /// Set after a self-closing tag: the matching end is still to come.
    pending_end: bool,
    offset: usize,
}

impl<'x> PullReader<'x> {
    pub fn new(src: &'x str) -> Self {
        let mut reader = Reader::from_str(src);
        reader.config_mut().trim_text(false);
        Self {
            src,
            reader,
            local_name: String::new(),
            pending_end: false,
            offset: 0,
        }
    }

    /// Local name of the most recent start tag.
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Location of the most recent event.
    pub fn location(&self) -> Location {
        Location::at(self.src, self.offset)
    }

    /// Skip whitespace, comments and processing instructions up to the next
    /// tag. Returns `true` at a start tag and `false` at an end tag.
    pub fn next_tag(&mut self) -> Result<bool, ParseError> {
        if self.pending_end {
            self.pending_end = false;
            return Ok(false);
        }
        loop {
            match self.read()? {
                Event::Start(e) => {
                    self.local_name = self.name_of(&e)?;
                    return Ok(true);
                }
                Event::Empty(e) => {
                    self.local_name = self.name_of(&e)?;
                    self.pending_end = true;
                    return Ok(true);
                }
                Event::End(_) => return Ok(false),
                Event::Text(t) => {
                    let text = self.utf8(&t)?;
                    if !text.trim().is_empty() {
                        return Err(ParseError::UnexpectedText {
                            location: self.location(),
                        });
                    }
                }
                Event::CData(_) | Event::GeneralRef(_) => {
                    return Err(ParseError::UnexpectedText {
                        location: self.location(),
                    });
                }
                Event::Eof => {
                    return Err(ParseError::UnexpectedEof {
                        location: self.location(),
                    });
                }
                _ => {}
            }
        }
    }

    /// Read the text content of the current element and consume its end tag.
    pub fn element_text(&mut self) -> Result<String, ParseError> {
        if self.pending_end {
            self.pending_end = false;
            return Ok(String::new());
        }
        let mut text = String::new();
        loop {
            match self.read()? {
                Event::Text(t) => text.push_str(self.utf8(&t)?),
                Event::CData(c) => text.push_str(self.utf8(&c)?),
                Event::GeneralRef(r) => {
                    let name = self.utf8(&r)?;
                    text.push(self.resolve_entity(name)?);
                }
                Event::End(_) => return Ok(text),
                Event::Start(_) | Event::Empty(_) => {
                    return Err(ParseError::NotTextOnly {
                        location: self.location(),
                    });
                }
                Event::Eof => {
                    return Err(ParseError::UnexpectedEof {
                        location: self.location(),
                    });
                }
                _ => {}
            }
        }
    }

    fn read(&mut self) -> Result<Event<'x>, ParseError> {
        self.offset = self.reader.buffer_position() as usize;
        self.reader.read_event().map_err(|e| ParseError::Xml {
            message: e.to_string(),
            location: Location::at(self.src, self.reader.error_position() as usize),
        })
    }

    fn name_of(&self, e: &BytesStart<'_>) -> Result<String, ParseError> {
        Ok(self.utf8(e.local_name().as_ref())?.to_string())
    }

    fn utf8<'b>(&self, bytes: &'b [u8]) -> Result<&'b str, ParseError> {
        std::str::from_utf8(bytes).map_err(|e| ParseError::Xml {
            message: e.to_string(),
            location: self.location(),
        })
    }

    fn resolve_entity(&self, name: &str) -> Result<char, ParseError> {
        let resolved = match name {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => name.strip_prefix('#').and_then(|num| {
                let code = match num.strip_prefix('x') {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => num.parse().ok(),
                };
                code.and_then(char::from_u32)
            }),
        };
        resolved.ok_or_else(|| ParseError::UnknownEntity {
            name: name.to_string(),
            location: self.location(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_tag_skips_whitespace_and_comments() {
        let mut r = PullReader::new("<?xml version=\"1.0\"?>\n<!-- c -->\n<a>\n  <b/>\n</a>");
        assert!(r.next_tag().unwrap());
        assert_eq!(r.local_name(), "a");
        assert!(r.next_tag().unwrap());
        assert_eq!(r.local_name(), "b");
        assert!(!r.next_tag().unwrap());
        assert!(!r.next_tag().unwrap());
    }

    #[test]
    fn test_next_tag_rejects_text() {
        let mut r = PullReader::new("<a>oops<b/></a>");
        assert!(r.next_tag().unwrap());
        assert!(matches!(r.next_tag(), Err(ParseError::UnexpectedText { .. })));
    }

    #[test]
    fn test_element_text_with_entities_and_cdata() {
        let mut r = PullReader::new("<a>x &amp; y &#65;&#x42;<![CDATA[<raw>]]></a>");
        assert!(r.next_tag().unwrap());
        assert_eq!(r.element_text().unwrap(), "x & y AB<raw>");
    }

    #[test]
    fn test_element_text_of_empty_element() {
        let mut r = PullReader::new("<r><a/><b></b></r>");
        r.next_tag().unwrap();
        r.next_tag().unwrap();
        assert_eq!(r.element_text().unwrap(), "");
        r.next_tag().unwrap();
        assert_eq!(r.element_text().unwrap(), "");
        assert!(!r.next_tag().unwrap());
    }

    #[test]
    fn test_element_text_rejects_children() {
        let mut r = PullReader::new("<a><b/></a>");
        r.next_tag().unwrap();
        assert!(matches!(r.element_text(), Err(ParseError::NotTextOnly { .. })));
    }

    #[test]
    fn test_prefixed_names_use_local_part() {
        let mut r = PullReader::new("<p:a xmlns:p=\"urn:p\"/>");
        r.next_tag().unwrap();
        assert_eq!(r.local_name(), "a");
    }

    #[test]
    fn test_location_is_line_and_column() {
        let mut r = PullReader::new("<a>\n  <b/>\n</a>");
        r.next_tag().unwrap();
        r.next_tag().unwrap();
        assert_eq!(r.location(), Location { line: 2, column: 3 });
    }

    #[test]
    fn test_unexpected_eof() {
        let mut r = PullReader::new("");
        assert!(matches!(r.next_tag(), Err(ParseError::UnexpectedEof { .. })));
    }
}
