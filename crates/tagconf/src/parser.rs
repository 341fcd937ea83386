//! Tree builder that turns tagged-section text into an [`Element`] tree.

use std::mem;

use quick_xml::Reader;
use quick_xml::escape::EscapeError;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use tracing::{trace, warn};

use crate::{Element, Error, Result};

/// Parse configuration text into a fresh tree rooted at `root`.
///
/// # Example
///
/// ```rust
/// use tagconf::parse;
///
/// let root = parse("<A><B>k=v</B></A>").unwrap();
/// let b = root.find_child("A").unwrap().find_child("B").unwrap();
/// assert_eq!(b.find_child("k").unwrap().value(), "v");
/// ```
///
/// # Errors
///
/// Returns a format error if a closing tag does not match the open
/// section, if a tag body is not valid attribute syntax (usually a stray
/// `<` in a value) or if the tokenizer rejects the input.
pub fn parse(content: &str) -> Result<Element> {
    parse_bytes(content.as_bytes())
}

/// Parse configuration bytes into a fresh tree rooted at `root`.
///
/// Sections left open at the end of the input are accepted as if they had
/// been closed.
pub fn parse_bytes(content: &[u8]) -> Result<Element> {
    TreeBuilder::new(content).build()
}

/// Internal builder state.
struct TreeBuilder<'a> {
    /// The tokenizer.
    reader: Reader<&'a [u8]>,

    /// The tree under construction.
    root: Element,

    /// Open sections, innermost last.
    stack: Vec<Frame>,
}

/// An open section.
///
/// The section is taken out of its parent while open and put back at the
/// same position when it closes.
struct Frame {
    /// Position of this section among its parent's children.
    index: usize,

    element: Element,
}

impl<'a> TreeBuilder<'a> {
    fn new(content: &'a [u8]) -> Self {
        let mut reader = Reader::from_reader(content);
        let config = reader.config_mut();
        config.trim_text_start = false;
        config.trim_text_end = false;
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        Self {
            reader,
            root: Element::root(),
            stack: Vec::new(),
        }
    }

    fn build(mut self) -> Result<Element> {
        loop {
            let event_start = self.reader.buffer_position();

            match self.reader.read_event() {
                Ok(Event::Start(e)) => self.handle_start(&e, event_start)?,
                Ok(Event::End(e)) => self.handle_end(&e, event_start)?,
                Ok(Event::Text(e)) => self.handle_text(&e, event_start)?,
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    self.add_lines(&text);
                }
                Ok(Event::Empty(e)) => {
                    self.handle_start(&e, event_start)?;
                    self.close_innermost();
                }
                Ok(Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_)) => {}
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Syntax {
                        message: e.to_string(),
                        position: self.reader.error_position(),
                    });
                }
            }
        }

        if let Some(frame) = self.stack.last() {
            warn!(
                section = frame.element.name(),
                open = self.stack.len(),
                "config ended with unclosed sections"
            );
        }
        while !self.stack.is_empty() {
            self.close_innermost();
        }

        Ok(self.root)
    }

    /// The innermost open section.
    fn current(&mut self) -> &mut Element {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.element,
            None => &mut self.root,
        }
    }

    fn handle_start(&mut self, e: &BytesStart<'_>, event_start: u64) -> Result<()> {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();

        // Attributes are ignored, but a tag body that is not attribute syntax
        // means a `<` inside a value was read as a tag.
        if let Some(err) = e.attributes().with_checks(true).find_map(|attr| attr.err()) {
            return Err(Error::Syntax {
                message: format!("malformed tag <{}>: {}", name, err),
                position: event_start,
            });
        }

        let parent = self.current();

        let index = match parent.child_index(&name) {
            Some(index) => index,
            None => {
                parent.add_child(name.clone(), Element::node(name.as_str()));
                parent.child_count() - 1
            }
        };

        // A repeated tag reopens the existing section; a value of the same
        // name is replaced by the section.
        let existing = parent
            .child_at_mut(index)
            .map(|slot| mem::replace(slot, Element::node(name.as_str())));
        let element = match existing {
            Some(section) if section.is_node() => section,
            _ => Element::node(name),
        };

        self.stack.push(Frame { index, element });
        Ok(())
    }

    fn handle_end(&mut self, e: &BytesEnd<'_>, event_start: u64) -> Result<()> {
        let found = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();

        let Some(frame) = self.stack.last() else {
            return Err(Error::UnexpectedEndTag {
                found,
                position: event_start,
            });
        };

        if frame.element.name() != found {
            return Err(Error::MismatchedEndTag {
                expected: frame.element.name().to_string(),
                found,
                position: event_start,
            });
        }

        self.close_innermost();
        Ok(())
    }

    fn handle_text(&mut self, e: &BytesText<'_>, event_start: u64) -> Result<()> {
        let text = e.unescape().map_err(|err| {
            // Escape ranges are relative to the text chunk.
            let offset = match &err {
                quick_xml::Error::Escape(EscapeError::UnrecognizedEntity(range, _)) => {
                    range.start.saturating_sub(1)
                }
                quick_xml::Error::Escape(EscapeError::UnterminatedEntity(range)) => range.start,
                _ => 0,
            };
            Error::Syntax {
                message: format!("invalid text content: {}", err),
                position: event_start + offset as u64,
            }
        })?;
        self.add_lines(&text);
        Ok(())
    }

    /// Put the innermost open section back into its parent.
    fn close_innermost(&mut self) {
        if let Some(frame) = self.stack.pop() {
            if let Some(slot) = self.current().child_at_mut(frame.index) {
                *slot = frame.element;
            }
        }
    }

    /// Add every `key=value` line of `text` to the innermost open section.
    fn add_lines(&mut self, text: &str) {
        let section = self.current();

        for line in text.lines() {
            match parse_line(line) {
                Some((key, value)) => {
                    section.add_child(key, Element::leaf(key, value));
                }
                None => {
                    if !line.trim().is_empty() {
                        trace!(section = section.name(), line, "skipping line without key");
                    }
                }
            }
        }
    }
}

/// Split a physical line into a trimmed key and value.
///
/// Returns `None` for blank lines, `#` comments, lines without `=` and
/// lines with an empty key. Only the first `=` separates; the value may
/// contain more.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    Some((key, value.trim()))
}
