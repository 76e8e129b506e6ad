//! Documentation comment structure
//!
//! A doc comment is read in two steps. First the comment markers (`///`,
//! or `/**`, a leading `*` and `*/` for block comments) are stripped from
//! every line, producing one logical text plus a segment table that maps
//! logical offsets back to file offsets. The logical text is then read as
//! a shallow tag grammar with `quick-xml`: start and end tags are matched
//! by name, tags that never close are dropped, stray end tags are ignored.
//! A syntax error ends parsing and keeps every element bounded so far.

use doccop_syntax::DocTrivia;
use mago_span::{Position, Span};
use quick_xml::events::Event;
use quick_xml::Reader;

/// One tag instance inside a documentation comment
#[derive(Debug, Clone, PartialEq)]
pub struct DocElement {
    /// Tag name as written, e.g. `returns`
    pub name: String,
    /// From the `<` of the start tag to just past the `>` of the end tag
    pub span: Span,
    /// Inner text between the tags; empty at the element end when self-closing
    pub content: Span,
    pub self_closing: bool,
}

impl DocElement {
    pub fn start_offset(&self) -> usize {
        self.span.start.offset as usize
    }

    pub fn end_offset(&self) -> usize {
        self.span.end.offset as usize
    }

    /// Raw element text in the file, interior comment markers included
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start_offset()..self.end_offset()]
    }
}

/// Parsed documentation block of one declaration
#[derive(Debug, Clone)]
pub struct DocComment {
    pub span: Span,
    elements: Vec<DocElement>,
}

impl DocComment {
    /// Parse the doc comment occupying `span` in `source`
    pub fn parse(source: &str, span: Span) -> Self {
        let start = (span.start.offset as usize).min(source.len());
        let end = (span.end.offset as usize).clamp(start, source.len());

        let logical = strip_markers(source, start, end);
        let elements = read_elements(&logical.text)
            .into_iter()
            .map(|raw| DocElement {
                name: raw.name,
                span: make_span(span, logical.to_source(raw.start), logical.to_source_end(raw.end)),
                content: make_span(
                    span,
                    logical.to_source(raw.content_start),
                    logical.to_source_end(raw.content_end),
                ),
                self_closing: raw.self_closing,
            })
            .collect();

        Self { span, elements }
    }

    /// Parse the comments found by the trivia scanner
    pub fn from_trivia(source: &str, trivia: &DocTrivia) -> Self {
        Self::parse(source, trivia.span)
    }

    /// Elements ordered by the position of their start tag
    pub fn elements(&self) -> &[DocElement] {
        &self.elements
    }

    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DocElement> + 'a {
        self.elements.iter().filter(move |e| e.name == name)
    }

    pub fn has_element(&self, name: &str) -> bool {
        self.elements.iter().any(|e| e.name == name)
    }

    /// Whether the block defers to inherited documentation via `<inheritdoc/>`
    pub fn inherits_documentation(&self) -> bool {
        self.has_element("inheritdoc")
    }
}

fn make_span(template: Span, start: usize, end: usize) -> Span {
    Span::new(
        template.file_id,
        Position::new(start as u32),
        Position::new(end.max(start) as u32),
    )
}

/// A contiguous slice of the file copied into the logical text
#[derive(Debug, Clone, Copy)]
struct Segment {
    logical: usize,
    source: usize,
}

#[derive(Debug, Default)]
struct LogicalText {
    text: String,
    segments: Vec<Segment>,
}

impl LogicalText {
    fn push(&mut self, source_offset: usize, slice: &str) {
        if slice.is_empty() {
            return;
        }
        self.segments.push(Segment {
            logical: self.text.len(),
            source: source_offset,
        });
        self.text.push_str(slice);
    }

    /// Map a logical offset to the file offset of the same byte
    fn to_source(&self, logical: usize) -> usize {
        let index = self
            .segments
            .partition_point(|s| s.logical <= logical)
            .saturating_sub(1);
        match self.segments.get(index) {
            Some(segment) => segment.source + (logical - segment.logical.min(logical)),
            None => logical,
        }
    }

    /// Map an exclusive end offset, staying inside the segment of its last byte
    fn to_source_end(&self, logical: usize) -> usize {
        if logical == 0 {
            return self.to_source(0);
        }
        self.to_source(logical - 1) + 1
    }
}

fn strip_markers(source: &str, start: usize, end: usize) -> LogicalText {
    let mut logical = LogicalText::default();
    let mut in_block = false;
    let mut line_offset = start;

    for line in source[start..end].split_inclusive('\n') {
        let line_start = line_offset;
        line_offset += line.len();

        let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
        let rest = &line[indent..];

        let mut content_start = indent;
        if in_block {
            if rest.starts_with('*') && !rest.starts_with("*/") {
                content_start += 1;
            }
        } else if rest.starts_with("///") {
            content_start += 3;
        } else if rest.starts_with("/**") {
            content_start += 3;
            in_block = true;
        }

        let mut content_end = line.len();
        if in_block {
            if let Some(close) = line[content_start..].find("*/") {
                content_end = content_start + close;
                in_block = false;
            }
        }

        logical.push(line_start + content_start, &line[content_start..content_end]);
    }

    logical
}

/// An element bounded in logical coordinates
#[derive(Debug)]
struct RawElement {
    name: String,
    start: usize,
    end: usize,
    content_start: usize,
    content_end: usize,
    self_closing: bool,
}

struct OpenTag {
    name: String,
    start: usize,
    content_start: usize,
}

fn read_elements(text: &str) -> Vec<RawElement> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text_start = false;
    reader.config_mut().trim_text_end = false;
    // End tags are paired by name against `open` below, not by quick-xml
    reader.config_mut().check_end_names = false;
    reader.config_mut().allow_unmatched_ends = true;

    let mut open: Vec<OpenTag> = Vec::new();
    let mut elements = Vec::new();

    loop {
        // Capture position before reading the event
        let event_start = reader.buffer_position() as usize;

        match reader.read_event() {
            Ok(Event::Start(e)) => {
                open.push(OpenTag {
                    name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    start: event_start,
                    content_start: reader.buffer_position() as usize,
                });
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                // Tags opened inside the matched one and never closed are dropped
                if let Some(index) = open.iter().rposition(|tag| tag.name == name) {
                    if let Some(tag) = open.drain(index..).next() {
                        elements.push(RawElement {
                            name,
                            start: tag.start,
                            end: reader.buffer_position() as usize,
                            content_start: tag.content_start,
                            content_end: event_start,
                            self_closing: false,
                        });
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                let end = reader.buffer_position() as usize;
                elements.push(RawElement {
                    name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    start: event_start,
                    end,
                    content_start: end,
                    content_end: end,
                    self_closing: true,
                });
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(quick_xml::Error::IllFormed(_)) if reader.buffer_position() as usize > event_start => {
                continue;
            }
            Err(_) => break,
        }
    }

    elements.sort_by_key(|e| e.start);
    elements
}
