use crate::ScoreError;
use encoding_rs::{Encoding, UTF_8};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;

/// Materialize score text from raw bytes.
///
/// A byte order mark selects UTF-8 or UTF-16, otherwise the bytes must be valid UTF-8.
pub fn decode_score(bytes: &[u8]) -> Result<String, ScoreError> {
    let (encoding, bom_length) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    log::debug!("Decoding {} bytes as {}", bytes.len(), encoding.name());
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_length..])
        .map(std::borrow::Cow::into_owned)
        .ok_or_else(|| {
            ScoreError::InvalidEncoding(format!("input is not valid {}", encoding.name()))
        })
}

/// Read and decode a score file.
pub fn read_score(path: &Path) -> Result<String, ScoreError> {
    if !path.exists() {
        return Err(ScoreError::FileNotFound(path.to_path_buf()));
    }
    log::debug!("Reading score file {path:?}");
    let bytes = std::fs::read(path)?;
    decode_score(&bytes)
}

/// Element-level event, names are local names without namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreEvent {
    Open(String),
    Text(String),
    Close(String),
}

/// Streaming reader over a score document.
///
/// Yields `Open`/`Text`/`Close` in document order with empty elements expanded and
/// whitespace-only text dropped. The document must be well-formed: a single root
/// element, no text outside of it and every element closed.
pub struct ScoreReader<'a> {
    reader: Reader<&'a [u8]>,
    depth: usize,
    seen_root: bool,
    done: bool,
}

impl<'a> ScoreReader<'a> {
    pub fn new(xml: &'a str) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);
        reader.expand_empty_elements(true);
        ScoreReader {
            reader,
            depth: 0,
            seen_root: false,
            done: false,
        }
    }

    fn malformed(&self, reason: &str) -> ScoreError {
        ScoreError::MalformedDocument(format!(
            "{reason} at position {}",
            self.reader.buffer_position()
        ))
    }

    fn text_event(&self, text: &str) -> Result<Option<ScoreEvent>, ScoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        if self.depth == 0 {
            return Err(self.malformed("text outside of the root element"));
        }
        Ok(Some(ScoreEvent::Text(text.to_string())))
    }

    /// Next event, `None` once the root element is closed and the input is exhausted.
    pub fn next_event(&mut self) -> Result<Option<ScoreEvent>, ScoreError> {
        loop {
            match self.reader.read_event()? {
                Event::Start(e) => {
                    if self.depth == 0 && self.seen_root {
                        return Err(self.malformed("second root element"));
                    }
                    // attributes are parsed lazily, check quoting and duplicates here
                    for attribute in e.attributes() {
                        attribute?;
                    }
                    self.seen_root = true;
                    self.depth += 1;
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    return Ok(Some(ScoreEvent::Open(name)));
                }
                Event::End(e) => {
                    self.depth = match self.depth.checked_sub(1) {
                        Some(depth) => depth,
                        None => return Err(self.malformed("unexpected closing tag")),
                    };
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    return Ok(Some(ScoreEvent::Close(name)));
                }
                Event::Text(t) => {
                    let text = t.unescape()?;
                    if let Some(event) = self.text_event(&text)? {
                        return Ok(Some(event));
                    }
                }
                Event::CData(c) => {
                    let bytes = c.into_inner();
                    if let Some(event) = self.text_event(&String::from_utf8_lossy(&bytes))? {
                        return Ok(Some(event));
                    }
                }
                Event::Eof => {
                    if !self.seen_root {
                        return Err(self.malformed("no root element"));
                    }
                    if self.depth > 0 {
                        return Err(self.malformed("unclosed element"));
                    }
                    return Ok(None);
                }
                // declaration, doctype, comments and processing instructions
                _ => {}
            }
        }
    }
}

impl Iterator for ScoreReader<'_> {
    type Item = Result<ScoreEvent, ScoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.next_event().transpose();
        if !matches!(next, Some(Ok(_))) {
            self.done = true;
        }
        next
    }
}
