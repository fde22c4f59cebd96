//! Atom feed decoding.
//!
//! [`FeedDecoder`] walks a drained response body with `quick-xml` and yields
//! [`FeedEvent`]s lazily: one [`FeedEvent::Meta`] before anything else, then
//! one [`FeedEvent::Entry`] per `<entry>`. Iteration stops after the closing
//! `</feed>`, or right after the first `Err`.
//!
//! Elements are kept as a generic [`Element`] tree. Namespace prefixes are
//! stripped, so `atom:company-info` and `company-info` are the same element.

use std::collections::BTreeMap;

use filings_core::{DataError, Result};
use quick_xml::Reader;
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};

/// Root element of an Atom document.
const FEED: &str = "feed";
/// Feed-level company profile block.
const COMPANY_INFO: &str = "company-info";
/// One feed item.
const ENTRY: &str = "entry";

/// A decoded XML element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    /// Local name, without namespace prefix.
    pub name: String,
    /// Attributes by local name. Namespace declarations are dropped.
    pub attributes: BTreeMap<String, String>,
    /// Concatenated character data directly inside this element.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<Element>,
}

/// A named child that may occur once or several times.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Field<'a> {
    /// The child occurs exactly once.
    One(&'a Element),
    /// The child occurs two or more times, in document order.
    Many(Vec<&'a Element>),
}

impl Element {
    /// Creates an empty element with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    fn from_start(start: &BytesStart<'_>, decoder: Decoder) -> Result<Self> {
        let mut element = Self::new(String::from_utf8_lossy(start.local_name().as_ref()));
        for attr in start.attributes() {
            let attr = attr.map_err(|e| DataError::Parse(format!("Bad attribute: {}", e)))?;
            if attr.key.as_ref().starts_with(b"xmlns") {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .decode_and_unescape_value(decoder)
                .map_err(|e| DataError::Parse(format!("Bad attribute value: {}", e)))?;
            element.attributes.insert(key, value.into_owned());
        }
        Ok(element)
    }

    /// Trimmed text content, or `None` when blank.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        let text = self.text.trim();
        (!text.is_empty()).then_some(text)
    }

    /// Attribute value by local name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// First child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Text of the first child with the given name.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(Self::text)
    }

    /// All children with the given name, in document order.
    pub fn children_named<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a Self> + use<'a, 'n> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Children with the given name, distinguishing a lone occurrence from repeats.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Field<'_>> {
        let mut matches: Vec<&Self> = self.children_named(name).collect();
        match matches.len() {
            0 => None,
            1 => matches.pop().map(Field::One),
            _ => Some(Field::Many(matches)),
        }
    }
}

/// A decoded unit of the feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedEvent {
    /// Feed-level company metadata. Emitted exactly once, before any entry.
    /// `None` when the feed carries no `company-info` block ahead of its entries.
    Meta(Option<Element>),
    /// One feed entry.
    Entry(Element),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Root element not seen yet.
    Prologue,
    /// Inside `<feed>`.
    Body,
    /// Root closed, or an error was returned.
    Done,
}

/// Lazy decoder over an Atom document.
///
/// The decoder is a finite, non-restartable iterator. Entries are produced as
/// the document is walked; nothing past the current entry is parsed yet.
pub struct FeedDecoder<'a> {
    reader: Reader<&'a [u8]>,
    state: State,
    meta_sent: bool,
    pending: Option<Element>,
    stack: Vec<Element>,
}

impl std::fmt::Debug for FeedDecoder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedDecoder")
            .field("state", &self.state)
            .field("meta_sent", &self.meta_sent)
            .field("position", &self.reader.buffer_position())
            .finish()
    }
}

impl<'a> FeedDecoder<'a> {
    /// Creates a decoder over a complete response body.
    #[must_use]
    pub fn new(body: &'a [u8]) -> Self {
        let mut reader = Reader::from_reader(body);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            state: State::Prologue,
            meta_sent: false,
            pending: None,
            stack: Vec::new(),
        }
    }

    fn parse_error(&self, message: impl std::fmt::Display) -> DataError {
        DataError::Parse(format!(
            "{} at byte {}",
            message,
            self.reader.buffer_position()
        ))
    }

    /// Attaches a closed element to its parent, or returns it when it is a
    /// direct child of the root.
    fn close(&mut self, element: Element) -> Option<Element> {
        match self.stack.last_mut() {
            Some(parent) => {
                parent.children.push(element);
                None
            }
            None => Some(element),
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(top) = self.stack.last_mut() {
            top.text.push_str(text);
        }
    }

    /// Reads up to the next completed direct child of `<feed>`.
    /// Returns `None` once the root element is closed.
    fn next_child(&mut self) -> Result<Option<Element>> {
        loop {
            let event = self
                .reader
                .read_event()
                .map_err(|e| self.parse_error(e))?;
            match event {
                Event::Start(start) => {
                    let element = Element::from_start(&start, self.reader.decoder())?;
                    if self.state == State::Prologue {
                        self.enter_root(&element)?;
                    } else {
                        self.stack.push(element);
                    }
                }
                Event::Empty(start) => {
                    let element = Element::from_start(&start, self.reader.decoder())?;
                    if self.state == State::Prologue {
                        self.enter_root(&element)?;
                        return Ok(None);
                    }
                    if let Some(done) = self.close(element) {
                        return Ok(Some(done));
                    }
                }
                Event::End(_) => match self.stack.pop() {
                    Some(element) => {
                        if let Some(done) = self.close(element) {
                            return Ok(Some(done));
                        }
                    }
                    None => return Ok(None),
                },
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| self.parse_error(format!("Bad text: {}", e)))?
                        .into_owned();
                    self.push_text(&text);
                }
                Event::CData(data) => {
                    let text = self
                        .reader
                        .decoder()
                        .decode(&data)
                        .map_err(|e| self.parse_error(format!("Bad CDATA: {}", e)))?
                        .into_owned();
                    self.push_text(&text);
                }
                Event::Eof => {
                    return Err(match self.state {
                        State::Prologue => self.parse_error("document has no root element"),
                        _ => self.parse_error("unexpected end of feed"),
                    });
                }
                _ => {}
            }
        }
    }

    fn enter_root(&mut self, element: &Element) -> Result<()> {
        if element.name != FEED {
            return Err(self.parse_error(format!(
                "expected <{}> root, found <{}>",
                FEED, element.name
            )));
        }
        self.state = State::Body;
        Ok(())
    }

    fn advance(&mut self) -> Result<Option<FeedEvent>> {
        if let Some(entry) = self.pending.take() {
            return Ok(Some(FeedEvent::Entry(entry)));
        }

        loop {
            let Some(child) = self.next_child()? else {
                self.state = State::Done;
                if self.meta_sent {
                    return Ok(None);
                }
                self.meta_sent = true;
                return Ok(Some(FeedEvent::Meta(None)));
            };

            match child.name.as_str() {
                COMPANY_INFO if !self.meta_sent => {
                    self.meta_sent = true;
                    return Ok(Some(FeedEvent::Meta(Some(child))));
                }
                ENTRY if !self.meta_sent => {
                    self.meta_sent = true;
                    self.pending = Some(child);
                    return Ok(Some(FeedEvent::Meta(None)));
                }
                ENTRY => return Ok(Some(FeedEvent::Entry(child))),
                _ => {}
            }
        }
    }
}

impl Iterator for FeedDecoder<'_> {
    type Item = Result<FeedEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == State::Done && self.pending.is_none() {
            return None;
        }
        match self.advance() {
            Ok(event) => event.map(Ok),
            Err(e) => {
                self.state = State::Done;
                self.pending = None;
                Some(Err(e))
            }
        }
    }
}
