//! Splits free-form text into plain text and candidate message spans.

use tracing::{debug, trace};

use crate::escape::{Escaper, StdEscaper};
use crate::{SERVICE_MESSAGE_END, SERVICE_MESSAGE_START};

/// One piece of scanned text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text outside any message, passed through unchanged.
    Text(&'a str),
    /// Trimmed interior of a `##teamcity[...]` span, delimiters excluded.
    Message(&'a str),
}

impl<'a> Segment<'a> {
    pub fn content(&self) -> &'a str {
        match self {
            Segment::Text(s) | Segment::Message(s) => s,
        }
    }

    pub fn is_message(&self) -> bool {
        matches!(self, Segment::Message(_))
    }
}

/// Iterator over the [`Segment`]s of a text, see [`split_text`].
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    text: &'a str,
    offset: usize,
    pending: Option<Segment<'a>>,
}

impl<'a> Segments<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            offset: 0,
            pending: None,
        }
    }

    // Everything from the cursor on is plain text.
    fn finish(&mut self) -> Option<Segment<'a>> {
        let rest = &self.text[self.offset..];
        self.offset = self.text.len();
        if rest.is_empty() {
            None
        } else {
            trace!(len = rest.len(), "text segment");
            Some(Segment::Text(rest))
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(segment) = self.pending.take() {
            return Some(segment);
        }

        while self.offset < self.text.len() {
            let start = match self.text[self.offset..].find(SERVICE_MESSAGE_START) {
                Some(pos) => self.offset + pos,
                None => return self.finish(),
            };

            let body = start + SERVICE_MESSAGE_START.len();
            let end = match find_message_end(self.text, body) {
                Some(end) => end,
                None => {
                    debug!(
                        offset = start,
                        "unterminated service message, treating rest as text"
                    );
                    return self.finish();
                }
            };

            let before = &self.text[self.offset..start];
            let message = self.text[body..end].trim();
            self.offset = end + SERVICE_MESSAGE_END.len();

            let message = (!message.is_empty()).then(|| {
                trace!(offset = start, len = message.len(), "message segment");
                Segment::Message(message)
            });

            if before.is_empty() {
                if message.is_some() {
                    return message;
                }
                // `##teamcity[]` yields nothing, keep scanning
                continue;
            }

            trace!(len = before.len(), "text segment");
            self.pending = message;
            return Some(Segment::Text(before));
        }

        None
    }
}

/// Byte index of the first message terminator at or after `from` that is not
/// directly preceded by the escape marker.
fn find_message_end(text: &str, from: usize) -> Option<usize> {
    let marker = StdEscaper.marker();
    let mut pos = from;

    loop {
        let end = pos + text[pos..].find(SERVICE_MESSAGE_END)?;
        if !text[..end].ends_with(marker) {
            return Some(end);
        }

        pos = end + SERVICE_MESSAGE_END.len();
    }
}

/// Split `text` into plain text and candidate message spans, in order.
///
/// Empty segments are never produced. An opening `##teamcity[` without a
/// matching `]` turns the rest of the input into plain text.
pub fn split_text(text: &str) -> Segments<'_> {
    Segments::new(text)
}

/// Like [`split_text`], but message spans are returned with their delimiters
/// put back, i.e. as candidate messages rather than interiors.
pub fn split_to_potential_messages(text: &str) -> Vec<String> {
    split_text(text)
        .map(|segment| match segment {
            Segment::Text(s) => s.to_string(),
            Segment::Message(s) => {
                let mut message = String::with_capacity(
                    SERVICE_MESSAGE_START.len() + s.len() + SERVICE_MESSAGE_END.len(),
                );
                message.push_str(SERVICE_MESSAGE_START);
                message.push_str(s);
                message.push_str(SERVICE_MESSAGE_END);
                message
            }
        })
        .collect()
}
